use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreatorSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorSettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::MinAccountAgeDays)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::MaxAccountAgeDays)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::DefaultDailyUploadLimit)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::DefaultDailyStorageLimitGb)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::MaxStrikesBeforeSuspension)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::AutoApproveNewCreators)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::IsCreatorSystemEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CreatorSettings::UpdatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreatorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(CreatorProfiles::SuspensionReason).text())
                    .col(
                        ColumnDef::new(CreatorProfiles::DailyUploadLimit)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::DailyStorageLimitGb)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::IsAutoApproveEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::TotalUploads)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::TotalViews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::UpdatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creator_profiles_user_id")
                            .from(CreatorProfiles::Table, CreatorProfiles::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreatorRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreatorRequests::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(CreatorRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(CreatorRequests::AccountAgeDays)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreatorRequests::RejectionReason).text())
                    .col(ColumnDef::new(CreatorRequests::ReviewedBy).integer())
                    .col(ColumnDef::new(CreatorRequests::ReviewedAt).timestamp())
                    .col(
                        ColumnDef::new(CreatorRequests::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creator_requests_user_id")
                            .from(CreatorRequests::Table, CreatorRequests::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_creator_requests_user_status")
                    .table(CreatorRequests::Table)
                    .col(CreatorRequests::UserId)
                    .col(CreatorRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreatorStrikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorStrikes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreatorStrikes::CreatorId).integer().not_null())
                    .col(ColumnDef::new(CreatorStrikes::Reason).text().not_null())
                    .col(ColumnDef::new(CreatorStrikes::IssuedBy).integer().not_null())
                    .col(
                        ColumnDef::new(CreatorStrikes::IssuedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creator_strikes_creator_id")
                            .from(CreatorStrikes::Table, CreatorStrikes::CreatorId)
                            .to(CreatorProfiles::Table, CreatorProfiles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_creator_strikes_creator")
                    .table(CreatorStrikes::Table)
                    .col(CreatorStrikes::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyUploadTracking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyUploadTracking::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyUploadTracking::CreatorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyUploadTracking::TrackingDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyUploadTracking::UploadsToday)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyUploadTracking::StorageUsedTodayGb)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DailyUploadTracking::UpdatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_upload_tracking_creator_id")
                            .from(DailyUploadTracking::Table, DailyUploadTracking::CreatorId)
                            .to(CreatorProfiles::Table, CreatorProfiles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One counter row per creator per day; lazy creation relies on this.
        manager
            .create_index(
                Index::create()
                    .name("idx_daily_upload_tracking_creator_date_unique")
                    .table(DailyUploadTracking::Table)
                    .col(DailyUploadTracking::CreatorId)
                    .col(DailyUploadTracking::TrackingDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyUploadTracking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreatorStrikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreatorRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreatorProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreatorSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Username,
    CreatedAt,
}

#[derive(Iden)]
enum CreatorSettings {
    Table,
    Id,
    MinAccountAgeDays,
    MaxAccountAgeDays,
    DefaultDailyUploadLimit,
    DefaultDailyStorageLimitGb,
    MaxStrikesBeforeSuspension,
    AutoApproveNewCreators,
    IsCreatorSystemEnabled,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum CreatorProfiles {
    Table,
    Id,
    UserId,
    Status,
    SuspensionReason,
    DailyUploadLimit,
    DailyStorageLimitGb,
    IsAutoApproveEnabled,
    TotalUploads,
    TotalViews,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CreatorRequests {
    Table,
    Id,
    UserId,
    Status,
    AccountAgeDays,
    RejectionReason,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
}

#[derive(Iden)]
enum CreatorStrikes {
    Table,
    Id,
    CreatorId,
    Reason,
    IssuedBy,
    IssuedAt,
}

#[derive(Iden)]
enum DailyUploadTracking {
    Table,
    Id,
    CreatorId,
    TrackingDate,
    UploadsToday,
    StorageUsedTodayGb,
    UpdatedAt,
}
