use sea_orm_migration::prelude::*;

use super::m001_create_creator_tables::CreatorProfiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentSubmissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::CreatorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::ContentType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::Genre)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContentSubmissions::Year).integer())
                    .col(
                        ColumnDef::new(ContentSubmissions::ThumbnailUrl)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContentSubmissions::VideoUrl).text())
                    .col(ColumnDef::new(ContentSubmissions::BannerUrl).text())
                    .col(ColumnDef::new(ContentSubmissions::DurationMinutes).integer())
                    .col(
                        ColumnDef::new(ContentSubmissions::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ContentSubmissions::RejectionReason).text())
                    .col(ColumnDef::new(ContentSubmissions::ReviewedBy).integer())
                    .col(ColumnDef::new(ContentSubmissions::ReviewedAt).timestamp())
                    .col(ColumnDef::new(ContentSubmissions::SeriesData).text())
                    .col(ColumnDef::new(ContentSubmissions::PublishedMovieId).integer())
                    .col(ColumnDef::new(ContentSubmissions::PublishedSeriesId).integer())
                    .col(
                        ColumnDef::new(ContentSubmissions::FileSizeGb)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentSubmissions::UpdatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_submissions_creator_id")
                            .from(ContentSubmissions::Table, ContentSubmissions::CreatorId)
                            .to(CreatorProfiles::Table, CreatorProfiles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_submissions_status")
                    .table(ContentSubmissions::Table)
                    .col(ContentSubmissions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_submissions_creator")
                    .table(ContentSubmissions::Table)
                    .col(ContentSubmissions::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubmissionEpisodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionEpisodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionEpisodes::SubmissionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionEpisodes::SeasonNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionEpisodes::EpisodeNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionEpisodes::Title).string_len(255))
                    .col(ColumnDef::new(SubmissionEpisodes::Description).text())
                    .col(ColumnDef::new(SubmissionEpisodes::VideoUrl).text().not_null())
                    .col(ColumnDef::new(SubmissionEpisodes::ThumbnailUrl).text())
                    .col(ColumnDef::new(SubmissionEpisodes::DurationMinutes).integer())
                    .col(
                        ColumnDef::new(SubmissionEpisodes::FileSizeGb)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(SubmissionEpisodes::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_episodes_submission_id")
                            .from(SubmissionEpisodes::Table, SubmissionEpisodes::SubmissionId)
                            .to(ContentSubmissions::Table, ContentSubmissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_episodes_unique")
                    .table(SubmissionEpisodes::Table)
                    .col(SubmissionEpisodes::SubmissionId)
                    .col(SubmissionEpisodes::SeasonNumber)
                    .col(SubmissionEpisodes::EpisodeNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubmissionEpisodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentSubmissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentSubmissions {
    Table,
    Id,
    CreatorId,
    ContentType,
    Title,
    Description,
    Genre,
    Year,
    ThumbnailUrl,
    VideoUrl,
    BannerUrl,
    DurationMinutes,
    Status,
    RejectionReason,
    ReviewedBy,
    ReviewedAt,
    SeriesData,
    PublishedMovieId,
    PublishedSeriesId,
    FileSizeGb,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SubmissionEpisodes {
    Table,
    Id,
    SubmissionId,
    SeasonNumber,
    EpisodeNumber,
    Title,
    Description,
    VideoUrl,
    ThumbnailUrl,
    DurationMinutes,
    FileSizeGb,
    CreatedAt,
}
