use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Title and slug uniqueness is enforced here; the publisher's probing
        // loop only picks a likely-free candidate.
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Movies::Title)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Movies::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Movies::Description).text().not_null())
                    .col(ColumnDef::new(Movies::Genre).string_len(64).not_null())
                    .col(ColumnDef::new(Movies::Year).integer())
                    .col(ColumnDef::new(Movies::ThumbnailUrl).text().not_null())
                    .col(ColumnDef::new(Movies::BannerUrl).text())
                    .col(ColumnDef::new(Movies::VideoUrl).text().not_null())
                    .col(ColumnDef::new(Movies::DurationMinutes).integer())
                    .col(ColumnDef::new(Movies::CreatorId).integer().not_null())
                    .col(
                        ColumnDef::new(Movies::CreatedAt)
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
                    .table(Series::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Series::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Series::Title)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Series::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Series::Description).text().not_null())
                    .col(ColumnDef::new(Series::Genre).string_len(64).not_null())
                    .col(ColumnDef::new(Series::Year).integer())
                    .col(ColumnDef::new(Series::ThumbnailUrl).text().not_null())
                    .col(ColumnDef::new(Series::BannerUrl).text())
                    .col(
                        ColumnDef::new(Series::Status)
                            .string_len(32)
                            .not_null()
                            .default("ongoing"),
                    )
                    .col(
                        ColumnDef::new(Series::TotalSeasons)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Series::TotalEpisodes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Series::CreatorId).integer().not_null())
                    .col(
                        ColumnDef::new(Series::CreatedAt)
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
                    .table(Seasons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Seasons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Seasons::SeriesId).integer().not_null())
                    .col(ColumnDef::new(Seasons::SeasonNumber).integer().not_null())
                    .col(ColumnDef::new(Seasons::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Seasons::TotalEpisodes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Seasons::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seasons_series_id")
                            .from(Seasons::Table, Seasons::SeriesId)
                            .to(Series::Table, Series::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seasons_series_number_unique")
                    .table(Seasons::Table)
                    .col(Seasons::SeriesId)
                    .col(Seasons::SeasonNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Episodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Episodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Episodes::SeasonId).integer().not_null())
                    .col(ColumnDef::new(Episodes::SeriesId).integer().not_null())
                    .col(ColumnDef::new(Episodes::EpisodeNumber).integer().not_null())
                    .col(ColumnDef::new(Episodes::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Episodes::Description).text())
                    .col(ColumnDef::new(Episodes::VideoUrl).text().not_null())
                    .col(ColumnDef::new(Episodes::ThumbnailUrl).text())
                    .col(ColumnDef::new(Episodes::DurationMinutes).integer())
                    .col(
                        ColumnDef::new(Episodes::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_episodes_season_id")
                            .from(Episodes::Table, Episodes::SeasonId)
                            .to(Seasons::Table, Seasons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Episodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Seasons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Series::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
    Title,
    Slug,
    Description,
    Genre,
    Year,
    ThumbnailUrl,
    BannerUrl,
    VideoUrl,
    DurationMinutes,
    CreatorId,
    CreatedAt,
}

#[derive(Iden)]
enum Series {
    Table,
    Id,
    Title,
    Slug,
    Description,
    Genre,
    Year,
    ThumbnailUrl,
    BannerUrl,
    Status,
    TotalSeasons,
    TotalEpisodes,
    CreatorId,
    CreatedAt,
}

#[derive(Iden)]
enum Seasons {
    Table,
    Id,
    SeriesId,
    SeasonNumber,
    Title,
    TotalEpisodes,
    CreatedAt,
}

#[derive(Iden)]
enum Episodes {
    Table,
    Id,
    SeasonId,
    SeriesId,
    EpisodeNumber,
    Title,
    Description,
    VideoUrl,
    ThumbnailUrl,
    DurationMinutes,
    CreatedAt,
}
