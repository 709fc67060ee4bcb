use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiMetrics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiMetrics::SeriesName).string().not_null())
                    .col(ColumnDef::new(ApiMetrics::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(ApiMetrics::Count).big_integer().not_null())
                    .col(ColumnDef::new(ApiMetrics::RecordedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // latest / as-of lookups always filter by series and order by time
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("api_metrics_series_name_timestamp_index")
                    .table(ApiMetrics::Table)
                    .col(ApiMetrics::SeriesName)
                    .col(ApiMetrics::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiMetrics::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum ApiMetrics {
    Table,
    Id,
    SeriesName,
    Timestamp,
    Count,
    RecordedAt,
}
