use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // City: index on state_id
        manager
            .create_index(
                Index::create()
                    .name("idx_city_state")
                    .table(City::Table)
                    .col(City::StateId)
                    .to_owned(),
            )
            .await?;

        // City: names are unique among rows that are not soft-deleted
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uniq_city_name_active ON city (name) WHERE deleted_at IS NULL",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_city_name_active").table(City::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_city_state").table(City::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum City { Table, StateId }
