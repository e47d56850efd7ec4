use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Question::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Question::Text)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Question::Category)
                            .string_len(60)
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(Question::ClickCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Question::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Question::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // public listing and the leaderboard filter on is_active
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_active_updated")
                    .table(Question::Table)
                    .col(Question::IsActive)
                    .col(Question::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suggestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suggestion::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suggestion::Text).text().not_null())
                    .col(ColumnDef::new(Suggestion::Category).string_len(60).null())
                    .col(
                        ColumnDef::new(Suggestion::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Suggestion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Suggestion::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Suggestion::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Suggestion::QuestionId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suggestions_question_id")
                            .from(Suggestion::Table, Suggestion::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_suggestions_status")
                    .table(Suggestion::Table)
                    .col(Suggestion::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AnalyticsEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnalyticsEvent::EventType)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnalyticsEvent::Total)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsEvent::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminCredential::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminCredential::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminCredential::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AdminCredential::PasswordHash)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminCredential::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminCredential::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminCredential::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnalyticsEvent::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suggestion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Question {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    Text,
    Category,
    ClickCount,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Suggestion {
    #[sea_orm(iden = "suggestions")]
    Table,
    Id,
    Text,
    Category,
    Status,
    CreatedAt,
    UpdatedAt,
    ProcessedAt,
    QuestionId,
}

#[derive(DeriveIden)]
enum AnalyticsEvent {
    #[sea_orm(iden = "analytics_events")]
    Table,
    EventType,
    Total,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminCredential {
    #[sea_orm(iden = "admin_credentials")]
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
