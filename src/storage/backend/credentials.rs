//! Admin credential rows

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait, sea_query::OnConflict,
};
use tracing::{info, warn};

use super::SeaOrmStorage;
use super::converters::model_to_admin_credential;
use super::retry;
use crate::errors::{AskmeError, Result};
use crate::storage::AdminCredential;

use migration::entities::admin_credential;

impl SeaOrmStorage {
    /// Make `email` the one admin account: drop rows for any other email,
    /// then insert it or replace its hash. The email is stored lower-cased.
    pub async fn replace_admin_credential(&self, email: &str, password_hash: &str) -> Result<()> {
        let db = &self.db;
        let email = email.trim().to_lowercase();
        let email = email.as_str();

        let removed = retry::with_retry("replace_admin_credential", self.retry_config, || {
            replace_txn(db, email, password_hash)
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to seed admin credential: {}", e)))?;

        if removed > 0 {
            warn!("Removed {} admin credential(s) no longer in the config", removed);
        }
        info!("Admin credential ready for {}", email);
        Ok(())
    }

    /// Case-insensitive lookup by email.
    pub async fn find_admin_credential(&self, email: &str) -> Result<Option<AdminCredential>> {
        let db = &self.db;
        let email = email.trim().to_lowercase();
        let email = email.as_str();

        let model = retry::with_retry("find_admin_credential", self.retry_config, || async move {
            admin_credential::Entity::find()
                .filter(admin_credential::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to load admin credential: {}", e)))?;

        Ok(model.map(model_to_admin_credential))
    }
}

/// Returns how many stale rows were deleted.
async fn replace_txn(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
) -> std::result::Result<u64, DbErr> {
    let txn = db.begin().await?;

    let removed = admin_credential::Entity::delete_many()
        .filter(admin_credential::Column::Email.ne(email))
        .exec(&txn)
        .await?
        .rows_affected;

    let now = Utc::now();
    let row = admin_credential::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    admin_credential::Entity::insert(row)
        .on_conflict(
            OnConflict::column(admin_credential::Column::Email)
                .update_columns([
                    admin_credential::Column::PasswordHash,
                    admin_credential::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    txn.commit().await?;
    Ok(removed)
}
