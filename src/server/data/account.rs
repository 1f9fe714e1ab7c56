//! Accounts that own one or more characters.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

/// Repository for the `account` table.
pub struct AccountRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AccountRepository<'a, C> {
    /// Creates a repository over the given connection or transaction.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new, empty account.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted account with its generated ID
    /// - `Err(DbErr)` - The insert failed
    pub async fn create(&self) -> Result<entity::account::Model, DbErr> {
        entity::account::ActiveModel {
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Gets an account by ID.
    ///
    /// # Arguments
    /// - `account_id` - ID of the account to get
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - The account exists
    /// - `Ok(None)` - No account has this ID
    /// - `Err(DbErr)` - The query failed
    pub async fn get(&self, account_id: i32) -> Result<Option<entity::account::Model>, DbErr> {
        entity::prelude::Account::find_by_id(account_id)
            .one(self.db)
            .await
    }
}
