//! Account repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Account, AccountLookup, AccountRow, NewAccount};
use crate::services::ports::AccountStore;

/// PostgreSQL account store holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct AccountRepository {
    pool: AsyncDbPool,
}

impl AccountRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_one(&self, lookup: &AccountLookup) -> AppResult<Option<Account>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        let row = match lookup {
            AccountLookup::Username(value) => {
                accounts
                    .filter(username.eq(value))
                    .select(AccountRow::as_select())
                    .first(&mut conn)
                    .await
            }
            AccountLookup::Email(value) => {
                accounts
                    .filter(email.eq(value))
                    .select(AccountRow::as_select())
                    .first(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(AppError::from)?;

        Ok(row.map(Account::from))
    }

    /// Inserts the row; unique violations surface as `AppError::Duplicate`.
    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        let row = diesel::insert_into(accounts)
            .values(&new_account)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(row.into())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
