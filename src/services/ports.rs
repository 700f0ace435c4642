//! Collaborators the account flows are sequenced through.
//!
//! Each trait is a single seam: the service only ever calls these methods, so
//! stores, hashers and token issuers can be swapped without touching the
//! flows. All of them are `Send + Sync` so they can sit behind `Arc<dyn _>`
//! in the axum state.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Account, AccountLookup, NewAccount};
use crate::services::flow::{AuthFlow, FlowOutcome};

/// Persistence for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns the account matching `lookup`, if any.
    async fn find_one(&self, lookup: &AccountLookup) -> AppResult<Option<Account>>;

    /// Inserts a new account.
    ///
    /// # Errors
    /// `AppError::Duplicate` when the username or email is already taken.
    async fn create(&self, new_account: NewAccount) -> AppResult<Account>;

    fn backend(&self) -> &'static str;
}

/// One-way password hashing.
#[async_trait]
pub trait PasswordHashing: Send + Sync {
    async fn hash(&self, plaintext: &str) -> AppResult<String>;

    /// Returns false for a mismatch; errors only for a malformed hash.
    async fn verify(&self, plaintext: &str, hash: &str) -> AppResult<bool>;
}

/// Issues access tokens for authenticated accounts.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, account_id: i32) -> AppResult<String>;
}

/// Receives status events for each flow.
///
/// Implementations must not block; they are called inline on the request task.
pub trait FlowObserver: Send + Sync {
    fn started(&self, flow: AuthFlow);

    fn finished(&self, flow: AuthFlow, outcome: &FlowOutcome);
}
