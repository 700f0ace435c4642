//! Service layer for the account flows.

mod account_service;
pub mod flow;
pub mod ports;

pub use account_service::{AccountService, AuthSession, VALIDATION_FAILED_MESSAGE};
pub use flow::{AuthFlow, FlowOutcome, TracingObserver};
pub use ports::{AccountStore, FlowObserver, PasswordHashing, TokenIssuer};

/// All services shared through the axum state.
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService,
}
