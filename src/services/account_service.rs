//! Account flows: signup, register and login.
//!
//! Every flow validates the raw body first and stops at the first failure.
//! Only after a `Success` result are the collaborators called, in a fixed
//! order: lookup, hash (create flows), create, token.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{Account, AccountLookup, NewAccount};
use crate::services::flow::{AuthFlow, FlowOutcome};
use crate::services::ports::{AccountStore, FlowObserver, PasswordHashing, TokenIssuer};
use crate::validation::{LoginData, NormalizedRecord, SignupData};

/// Top-level message attached to every rejected request body.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation Failed, Try again!";

/// An account together with a freshly issued access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

/// Runs the account flows against injected collaborators.
///
/// Cheap to clone; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHashing>,
    tokens: Arc<dyn TokenIssuer>,
    observer: Arc<dyn FlowObserver>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHashing>,
        tokens: Arc<dyn TokenIssuer>,
        observer: Arc<dyn FlowObserver>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            observer,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Creates an account from a signup body (400 on invalid input).
    pub async fn signup(&self, body: &Value) -> AppResult<AuthSession> {
        self.observed(AuthFlow::Signup, self.create_account(AuthFlow::Signup, body))
            .await
    }

    /// Creates an account from a register body (422 on invalid input).
    pub async fn register(&self, body: &Value) -> AppResult<AuthSession> {
        self.observed(AuthFlow::Register, self.create_account(AuthFlow::Register, body))
            .await
    }

    /// Authenticates by username and password.
    pub async fn login(&self, body: &Value) -> AppResult<AuthSession> {
        self.observed(AuthFlow::Login, self.authenticate(body)).await
    }

    async fn observed(
        &self,
        flow: AuthFlow,
        run: impl Future<Output = AppResult<AuthSession>>,
    ) -> AppResult<AuthSession> {
        self.observer.started(flow);
        let result = run.await;

        let outcome = match &result {
            Ok(session) => FlowOutcome::Completed {
                account_id: session.account.id,
            },
            Err(error) => FlowOutcome::from_error(error),
        };
        self.observer.finished(flow, &outcome);

        result
    }

    async fn create_account(&self, flow: AuthFlow, body: &Value) -> AppResult<AuthSession> {
        let data: SignupData = into_payload(validate(flow, body)?)?;

        let lookup = AccountLookup::Email(data.email.clone());
        if self.store.find_one(&lookup).await?.is_some() {
            return Err(AppError::AccountExists {
                field: lookup.field().to_string(),
                value: data.email,
            });
        }

        let password_hash = self.hasher.hash(&data.password).await?;
        let account = self
            .store
            .create(NewAccount {
                first_name: data.first_name,
                last_name: data.last_name,
                username: data.username,
                email: data.email,
                password: password_hash,
            })
            .await?;

        let token = self.tokens.issue(account.id)?;
        Ok(AuthSession { account, token })
    }

    async fn authenticate(&self, body: &Value) -> AppResult<AuthSession> {
        let data: LoginData = into_payload(validate(AuthFlow::Login, body)?)?;

        let lookup = AccountLookup::Username(data.username);
        let Some(account) = self.store.find_one(&lookup).await? else {
            return Err(AppError::AccountNotFound {
                field: lookup.field().to_string(),
                value: lookup.value().to_string(),
            });
        };

        if !self
            .hasher
            .verify(&data.password, &account.password_hash)
            .await?
        {
            return Err(AppError::Unauthorized {
                message: "Invalid username or password".to_string(),
            });
        }

        let token = self.tokens.issue(account.id)?;
        Ok(AuthSession { account, token })
    }
}

fn validate(flow: AuthFlow, body: &Value) -> AppResult<NormalizedRecord> {
    flow.schema()
        .validate(body)
        .into_result()
        .map_err(|errors| AppError::ValidationFailed {
            status: flow.failure_status(),
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            errors,
        })
}

// A Success record always has every required field with its declared kind
fn into_payload<T: serde::de::DeserializeOwned>(record: NormalizedRecord) -> AppResult<T> {
    record.into_typed().map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureStatus;
    use crate::repositories::MemoryAccountStore;
    use crate::validation::FieldError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Reversible stand-in so tests avoid Argon2's cost
    struct PlainHasher;

    #[async_trait]
    impl PasswordHashing for PlainHasher {
        async fn hash(&self, plaintext: &str) -> AppResult<String> {
            Ok(format!("hashed:{}", plaintext))
        }

        async fn verify(&self, plaintext: &str, hash: &str) -> AppResult<bool> {
            Ok(hash == format!("hashed:{}", plaintext))
        }
    }

    struct CountingIssuer;

    impl TokenIssuer for CountingIssuer {
        fn issue(&self, account_id: i32) -> AppResult<String> {
            Ok(format!("token-for-{}", account_id))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl FlowObserver for RecordingObserver {
        fn started(&self, flow: AuthFlow) {
            self.events.lock().unwrap().push(format!("START {}", flow));
        }

        fn finished(&self, flow: AuthFlow, outcome: &FlowOutcome) {
            let label = match outcome {
                FlowOutcome::Completed { .. } => "completed",
                FlowOutcome::Rejected { .. } => "rejected",
                FlowOutcome::Failed { .. } => "failed",
            };
            self.events
                .lock()
                .unwrap()
                .push(format!("END {} {}", flow, label));
        }
    }

    struct Fixture {
        service: AccountService,
        store: Arc<MemoryAccountStore>,
        observer: Arc<RecordingObserver>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryAccountStore::new());
        let observer = Arc::new(RecordingObserver::default());
        let service = AccountService::new(
            store.clone(),
            Arc::new(PlainHasher),
            Arc::new(CountingIssuer),
            observer.clone(),
        );
        Fixture {
            service,
            store,
            observer,
        }
    }

    fn signup_body() -> Value {
        json!({
            "firstName": " Alice ",
            "lastName": "Smith",
            "username": "AliceS",
            "email": "Alice@Example.com",
            "password": " secret1 "
        })
    }

    #[tokio::test]
    async fn test_signup_creates_normalized_account() {
        let fx = fixture();
        let session = fx.service.signup(&signup_body()).await.unwrap();

        assert_eq!(session.account.first_name, "alice");
        assert_eq!(session.account.username, "alices");
        assert_eq!(session.account.email, "alice@example.com");
        assert_eq!(session.account.password_hash, "hashed:secret1");
        assert_eq!(session.token, format!("token-for-{}", session.account.id));
        assert_eq!(fx.store.len(), 1);
        assert_eq!(fx.observer.events(), vec!["START signup", "END signup completed"]);
    }

    #[tokio::test]
    async fn test_signup_validation_failure_is_bad_request() {
        let fx = fixture();
        let mut body = signup_body();
        body["firstName"] = json!("Al");

        match fx.service.signup(&body).await.unwrap_err() {
            AppError::ValidationFailed {
                status,
                message,
                errors,
            } => {
                assert_eq!(status, FailureStatus::BadRequest);
                assert_eq!(message, VALIDATION_FAILED_MESSAGE);
                assert_eq!(
                    errors,
                    vec![FieldError::new("firstName", "Must be at least 3 Characters long")]
                );
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
        assert!(fx.store.is_empty());
        assert_eq!(fx.observer.events(), vec!["START signup", "END signup rejected"]);
    }

    #[tokio::test]
    async fn test_register_validation_failure_is_unprocessable() {
        let fx = fixture();
        let mut body = signup_body();
        body["password"] = json!("short");

        let err = fx.service.register(&body).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ValidationFailed {
                status: FailureStatus::Unprocessable,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_register_existing_email() {
        let fx = fixture();
        fx.service.register(&signup_body()).await.unwrap();

        let mut body = signup_body();
        body["username"] = json!("another");
        body["email"] = json!("  ALICE@example.com");

        match fx.service.register(&body).await.unwrap_err() {
            AppError::AccountExists { field, value } => {
                assert_eq!(field, "email");
                assert_eq!(value, "alice@example.com");
            }
            other => panic!("Expected AccountExists, got {:?}", other),
        }
        assert_eq!(fx.store.len(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let fx = fixture();
        fx.service.register(&signup_body()).await.unwrap();

        let mut body = signup_body();
        body["email"] = json!("other@example.com");

        let err = fx.service.register(&body).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { ref field, .. } if field == "username"));
    }

    #[tokio::test]
    async fn test_register_accepts_long_username_and_email() {
        let fx = fixture();
        let mut body = signup_body();
        let username = "a".repeat(300);
        let email = format!("{}@{}.com", "b".repeat(64), std::array::from_fn::<String, 3, _>(|_| "c".repeat(60)).join("."));
        body["username"] = json!(username);
        body["email"] = json!(email);

        let session = fx.service.register(&body).await.unwrap();
        assert_eq!(session.account.username.chars().count(), 300);
        assert_eq!(session.account.email, email);
    }

    #[tokio::test]
    async fn test_login_success_uses_lowercased_username() {
        let fx = fixture();
        let created = fx.service.register(&signup_body()).await.unwrap();

        let session = fx
            .service
            .login(&json!({"username": " ALICES ", "password": "secret1"}))
            .await
            .unwrap();
        assert_eq!(session.account, created.account);
        assert_eq!(
            fx.observer.events(),
            vec![
                "START register",
                "END register completed",
                "START login",
                "END login completed"
            ]
        );
    }

    #[tokio::test]
    async fn test_login_unknown_account() {
        let fx = fixture();
        let err = fx
            .service
            .login(&json!({"username": "Bob", "password": "abcdef"}))
            .await
            .unwrap_err();

        match err {
            AppError::AccountNotFound { field, value } => {
                assert_eq!(field, "username");
                assert_eq!(value, "bob");
            }
            other => panic!("Expected AccountNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let fx = fixture();
        fx.service.register(&signup_body()).await.unwrap();

        let err = fx
            .service
            .login(&json!({"username": "alices", "password": "Secret1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_login_validation_failure_lists_both_fields() {
        let fx = fixture();
        let err = fx.service.login(&json!({})).await.unwrap_err();

        match err {
            AppError::ValidationFailed { status, errors, .. } => {
                assert_eq!(status, FailureStatus::Unprocessable);
                assert_eq!(
                    errors,
                    vec![
                        FieldError::new("username", "Username is required"),
                        FieldError::new("password", "Password is required"),
                    ]
                );
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }
}
