//! Flow identities and the default tracing observer.

use std::fmt;

use crate::error::{AppError, FailureStatus};
use crate::services::ports::FlowObserver;
use crate::validation::Schema;
use crate::validation::schemas;

/// The three account flows exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFlow {
    Signup,
    Register,
    Login,
}

impl AuthFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFlow::Signup => schemas::SIGNUP,
            AuthFlow::Register => schemas::REGISTER,
            AuthFlow::Login => schemas::LOGIN,
        }
    }

    /// Schema the request body is validated against.
    pub fn schema(&self) -> &'static Schema {
        match self {
            AuthFlow::Signup => schemas::signup_schema(),
            AuthFlow::Register => schemas::register_schema(),
            AuthFlow::Login => schemas::login_schema(),
        }
    }

    /// Status category reported when the body fails validation.
    pub fn failure_status(&self) -> FailureStatus {
        match self {
            AuthFlow::Signup => FailureStatus::BadRequest,
            AuthFlow::Register | AuthFlow::Login => FailureStatus::Unprocessable,
        }
    }
}

impl fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a flow ended, as reported to a [`FlowObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed { account_id: i32 },
    /// The client can fix the request (validation, duplicate, unknown account)
    Rejected { reason: String },
    Failed { reason: String },
}

impl FlowOutcome {
    pub fn from_error(error: &AppError) -> Self {
        if error.is_client_error() {
            FlowOutcome::Rejected {
                reason: error.to_string(),
            }
        } else {
            FlowOutcome::Failed {
                reason: error.to_string(),
            }
        }
    }
}

/// Emits `START:` / `END:` tracing events for each flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FlowObserver for TracingObserver {
    fn started(&self, flow: AuthFlow) {
        tracing::info!(flow = %flow, "START: {} flow", flow);
    }

    fn finished(&self, flow: AuthFlow, outcome: &FlowOutcome) {
        match outcome {
            FlowOutcome::Completed { account_id } => {
                tracing::info!(flow = %flow, account_id = *account_id, "END: {} flow completed", flow);
            }
            FlowOutcome::Rejected { reason } => {
                tracing::warn!(flow = %flow, reason = %reason, "END: {} flow rejected", flow);
            }
            FlowOutcome::Failed { reason } => {
                tracing::error!(flow = %flow, reason = %reason, "END: {} flow failed", flow);
            }
        }
    }
}
