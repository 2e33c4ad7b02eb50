//! Terminal result of a run

use crate::error::RequestError;

/// Produced once per run; the process exit status is derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success { status: u16 },
    Failure { attempts: u32, last_error: RequestError },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Status of the last response received, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status } => Some(*status),
            Self::Failure { last_error, .. } => last_error.status(),
        }
    }
}
