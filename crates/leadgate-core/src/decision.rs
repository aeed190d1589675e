// ── Decision ──
//
// What the guard hands back for every submission.

use serde::{Deserialize, Serialize};

use crate::error::{RejectReason, Rejection};

/// Accept or reject, with the record to persist or the reason.
///
/// Serializes as `{"outcome": "accepted", "record": {...}}` or
/// `{"outcome": "rejected", "rejection": {"reason": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision<T> {
    Accepted { record: T },
    Rejected { rejection: Rejection },
}

impl<T> Decision<T> {
    pub fn accepted(record: T) -> Self {
        Self::Accepted { record }
    }

    pub fn rejected(rejection: impl Into<Rejection>) -> Self {
        Self::Rejected {
            rejection: rejection.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The reject reason, if rejected.
    pub fn reason(&self) -> Option<RejectReason> {
        self.rejection().map(|r| r.reason)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected { rejection } => Some(rejection),
            Self::Accepted { .. } => None,
        }
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Accepted { record } => Some(record),
            Self::Rejected { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Self::Accepted { record } => Some(record),
            Self::Rejected { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<T, Rejection> {
        match self {
            Self::Accepted { record } => Ok(record),
            Self::Rejected { rejection } => Err(rejection),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decision<U> {
        match self {
            Self::Accepted { record } => Decision::Accepted { record: f(record) },
            Self::Rejected { rejection } => Decision::Rejected { rejection },
        }
    }
}

impl<T> From<Result<T, Rejection>> for Decision<T> {
    fn from(result: Result<T, Rejection>) -> Self {
        match result {
            Ok(record) => Self::accepted(record),
            Err(rejection) => Self::rejected(rejection),
        }
    }
}
