use std::fmt;

use crate::gate::DenyReason;
use crate::policy::Action;
use crate::store::StoreError;
use crate::validate::ValidationError;

/// Errors that can occur while handling a blog request.
#[derive(Debug)]
pub enum Error {
    /// The gate denied the action
    Violation(Violation),
    /// A submitted form field was rejected
    Validation(ValidationError),
    /// The storage collaborator refused the operation
    Store(StoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Violation(v) => write!(f, "Policy violation: {}", v),
            Error::Validation(e) => write!(f, "Invalid input: {}", e),
            Error::Store(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Violation(v) => Some(v),
            Error::Validation(e) => Some(e),
            Error::Store(e) => Some(e),
        }
    }
}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Error::Violation(v)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

/// A gate denial expressed as an error, for `?`-style flows.
///
/// Denial is an ordinary outcome: callers redirect to the login page or
/// back home with a notice. It is never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The action that was refused.
    pub fn action(&self) -> Action {
        match self.kind {
            ViolationKind::Unauthenticated { action } => action,
            ViolationKind::AdministratorOnly { action } => action,
        }
    }

    /// The gate's reason for refusing.
    pub fn reason(&self) -> DenyReason {
        match self.kind {
            ViolationKind::Unauthenticated { .. } => DenyReason::AuthenticationRequired,
            ViolationKind::AdministratorOnly { .. } => DenyReason::AdministratorOnly,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Authentication is required but missing
    Unauthenticated {
        /// The action that was attempted
        action: Action,
    },
    /// The action is reserved to the administrator
    AdministratorOnly {
        /// The action that was attempted
        action: Action,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthenticated { action } => {
                write!(f, "Unauthenticated for '{}'", action)
            }
            ViolationKind::AdministratorOnly { action } => {
                write!(f, "Administrator only for '{}'", action)
            }
        }
    }
}
