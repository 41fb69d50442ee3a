use async_graphql::{Error, ErrorExtensions};
use sea_orm::DbErr;
use thiserror::Error;

/// Refusals raised by the pure pipeline core. Neither kind ever touches storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{0}")]
    PermissionDenied(String),
    #[error("{0}")]
    ValidationFailed(String),
}

impl PipelineError {
    pub fn denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("login required")]
    Unauthenticated,
    /// Storage failures are surfaced with the backend's own message.
    #[error("{0}")]
    PersistenceFailure(#[from] DbErr),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Pipeline(PipelineError::PermissionDenied(_)) => "PERMISSION_DENIED",
            ServiceError::Pipeline(PipelineError::ValidationFailed(_)) => "VALIDATION_FAILED",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Unauthenticated => "UNAUTHENTICATED",
            ServiceError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ServiceError::Pipeline(PipelineError::PermissionDenied(_)))
    }

    pub fn is_validation_failed(&self) -> bool {
        matches!(self, ServiceError::Pipeline(PipelineError::ValidationFailed(_)))
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> Error {
        let code = self.code();
        Error::new(self.to_string()).extend_with(|_err, e| e.set("code", code))
    }
}

impl ErrorExtensions for PipelineError {
    fn extend(&self) -> Error {
        ServiceError::from(self.clone()).extend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    fn code_of(err: &Error) -> Option<Value> {
        err.extensions
            .as_ref()
            .and_then(|map| map.get("code"))
            .cloned()
    }

    #[test]
    fn permission_denied_keeps_message_and_code() {
        let err = ServiceError::from(PipelineError::denied("seller cannot move at this stage"))
            .extend();
        assert_eq!(err.message, "seller cannot move at this stage");
        assert_eq!(code_of(&err), Some(Value::from("PERMISSION_DENIED")));
    }

    #[test]
    fn persistence_failures_are_surfaced_verbatim() {
        let err = ServiceError::from(DbErr::Custom("duplicate key value".into())).extend();
        assert!(err.message.contains("duplicate key value"));
        assert_eq!(code_of(&err), Some(Value::from("PERSISTENCE_FAILURE")));
    }
}
