//! Logging handle injected into services.

use std::fmt::{Debug, Display};

use tracing::Span;

/// Records failed operations under the span a service was built with.
///
/// The subscriber is installed once at startup; services never reach for a
/// global logger of their own.
#[derive(Clone, Debug)]
pub struct OperationLog {
    span: Span,
}

impl OperationLog {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// A log whose events are attached to no span.
    pub fn detached() -> Self {
        Self { span: Span::none() }
    }

    /// Pass `result` through, emitting a warning if it is an error.
    pub fn record<T, E>(&self, operation: &'static str, result: Result<T, E>) -> Result<T, E>
    where
        E: Debug + Display,
    {
        if let Err(ref error) = result {
            tracing::warn!(
                parent: &self.span,
                operation,
                error = %error,
                detail = ?error,
                "Account operation failed"
            );
        }
        result
    }
}
