// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::error::Error as StdError;

/// A call-level failure raised by an interception hook.
///
/// Raised from a before hook, a fault aborts the call before the underlying service
/// runs. Raised from an after hook, it replaces the output the service already
/// produced. In both cases the middleware turns the fault into a caller-visible
/// output through the configured fault output function.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    message: Cow<'static, str>,

    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Fault {
    /// Creates a fault with the given message.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a fault with the given message and an underlying error as its source.
    #[must_use]
    pub fn with_source(
        message: impl Into<Cow<'static, str>>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a fault from an underlying error, using the error's display output as
    /// the fault message and keeping the error as the source.
    #[must_use]
    pub fn from_error(error: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: Cow::Owned(error.to_string()),
            source: Some(Box::new(error)),
        }
    }

    /// The human-readable fault message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::error::Error;
    use std::io;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Fault: Send, Sync, Error);

    #[test]
    fn new_carries_message() {
        let fault = Fault::new("access denied");
        assert_eq!(fault.message(), "access denied");
        assert_eq!(fault.to_string(), "access denied");
        assert!(fault.source().is_none());
    }

    #[test]
    fn with_source_keeps_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "locked");
        let fault = Fault::with_source("access denied", io_error);

        assert_eq!(fault.to_string(), "access denied");
        let source = fault.source().expect("source should be set");
        assert_eq!(source.to_string(), "locked");
    }

    #[test]
    fn from_error_uses_error_display() {
        let io_error = io::Error::new(io::ErrorKind::TimedOut, "deadline passed");
        let fault = Fault::from_error(io_error);

        assert_eq!(fault.message(), "deadline passed");
        assert!(fault.source().is_some());
    }
}
