// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::fmt;

/// An opaque token handed from a before hook to the paired after hook of the same call.
///
/// A correlation is minted by [`Interceptor::before_call`](crate::Interceptor::before_call),
/// held by the middleware while the underlying service runs, and moved into the paired
/// [`Interceptor::after_call`](crate::Interceptor::after_call). It belongs to a single
/// invocation; concurrent calls through the same service stack never observe each
/// other's tokens.
///
/// The middleware never inspects the payload. Only the interceptor that minted the
/// token knows its concrete type and can get it back with [`Correlation::downcast`].
pub struct Correlation(Box<dyn Any + Send>);

impl Correlation {
    /// Wraps a value as a correlation token.
    #[must_use]
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Recovers the payload, returning the token unchanged if the type does not match.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when the token does not hold a `T`.
    pub fn downcast<T: Send + 'static>(self) -> Result<T, Self> {
        match self.0.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(token) => Err(Self(token)),
        }
    }

    /// Borrows the payload if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether the payload is a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Correlation").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Correlation: Send);

    #[test]
    fn downcast_returns_payload() {
        let token = Correlation::new(444_u64);

        assert!(token.is::<u64>());
        assert_eq!(token.downcast_ref::<u64>(), Some(&444));
        assert_eq!(token.downcast::<u64>().expect("type should match"), 444);
    }

    #[test]
    fn downcast_wrong_type_returns_token() {
        let token = Correlation::new("state".to_string());

        let token = token.downcast::<u64>().expect_err("type should not match");
        assert_eq!(
            token.downcast::<String>().expect("type should match"),
            "state"
        );
    }

    #[test]
    fn debug_does_not_expose_payload() {
        let token = Correlation::new(444_u64);
        assert_eq!(format!("{token:?}"), "Correlation { .. }");
    }
}
