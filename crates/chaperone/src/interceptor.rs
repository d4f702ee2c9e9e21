// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use crate::{Correlation, Fault};

/// Paired hooks that run around each call of an intercepted operation.
///
/// The middleware invokes [`before_call`](Interceptor::before_call) with the operation
/// name and a shared view of the input before the underlying service runs, and
/// [`after_call`](Interceptor::after_call) with the produced output afterwards. The
/// [`Correlation`] token returned by the before hook is handed to the paired after
/// hook of the same invocation, so an interceptor can carry per-call state without
/// interior mutability.
///
/// Hooks observe the call, they do not rewrite it: both receive shared references and
/// the input and output flow through the middleware untouched. A hook that needs to
/// stop the call returns a [`Fault`] instead.
///
/// One interceptor instance may serve many operations and many concurrent calls, so
/// implementations must be `Send + Sync` and any per-call state belongs in the
/// correlation token.
pub trait Interceptor<In, Out>: Send + Sync {
    /// Runs before the underlying service, optionally minting a correlation token.
    ///
    /// # Errors
    ///
    /// Returning a [`Fault`] aborts the call; the underlying service does not run and
    /// the paired after hook is never invoked.
    fn before_call(&self, operation: &str, input: &In) -> Result<Option<Correlation>, Fault>;

    /// Runs after the underlying service produced an output.
    ///
    /// Receives the correlation token minted by the paired before hook, or `None` if
    /// the before hook did not mint one.
    ///
    /// # Errors
    ///
    /// Returning a [`Fault`] replaces the produced output with the configured fault
    /// output; the fault is reported, never silently swallowed.
    fn after_call(
        &self,
        operation: &str,
        output: &Out,
        correlation: Option<Correlation>,
    ) -> Result<(), Fault>;
}

impl<In, Out, I> Interceptor<In, Out> for Arc<I>
where
    I: Interceptor<In, Out> + ?Sized,
{
    fn before_call(&self, operation: &str, input: &In) -> Result<Option<Correlation>, Fault> {
        (**self).before_call(operation, input)
    }

    fn after_call(
        &self,
        operation: &str,
        output: &Out,
        correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        (**self).after_call(operation, output, correlation)
    }
}

impl<In, Out, I> Interceptor<In, Out> for Box<I>
where
    I: Interceptor<In, Out> + ?Sized,
{
    fn before_call(&self, operation: &str, input: &In) -> Result<Option<Correlation>, Fault> {
        (**self).before_call(operation, input)
    }

    fn after_call(
        &self,
        operation: &str,
        output: &Out,
        correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        (**self).after_call(operation, output, correlation)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicU16, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counting {
        calls: AtomicU16,
    }

    impl Interceptor<u32, u32> for Counting {
        fn before_call(&self, _operation: &str, input: &u32) -> Result<Option<Correlation>, Fault> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Correlation::new(*input)))
        }

        fn after_call(
            &self,
            _operation: &str,
            _output: &u32,
            correlation: Option<Correlation>,
        ) -> Result<(), Fault> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(correlation.is_some());
            Ok(())
        }
    }

    #[test]
    fn arc_and_box_delegate() {
        let arc: Arc<dyn Interceptor<u32, u32>> = Arc::new(Counting::default());
        let token = arc
            .before_call("op", &1)
            .expect("before hook should succeed");
        arc.after_call("op", &2, token)
            .expect("after hook should succeed");

        let boxed: Box<dyn Interceptor<u32, u32>> = Box::new(Counting::default());
        let token = boxed
            .before_call("op", &1)
            .expect("before hook should succeed");
        boxed
            .after_call("op", &2, token)
            .expect("after hook should succeed");
    }
}
