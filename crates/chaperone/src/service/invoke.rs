// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::service::Service;

/// Adapts an async closure into a [`Service`].
///
/// This is the usual innermost element of a stack: the business logic the
/// surrounding layers wrap.
///
/// # Example
///
/// ```
/// use chaperone::{Invoke, Service};
///
/// # async fn example() {
/// let service = Invoke::new(|name: String| async move { format!("Hello, {name}!") });
/// let greeting = service.invoke("Ferris".to_string()).await;
/// assert_eq!(greeting, "Hello, Ferris!");
/// # }
/// ```
#[derive(Clone)]
pub struct Invoke<F> {
    function: F,
}

impl<F> Invoke<F> {
    /// Wraps an async closure.
    #[must_use]
    pub fn new<In, Fut>(function: F) -> Self
    where
        F: Fn(In) -> Fut + Send + Sync,
        Fut: Future + Send,
    {
        Self { function }
    }
}

impl<In, F, Fut> Service<In> for Invoke<F>
where
    In: Send,
    F: Fn(In) -> Fut + Send + Sync,
    Fut: Future + Send,
{
    type Out = Fut::Output;

    async fn invoke(&self, input: In) -> Self::Out {
        (self.function)(input).await
    }
}

impl<F> fmt::Debug for Invoke<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoke").finish_non_exhaustive()
    }
}

#[cfg(any(feature = "tower-service", test))]
impl<In, F, Fut, Res, Err> tower_service::Service<In> for Invoke<F>
where
    F: Fn(In) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Res, Err>> + Send,
{
    type Response = Res;
    type Error = Err;
    type Future = Fut;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, input: In) -> Self::Future {
        (self.function)(input)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn invokes_the_closure() {
        let service = Invoke::new(|x: u32| async move { x * 2 });
        assert_eq!(block_on(service.invoke(21)), 42);
    }

    #[tokio::test]
    async fn works_as_a_tower_service() {
        use tower::ServiceExt;

        let service = Invoke::new(|x: u32| async move { Ok::<_, &str>(x + 1) });
        let out = service.oneshot(1).await;
        assert_eq!(out, Ok(2));
    }
}
