// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use crate::service::Service;

/// A [`Service`] with its concrete type erased.
///
/// Composed stacks have deeply nested types that differ per operation. Erasing them
/// lets heterogeneous stacks share one collection, at the cost of a boxed future per
/// call. Cloning is cheap; clones share the underlying service.
pub struct DynamicService<In, Out> {
    inner: Arc<dyn ErasedService<In, Out>>,
}

impl<In, Out> DynamicService<In, Out>
where
    In: Send + 'static,
    Out: 'static,
{
    /// Erases the concrete type of the given service.
    #[must_use]
    pub fn new<S>(service: S) -> Self
    where
        S: Service<In, Out = Out> + 'static,
    {
        Self {
            inner: Arc::new(service),
        }
    }
}

impl<In, Out> Service<In> for DynamicService<In, Out>
where
    In: Send,
    Out: Send,
{
    type Out = Out;

    async fn invoke(&self, input: In) -> Self::Out {
        self.inner.invoke_boxed(input).await
    }
}

impl<In, Out> Clone for DynamicService<In, Out> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<In, Out> fmt::Debug for DynamicService<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicService").finish_non_exhaustive()
    }
}

/// Convenience conversion into a [`DynamicService`].
pub trait DynamicServiceExt<In, Out>: Service<In, Out = Out> + Sized {
    /// Erases the concrete type of this service.
    #[must_use]
    fn into_dynamic(self) -> DynamicService<In, Out>;
}

impl<In, Out, S> DynamicServiceExt<In, Out> for S
where
    In: Send + 'static,
    Out: 'static,
    S: Service<In, Out = Out> + 'static,
{
    fn into_dynamic(self) -> DynamicService<In, Out> {
        DynamicService::new(self)
    }
}

/// Object-safe mirror of [`Service`] that boxes the returned future.
trait ErasedService<In, Out>: Send + Sync {
    fn invoke_boxed<'a>(&'a self, input: In) -> Pin<Box<dyn Future<Output = Out> + Send + 'a>>
    where
        In: 'a;
}

impl<In, Out, S> ErasedService<In, Out> for S
where
    In: Send,
    S: Service<In, Out = Out>,
{
    fn invoke_boxed<'a>(&'a self, input: In) -> Pin<Box<dyn Future<Output = Out> + Send + 'a>>
    where
        In: 'a,
    {
        Box::pin(self.invoke(input))
    }
}
