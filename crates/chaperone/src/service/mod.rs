// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The minimal service model the interception middleware wraps.
//!
//! A [`Service`] takes one input and asynchronously produces one output. Middleware
//! wraps services via [`Layer`], and [`Stack`] turns a tuple of layers plus an
//! innermost service into a single composed service. [`DynamicService`] erases a
//! service's concrete type so heterogeneous stacks can live side by side in one
//! collection.

mod dynamic;
mod invoke;
mod stack;

pub use dynamic::{DynamicService, DynamicServiceExt};
pub use invoke::Invoke;
pub use stack::Stack;
pub use tower_layer::Layer;

/// An asynchronous function of one input.
pub trait Service<In>: Send + Sync {
    /// The output produced for each input.
    type Out;

    /// Handles one input and produces one output.
    fn invoke(&self, input: In) -> impl Future<Output = Self::Out> + Send;
}

impl<In, S> Service<In> for &S
where
    In: Send,
    S: Service<In> + ?Sized,
{
    type Out = S::Out;

    async fn invoke(&self, input: In) -> Self::Out {
        (**self).invoke(input).await
    }
}

impl<In, S> Service<In> for Box<S>
where
    In: Send,
    S: Service<In> + ?Sized,
{
    type Out = S::Out;

    async fn invoke(&self, input: In) -> Self::Out {
        (**self).invoke(input).await
    }
}

impl<In, S> Service<In> for std::sync::Arc<S>
where
    In: Send,
    S: Service<In> + ?Sized,
{
    type Out = S::Out;

    async fn invoke(&self, input: In) -> Self::Out {
        (**self).invoke(input).await
    }
}
