// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::service::Layer;

/// Composes a tuple of layers and an innermost service into a single service.
///
/// A stack is written outside-in: the first element of the tuple becomes the
/// outermost layer and the last element is the service being wrapped. Tuples of up
/// to eight layers are supported; deeper stacks nest another tuple as the innermost
/// element.
///
/// # Example
///
/// ```
/// use chaperone::{Invoke, Service, Stack};
/// use tower_layer::Identity;
///
/// # async fn example() {
/// let stack = (
///     Identity::new(),
///     Invoke::new(|x: u32| async move { x + 1 }),
/// );
/// let service = stack.build();
/// assert_eq!(service.invoke(1).await, 2);
/// # }
/// ```
pub trait Stack {
    /// The composed service produced by [`build`](Stack::build).
    type Service;

    /// Applies each layer, outermost first, and returns the composed service.
    fn build(self) -> Self::Service;
}

impl<L1, S> Stack for (L1, S)
where
    L1: Layer<S>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, service) = self;
        l1.layer(service)
    }
}

impl<L1, L2, S> Stack for (L1, L2, S)
where
    (L2, S): Stack,
    L1: Layer<<(L2, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, service) = self;
        l1.layer((l2, service).build())
    }
}

impl<L1, L2, L3, S> Stack for (L1, L2, L3, S)
where
    (L2, L3, S): Stack,
    L1: Layer<<(L2, L3, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, l3, service) = self;
        l1.layer((l2, l3, service).build())
    }
}

impl<L1, L2, L3, L4, S> Stack for (L1, L2, L3, L4, S)
where
    (L2, L3, L4, S): Stack,
    L1: Layer<<(L2, L3, L4, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, l3, l4, service) = self;
        l1.layer((l2, l3, l4, service).build())
    }
}

impl<L1, L2, L3, L4, L5, S> Stack for (L1, L2, L3, L4, L5, S)
where
    (L2, L3, L4, L5, S): Stack,
    L1: Layer<<(L2, L3, L4, L5, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, l3, l4, l5, service) = self;
        l1.layer((l2, l3, l4, l5, service).build())
    }
}

impl<L1, L2, L3, L4, L5, L6, S> Stack for (L1, L2, L3, L4, L5, L6, S)
where
    (L2, L3, L4, L5, L6, S): Stack,
    L1: Layer<<(L2, L3, L4, L5, L6, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, l3, l4, l5, l6, service) = self;
        l1.layer((l2, l3, l4, l5, l6, service).build())
    }
}

impl<L1, L2, L3, L4, L5, L6, L7, S> Stack for (L1, L2, L3, L4, L5, L6, L7, S)
where
    (L2, L3, L4, L5, L6, L7, S): Stack,
    L1: Layer<<(L2, L3, L4, L5, L6, L7, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, l3, l4, l5, l6, l7, service) = self;
        l1.layer((l2, l3, l4, l5, l6, l7, service).build())
    }
}

impl<L1, L2, L3, L4, L5, L6, L7, L8, S> Stack for (L1, L2, L3, L4, L5, L6, L7, L8, S)
where
    (L2, L3, L4, L5, L6, L7, L8, S): Stack,
    L1: Layer<<(L2, L3, L4, L5, L6, L7, L8, S) as Stack>::Service>,
{
    type Service = L1::Service;

    fn build(self) -> Self::Service {
        let (l1, l2, l3, l4, l5, l6, l7, l8, service) = self;
        l1.layer((l2, l3, l4, l5, l6, l7, l8, service).build())
    }
}
