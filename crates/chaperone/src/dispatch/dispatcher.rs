// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::dispatch::Marker;
use crate::intercept::Set;
use crate::resolve::Resolve;
use crate::service::{DynamicService, DynamicServiceExt, Layer, Service};

/// Errors raised while building or using a dispatch table.
///
/// Registration problems surface here, at build time, rather than on the first
/// dispatched call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// No operation with the given name has been registered.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// An operation with the given name has already been registered.
    #[error("operation `{0}` is already registered")]
    DuplicateOperation(String),

    /// The operation already carries a marker with the given name.
    #[error("marker `{marker}` is already attached to operation `{operation}`")]
    AlreadyAttached {
        /// The marker's name.
        marker: String,

        /// The operation's name.
        operation: String,
    },
}

/// Maps operation names to services and attaches interception markers to them.
///
/// The dispatcher is the registration surface: services are registered under
/// operation names, markers are attached while the table is being built, and
/// [`dispatch`](Dispatcher::dispatch) routes a call to the operation's composed
/// service. Operations without markers dispatch straight to their service; the cost
/// of interception is paid only by the operations that opted in.
pub struct Dispatcher<In, Out> {
    operations: BTreeMap<Cow<'static, str>, Operation<In, Out>>,
}

struct Operation<In, Out> {
    name: Cow<'static, str>,
    service: DynamicService<In, Out>,
    markers: Vec<Box<str>>,
}

impl<In, Out> Dispatcher<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Creates an empty dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: BTreeMap::new(),
        }
    }

    /// Registers a service under an operation name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicateOperation`] when the name is taken.
    pub fn register<S>(
        &mut self,
        operation: impl Into<Cow<'static, str>>,
        service: S,
    ) -> Result<(), DispatchError>
    where
        S: Service<In, Out = Out> + 'static,
    {
        let name = operation.into();
        if self.operations.contains_key(&name) {
            return Err(DispatchError::DuplicateOperation(name.into_owned()));
        }

        let _ = self.operations.insert(
            name.clone(),
            Operation {
                name,
                service: service.into_dynamic(),
                markers: Vec::new(),
            },
        );

        Ok(())
    }

    /// Attaches a marker to a single operation.
    ///
    /// Hooks minted by this attachment receive the operation's name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownOperation`] when no such operation is
    /// registered, and [`DispatchError::AlreadyAttached`] when the operation already
    /// carries a marker with the same name.
    pub fn attach<R>(
        &mut self,
        operation: &str,
        marker: &Marker<In, Out, R, Set>,
    ) -> Result<(), DispatchError>
    where
        R: Resolve<In, Out, DynamicService<In, Out>> + 'static,
    {
        let entry = self
            .operations
            .get_mut(operation)
            .ok_or_else(|| DispatchError::UnknownOperation(operation.to_string()))?;

        if entry.carries(marker.name()) {
            return Err(DispatchError::AlreadyAttached {
                marker: marker.name().to_string(),
                operation: operation.to_string(),
            });
        }

        entry.wrap(marker);
        Ok(())
    }

    /// Attaches a marker to every registered operation, skipping operations that
    /// already carry a marker with the same name.
    ///
    /// The skip makes service-wide attachment composable with per-operation
    /// attachment: configure individual operations first, then attach the marker to
    /// the rest of the service without double-wrapping them.
    pub fn attach_all<R>(&mut self, marker: &Marker<In, Out, R, Set>)
    where
        R: Resolve<In, Out, DynamicService<In, Out>> + 'static,
    {
        for entry in self.operations.values_mut() {
            if entry.carries(marker.name()) {
                continue;
            }
            entry.wrap(marker);
        }
    }

    /// Routes a call to the named operation's composed service.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownOperation`] when no such operation is
    /// registered.
    pub async fn dispatch(&self, operation: &str, input: In) -> Result<Out, DispatchError> {
        let entry = self
            .operations
            .get(operation)
            .ok_or_else(|| DispatchError::UnknownOperation(operation.to_string()))?;

        Ok(entry.service.invoke(input).await)
    }

    /// The composed service registered under the given operation name.
    #[must_use]
    pub fn service(&self, operation: &str) -> Option<&DynamicService<In, Out>> {
        self.operations.get(operation).map(|entry| &entry.service)
    }

    /// Whether an operation with the given name is registered.
    #[must_use]
    pub fn contains(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    /// The registered operation names, in lexicographic order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(Cow::as_ref)
    }

    /// The number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no operations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<In, Out> Default for Dispatcher<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<In, Out> fmt::Debug for Dispatcher<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<In, Out> Operation<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    fn carries(&self, marker_name: &str) -> bool {
        self.markers.iter().any(|name| **name == *marker_name)
    }

    fn wrap<R>(&mut self, marker: &Marker<In, Out, R, Set>)
    where
        R: Resolve<In, Out, DynamicService<In, Out>> + 'static,
    {
        let layer = marker.layer_for(self.name.clone());
        self.service = layer.layer(self.service.clone()).into_dynamic();
        self.markers.push(Box::from(marker.name()));
    }
}
