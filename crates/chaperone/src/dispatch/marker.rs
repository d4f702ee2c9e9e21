// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::intercept::{FaultOutputArgs, InterceptLayer, NotSet, OnFaultArgs, Set};
use crate::resolve::Configured;
use crate::{Fault, Intercept, Interceptor, ServiceContext};

/// A named, reusable piece of interception configuration.
///
/// A marker bundles an interceptor resolution strategy with the middleware settings
/// and can be attached to operations through a
/// [`Dispatcher`](crate::dispatch::Dispatcher). All operations a marker is attached
/// to share its resolver, so a lazily constructed interceptor is built once and
/// reused across them.
///
/// The marker's name is its identity: a dispatcher never attaches two markers with
/// the same name to one operation.
pub struct Marker<In, Out, R, S1 = Set> {
    name: Cow<'static, str>,
    layer: InterceptLayer<In, Out, R, S1>,
}

impl<In: 'static, Out: 'static> Marker<In, Out, Configured<In, Out>, NotSet> {
    /// Marks operations for interception by a lazily constructed `I::default()`.
    #[must_use]
    pub fn with<I>(name: impl Into<Cow<'static, str>>, context: &ServiceContext<In, Out>) -> Self
    where
        I: Interceptor<In, Out> + Default + 'static,
    {
        let name = name.into();
        Self {
            layer: Intercept::with::<I>(name.clone(), context),
            name,
        }
    }

    /// Marks operations for interception by an interceptor produced by the given
    /// factory. The factory runs at most once across all attached operations.
    #[must_use]
    pub fn with_factory<I, F>(
        name: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
        factory: F,
    ) -> Self
    where
        I: Interceptor<In, Out> + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            layer: Intercept::with_factory(name.clone(), context, factory),
            name,
        }
    }

    /// Marks operations for interception by an already constructed interceptor.
    #[must_use]
    pub fn with_instance(
        name: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
        instance: Arc<dyn Interceptor<In, Out>>,
    ) -> Self {
        let name = name.into();
        Self {
            layer: Intercept::with_instance(name.clone(), context, instance),
            name,
        }
    }
}

impl<In: 'static, Out: 'static, R> Marker<In, Out, R, NotSet> {
    /// Marks operations for interception by a custom resolution strategy.
    ///
    /// A dispatcher only accepts markers whose strategy resolves against the
    /// type-erased services it holds; see [`Dispatcher::attach`](crate::dispatch::Dispatcher::attach).
    #[must_use]
    pub fn with_resolver(
        name: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
        resolver: R,
    ) -> Self {
        let name = name.into();
        Self {
            layer: Intercept::with_resolver(name.clone(), context, resolver),
            name,
        }
    }
}

impl<In, Out, R, S1> Marker<In, Out, R, S1> {
    /// The marker's name, which is also the operation name hooks receive when the
    /// marker is attached service-wide.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the function that produces the caller-visible output for a faulted call.
    #[must_use]
    pub fn fault_output(
        self,
        fault_output: impl Fn(FaultOutputArgs) -> Out + Send + Sync + 'static,
    ) -> Marker<In, Out, R, Set> {
        Marker {
            name: self.name,
            layer: self.layer.fault_output(fault_output),
        }
    }

    /// Sets a callback observing every faulted call.
    #[must_use]
    pub fn on_fault(self, on_fault: impl Fn(&Out, OnFaultArgs) + Send + Sync + 'static) -> Self {
        Self {
            name: self.name,
            layer: self.layer.on_fault(on_fault),
        }
    }

    /// Sets a predicate deciding per call whether interception applies.
    #[must_use]
    pub fn enable_if(self, enable_if: impl Fn(&In) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: self.name,
            layer: self.layer.enable_if(enable_if),
        }
    }
}

impl<In, Out, Err, R, S1> Marker<In, Result<Out, Err>, R, S1> {
    /// Sets the error the caller receives for a faulted call.
    #[must_use]
    pub fn fault_error(
        self,
        fault_error: impl Fn(FaultOutputArgs) -> Err + Send + Sync + 'static,
    ) -> Marker<In, Result<Out, Err>, R, Set> {
        Marker {
            name: self.name,
            layer: self.layer.fault_error(fault_error),
        }
    }

    /// Converts faults into the caller's error type via its `From<Fault>` impl.
    #[must_use]
    pub fn fault_into_error(self) -> Marker<In, Result<Out, Err>, R, Set>
    where
        Err: From<Fault>,
    {
        Marker {
            name: self.name,
            layer: self.layer.fault_into_error(),
        }
    }
}

impl<In, Out, R> Marker<In, Out, R, Set> {
    /// Mints the middleware layer for one operation.
    ///
    /// The layer reports the given operation name to hooks and shares this marker's
    /// resolver.
    #[must_use]
    pub fn layer_for(&self, operation: impl Into<Cow<'static, str>>) -> InterceptLayer<In, Out, R, Set> {
        self.layer.clone().with_operation(operation.into())
    }
}

impl<In, Out, R, S1> Clone for Marker<In, Out, R, S1> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            layer: self.layer.clone(),
        }
    }
}

impl<In, Out, R, S1> fmt::Debug for Marker<In, Out, R, S1> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker").field("name", &self.name).finish_non_exhaustive()
    }
}
