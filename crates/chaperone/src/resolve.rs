// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::Interceptor;

/// Strategy for locating the interceptor that applies to a call.
///
/// The middleware consults its resolver once per call, handing it a reference to the
/// underlying service so the service itself can act as the interceptor. Returning
/// `None` makes the call pass through with no hooks.
pub trait Resolve<In, Out, S>: Send + Sync {
    /// Returns the interceptor for the current call, or `None` for pass-through.
    fn resolve<'a>(&'a self, service: &'a S) -> Option<&'a dyn Interceptor<In, Out>>;
}

type InterceptorFactory<In, Out> = Box<dyn Fn() -> Arc<dyn Interceptor<In, Out>> + Send + Sync>;

/// Resolves to an explicitly configured interceptor, independent of the service
/// being wrapped.
///
/// The interceptor is constructed lazily on the first call and cached for the
/// lifetime of the resolver, so every call through every operation sharing this
/// resolver observes the same instance. Construction happens at most once even
/// under concurrent first calls.
pub struct Configured<In, Out> {
    factory: InterceptorFactory<In, Out>,
    instance: OnceLock<Arc<dyn Interceptor<In, Out>>>,
}

impl<In: 'static, Out: 'static> Configured<In, Out> {
    /// Resolves to a lazily constructed `I::default()`.
    #[must_use]
    pub fn of<I>() -> Self
    where
        I: Interceptor<In, Out> + Default + 'static,
    {
        Self::with_factory(I::default)
    }

    /// Resolves to an interceptor produced by the given factory.
    ///
    /// The factory runs at most once; its product is cached and shared.
    #[must_use]
    pub fn with_factory<I, F>(factory: F) -> Self
    where
        I: Interceptor<In, Out> + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(move || -> Arc<dyn Interceptor<In, Out>> { Arc::new(factory()) }),
            instance: OnceLock::new(),
        }
    }

    /// Resolves to an already constructed interceptor.
    #[must_use]
    pub fn instance(instance: Arc<dyn Interceptor<In, Out>>) -> Self {
        Self {
            factory: Box::new(move || Arc::clone(&instance)),
            instance: OnceLock::new(),
        }
    }

    pub(crate) fn get(&self) -> &Arc<dyn Interceptor<In, Out>> {
        self.instance.get_or_init(|| (self.factory)())
    }
}

impl<In: 'static, Out: 'static, S> Resolve<In, Out, S> for Configured<In, Out> {
    fn resolve<'a>(&'a self, _service: &'a S) -> Option<&'a dyn Interceptor<In, Out>> {
        Some(self.get().as_ref())
    }
}

impl<In, Out> fmt::Debug for Configured<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configured")
            .field("constructed", &self.instance.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Resolves to the wrapped service itself.
///
/// Usable only when the service type implements [`Interceptor`] for its own input
/// and output, which the compiler enforces at stack construction time. The service
/// reference is used directly on every call; nothing is constructed or cached.
#[derive(Clone, Copy, Debug, Default)]
pub struct FromService;

impl<In, Out, S> Resolve<In, Out, S> for FromService
where
    S: Interceptor<In, Out>,
{
    fn resolve<'a>(&'a self, service: &'a S) -> Option<&'a dyn Interceptor<In, Out>> {
        Some(service)
    }
}
