// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

const DEFAULT_SERVICE_NAME: &str = "default";

/// Shared configuration for all operations of one logical service.
///
/// A context carries the service name used in telemetry and the settings that apply
/// uniformly across the service's operations. Create one context per logical service
/// and pass it to each middleware constructor.
pub struct ServiceContext<In, Out> {
    name: Cow<'static, str>,
    logs_enabled: bool,
    _input: PhantomData<fn() -> In>,
    _output: PhantomData<fn() -> Out>,
}

impl<In, Out> ServiceContext<In, Out> {
    /// Creates a context with the default service name and logs disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed(DEFAULT_SERVICE_NAME),
            logs_enabled: false,
            _input: PhantomData,
            _output: PhantomData,
        }
    }

    /// Sets the service name reported in telemetry.
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables log output for faults raised by this service's operations.
    #[cfg(any(feature = "logs", test))]
    #[must_use]
    pub fn enable_logs(mut self) -> Self {
        self.logs_enabled = true;
        self
    }

    #[cfg(any(feature = "logs", test))]
    pub(crate) fn create_telemetry(&self) -> crate::utils::TelemetryHelper {
        crate::utils::TelemetryHelper {
            service_name: self.name.clone(),
            logs_enabled: self.logs_enabled,
        }
    }
}

impl<In, Out> Default for ServiceContext<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In, Out> Clone for ServiceContext<In, Out> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            logs_enabled: self.logs_enabled,
            _input: PhantomData,
            _output: PhantomData,
        }
    }
}

impl<In, Out> fmt::Debug for ServiceContext<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("name", &self.name)
            .field("logs_enabled", &self.logs_enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(ServiceContext<u32, u32>: Send, Sync, Clone);

    #[test]
    fn defaults() {
        let context = ServiceContext::<u32, u32>::new();
        let telemetry = context.create_telemetry();
        assert_eq!(telemetry.service_name, DEFAULT_SERVICE_NAME);
        assert!(!telemetry.logs_enabled);
    }

    #[test]
    fn builder_applies_settings() {
        let context = ServiceContext::<u32, u32>::new()
            .name("greeter")
            .enable_logs();

        let telemetry = context.create_telemetry();
        assert_eq!(telemetry.service_name, "greeter");
        assert!(telemetry.logs_enabled);
    }
}
