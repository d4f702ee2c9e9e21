// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::intercept::service::InterceptShared;
use crate::intercept::{FaultOutput, FaultOutputArgs, Intercept, NotSet, OnFault, OnFaultArgs, Set};
use crate::service::Layer;
use crate::utils::EnableIf;
use crate::{Fault, ServiceContext};

/// Builder for the [`Intercept`] middleware.
///
/// Created by [`Intercept`]'s associated functions. The `S1` type state tracks
/// whether the fault output has been provided; only a fully configured layer
/// (`S1 = Set`) implements [`Layer`] and can wrap a service.
#[derive(Debug)]
pub struct InterceptLayer<In, Out, R, S1 = Set> {
    operation: Cow<'static, str>,
    resolver: Arc<R>,
    fault_output: Option<FaultOutput<Out>>,
    on_fault: Option<OnFault<Out>>,
    enable_if: EnableIf<In>,

    #[cfg(any(feature = "logs", test))]
    telemetry: crate::utils::TelemetryHelper,

    _state: PhantomData<fn(In, S1) -> Out>,
}

impl<In, Out, R> InterceptLayer<In, Out, R, NotSet> {
    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(unused_variables, reason = "context is only read when telemetry is enabled")
    )]
    pub(crate) fn new(
        operation: Cow<'static, str>,
        resolver: R,
        context: &ServiceContext<In, Out>,
    ) -> Self {
        Self {
            operation,
            resolver: Arc::new(resolver),
            fault_output: None,
            on_fault: None,
            enable_if: EnableIf::always(),

            #[cfg(any(feature = "logs", test))]
            telemetry: context.create_telemetry(),

            _state: PhantomData,
        }
    }
}

impl<In, Out, R, S1> InterceptLayer<In, Out, R, S1> {
    /// Sets the function that produces the caller-visible output for a faulted call.
    ///
    /// Required. A fault raised by a before hook aborts the call and this function's
    /// output is returned instead; a fault raised by an after hook replaces the
    /// output the service produced.
    #[must_use]
    pub fn fault_output(
        mut self,
        fault_output: impl Fn(FaultOutputArgs) -> Out + Send + Sync + 'static,
    ) -> InterceptLayer<In, Out, R, Set> {
        self.fault_output = Some(FaultOutput::new(fault_output));
        self.into_state()
    }

    /// Sets a callback observing every faulted call after the fault output has been
    /// produced.
    #[must_use]
    pub fn on_fault(
        mut self,
        on_fault: impl Fn(&Out, OnFaultArgs) + Send + Sync + 'static,
    ) -> Self {
        self.on_fault = Some(OnFault::new(on_fault));
        self
    }

    /// Sets a predicate deciding per call whether interception applies.
    ///
    /// Calls for which the predicate returns false bypass the hooks entirely.
    #[must_use]
    pub fn enable_if(mut self, enable_if: impl Fn(&In) -> bool + Send + Sync + 'static) -> Self {
        self.enable_if = EnableIf::new(enable_if);
        self
    }

    /// Enables interception for every call. This is the default.
    #[must_use]
    pub fn enable_always(mut self) -> Self {
        self.enable_if = EnableIf::always();
        self
    }

    /// Disables interception for every call; the middleware becomes a pass-through.
    #[must_use]
    pub fn disable(mut self) -> Self {
        self.enable_if = EnableIf::never();
        self
    }

    pub(crate) fn with_operation(mut self, operation: Cow<'static, str>) -> Self {
        self.operation = operation;
        self
    }

    fn into_state<T1>(self) -> InterceptLayer<In, Out, R, T1> {
        InterceptLayer {
            operation: self.operation,
            resolver: self.resolver,
            fault_output: self.fault_output,
            on_fault: self.on_fault,
            enable_if: self.enable_if,

            #[cfg(any(feature = "logs", test))]
            telemetry: self.telemetry,

            _state: PhantomData,
        }
    }
}

impl<In, Out, Err, R, S1> InterceptLayer<In, Result<Out, Err>, R, S1> {
    /// Sets the error the caller receives for a faulted call.
    ///
    /// Shorthand for [`fault_output`](Self::fault_output) on services whose output
    /// is a `Result`.
    #[must_use]
    pub fn fault_error(
        self,
        fault_error: impl Fn(FaultOutputArgs) -> Err + Send + Sync + 'static,
    ) -> InterceptLayer<In, Result<Out, Err>, R, Set> {
        self.fault_output(move |args| Err(fault_error(args)))
    }

    /// Converts faults into the caller's error type via its `From<Fault>` impl.
    #[must_use]
    pub fn fault_into_error(self) -> InterceptLayer<In, Result<Out, Err>, R, Set>
    where
        Err: From<Fault>,
    {
        self.fault_output(|args| Err(Err::from(args.into_fault())))
    }
}

impl<In, Out, R, S1> Clone for InterceptLayer<In, Out, R, S1> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            resolver: Arc::clone(&self.resolver),
            fault_output: self.fault_output.clone(),
            on_fault: self.on_fault.clone(),
            enable_if: self.enable_if.clone(),

            #[cfg(any(feature = "logs", test))]
            telemetry: self.telemetry.clone(),

            _state: PhantomData,
        }
    }
}

impl<In, Out, S, R> Layer<S> for InterceptLayer<In, Out, R, Set> {
    type Service = Intercept<In, Out, S, R>;

    fn layer(&self, inner: S) -> Self::Service {
        Intercept {
            shared: Arc::new(InterceptShared {
                operation: self.operation.clone(),
                resolver: Arc::clone(&self.resolver),
                fault_output: self
                    .fault_output
                    .clone()
                    .expect("fault_output must be set in the Set state"),
                on_fault: self.on_fault.clone(),
                enable_if: self.enable_if.clone(),

                #[cfg(any(feature = "logs", test))]
                telemetry: self.telemetry.clone(),
            }),
            inner,
        }
    }
}
