// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;

use crate::intercept::{
    FaultOutput, FaultOutputArgs, FaultStage, InterceptLayer, NotSet, OnFault, OnFaultArgs,
};
use crate::resolve::{Configured, FromService, Resolve};
use crate::service::Service;
use crate::utils::EnableIf;
use crate::{Fault, Interceptor, ServiceContext};

/// Middleware that runs paired interception hooks around each call to the inner
/// service.
///
/// See the [module documentation](crate::intercept) for an overview and examples.
#[derive(Debug)]
pub struct Intercept<In, Out, S, R> {
    pub(super) shared: Arc<InterceptShared<In, Out, R>>,
    pub(super) inner: S,
}

#[derive(Debug)]
pub(super) struct InterceptShared<In, Out, R> {
    pub(super) operation: Cow<'static, str>,
    pub(super) resolver: Arc<R>,
    pub(super) fault_output: FaultOutput<Out>,
    pub(super) on_fault: Option<OnFault<Out>>,
    pub(super) enable_if: EnableIf<In>,

    #[cfg(any(feature = "logs", test))]
    pub(super) telemetry: crate::utils::TelemetryHelper,
}

impl<In: 'static, Out: 'static> Intercept<In, Out, (), ()> {
    /// Intercepts with a lazily constructed `I::default()`.
    ///
    /// The interceptor is constructed on the first call and reused for the lifetime
    /// of the resulting layer and all of its clones.
    #[must_use]
    pub fn with<I>(
        operation: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
    ) -> InterceptLayer<In, Out, Configured<In, Out>, NotSet>
    where
        I: Interceptor<In, Out> + Default + 'static,
    {
        InterceptLayer::new(operation.into(), Configured::of::<I>(), context)
    }

    /// Intercepts with an interceptor produced by the given factory.
    ///
    /// The factory runs at most once, on the first call.
    #[must_use]
    pub fn with_factory<I, F>(
        operation: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
        factory: F,
    ) -> InterceptLayer<In, Out, Configured<In, Out>, NotSet>
    where
        I: Interceptor<In, Out> + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        InterceptLayer::new(operation.into(), Configured::with_factory(factory), context)
    }

    /// Intercepts with an already constructed interceptor.
    #[must_use]
    pub fn with_instance(
        operation: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
        instance: Arc<dyn Interceptor<In, Out>>,
    ) -> InterceptLayer<In, Out, Configured<In, Out>, NotSet> {
        InterceptLayer::new(operation.into(), Configured::instance(instance), context)
    }

    /// Intercepts with the wrapped service itself.
    ///
    /// The resulting layer only wraps services that implement
    /// [`Interceptor`]`<In, Out>`; anything else is rejected at compile time.
    #[must_use]
    pub fn from_service(
        operation: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
    ) -> InterceptLayer<In, Out, FromService, NotSet> {
        InterceptLayer::new(operation.into(), FromService, context)
    }

    /// Intercepts with a custom resolution strategy.
    #[must_use]
    pub fn with_resolver<R>(
        operation: impl Into<Cow<'static, str>>,
        context: &ServiceContext<In, Out>,
        resolver: R,
    ) -> InterceptLayer<In, Out, R, NotSet> {
        InterceptLayer::new(operation.into(), resolver, context)
    }
}

impl<In, Out, S, R> Service<In> for Intercept<In, Out, S, R>
where
    In: Send,
    S: Service<In, Out = Out>,
    R: Resolve<In, Out, S>,
{
    type Out = Out;

    async fn invoke(&self, input: In) -> Self::Out {
        if !self.shared.enable_if.call(&input) {
            return self.inner.invoke(input).await;
        }

        let interceptor = self.shared.resolver.resolve(&self.inner);

        let correlation = match interceptor {
            Some(interceptor) => {
                match interceptor.before_call(&self.shared.operation, &input) {
                    Ok(correlation) => correlation,
                    Err(fault) => return self.shared.handle_fault(FaultStage::Before, fault),
                }
            }
            None => None,
        };

        let output = self.inner.invoke(input).await;

        if let Some(interceptor) = interceptor {
            if let Err(fault) = interceptor.after_call(&self.shared.operation, &output, correlation)
            {
                return self.shared.handle_fault(FaultStage::After, fault);
            }
        }

        output
    }
}

impl<In, Out, S, R> Clone for Intercept<In, Out, S, R>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            inner: self.inner.clone(),
        }
    }
}

impl<In, Out, R> InterceptShared<In, Out, R> {
    pub(super) fn handle_fault(&self, stage: FaultStage, fault: Fault) -> Out {
        #[cfg(any(feature = "logs", test))]
        if self.telemetry.logs_enabled {
            tracing::event!(
                name: "chaperone.fault",
                tracing::Level::WARN,
                service.name = %self.telemetry.service_name,
                operation = %self.operation,
                stage = %stage,
                fault = %fault,
            );
        }

        let output = self.fault_output.call(FaultOutputArgs {
            operation: self.operation.clone(),
            stage,
            fault,
        });

        if let Some(on_fault) = &self.on_fault {
            on_fault.call(
                &output,
                OnFaultArgs {
                    operation: self.operation.clone(),
                    stage,
                },
            );
        }

        output
    }
}

/// The future returned by the `tower_service::Service` implementation of
/// [`Intercept`].
#[cfg(any(feature = "tower-service", test))]
pub struct InterceptFuture<Out> {
    inner: std::pin::Pin<Box<dyn Future<Output = Out> + Send>>,
}

#[cfg(any(feature = "tower-service", test))]
impl<Out> Future for InterceptFuture<Out> {
    type Output = Out;

    fn poll(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

#[cfg(any(feature = "tower-service", test))]
impl<Out> std::fmt::Debug for InterceptFuture<Out> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptFuture").finish_non_exhaustive()
    }
}

// IMPORTANT: the implementation below must remain logic-equivalent to the `Service`
// implementation above; update both when the orchestration changes.
//
// The tower implementation is limited to the `Configured` resolver, whose
// interceptor is independent of the wrapped service and can be moved into the
// returned future.
#[cfg(any(feature = "tower-service", test))]
impl<In, Res, Err, S> tower_service::Service<In>
    for Intercept<In, Result<Res, Err>, S, Configured<In, Result<Res, Err>>>
where
    In: Send + 'static,
    Res: Send + 'static,
    Err: Send + 'static,
    S: tower_service::Service<In, Response = Res, Error = Err>,
    S::Future: Send + 'static,
{
    type Response = Res;
    type Error = Err;
    type Future = InterceptFuture<Result<Res, Err>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, input: In) -> Self::Future {
        if !self.shared.enable_if.call(&input) {
            return InterceptFuture {
                inner: Box::pin(self.inner.call(input)),
            };
        }

        let interceptor = Arc::clone(self.shared.resolver.get());

        let correlation = match interceptor.before_call(&self.shared.operation, &input) {
            Ok(correlation) => correlation,
            Err(fault) => {
                let output = self.shared.handle_fault(FaultStage::Before, fault);
                return InterceptFuture {
                    inner: Box::pin(std::future::ready(output)),
                };
            }
        };

        let shared = Arc::clone(&self.shared);
        let future = self.inner.call(input);

        InterceptFuture {
            inner: Box::pin(async move {
                let output = future.await;

                if let Err(fault) =
                    interceptor.after_call(&shared.operation, &output, correlation)
                {
                    return shared.handle_fault(FaultStage::After, fault);
                }

                output
            }),
        }
    }
}
