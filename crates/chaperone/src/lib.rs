// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Paired before/after interception hooks for composable async services.
//!
//! Chaperone lets a service observe and police its calls without owning the
//! plumbing. An [`Interceptor`] supplies two hooks: `before_call` runs ahead of the
//! underlying service and may abort the call by raising a [`Fault`]; `after_call`
//! runs once an output has been produced and may replace it the same way. A
//! [`Correlation`] token minted by the before hook is carried to the paired after
//! hook of the same invocation, giving interceptors per-call state without interior
//! mutability.
//!
//! Interception is declarative: code that runs calls never special-cases it.
//! Operations that opt in get wrapped by the [`Intercept`] middleware at
//! construction time; operations that do not are left untouched and pay nothing.
//!
//! # Quick start
//!
//! ```
//! use chaperone::{Correlation, Fault, Intercept, Interceptor, Invoke, Service, ServiceContext, Stack};
//!
//! #[derive(Default)]
//! struct Gatekeeper;
//!
//! impl Interceptor<String, String> for Gatekeeper {
//!     fn before_call(&self, _operation: &str, input: &String) -> Result<Option<Correlation>, Fault> {
//!         if input.is_empty() {
//!             return Err(Fault::new("empty request"));
//!         }
//!         // Remember when this call started; the after hook gets the token back.
//!         Ok(Some(Correlation::new(std::time::Instant::now())))
//!     }
//!
//!     fn after_call(
//!         &self,
//!         operation: &str,
//!         _output: &String,
//!         correlation: Option<Correlation>,
//!     ) -> Result<(), Fault> {
//!         if let Some(started) = correlation.and_then(|token| token.downcast::<std::time::Instant>().ok()) {
//!             println!("{operation} took {:?}", started.elapsed());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() {
//! let context = ServiceContext::new().name("greeter");
//!
//! let service = (
//!     Intercept::with::<Gatekeeper>("say_hello", &context)
//!         .fault_output(|args| format!("rejected: {}", args.fault())),
//!     Invoke::new(|name: String| async move { format!("Hello, {name}!") }),
//! )
//!     .build();
//!
//! assert_eq!(service.invoke("Ferris".into()).await, "Hello, Ferris!");
//! assert_eq!(service.invoke(String::new()).await, "rejected: empty request");
//! # }
//! ```
//!
//! # Resolution strategies
//!
//! Who intercepts a call is decided by a [`Resolve`] strategy, checked in this
//! order of preference when configuring middleware:
//!
//! 1. An explicitly configured interceptor ([`Intercept::with`],
//!    [`Intercept::with_factory`], [`Intercept::with_instance`]), constructed lazily
//!    and cached for the lifetime of the layer.
//! 2. The wrapped service itself ([`Intercept::from_service`]), available only when
//!    the service type implements [`Interceptor`].
//!
//! # Crate features
//!
//! * `dispatch`: the [`dispatch`] module, a registration-time table that attaches
//!   named markers to operations service-wide or individually.
//! * `logs`: emits a `tracing` event when a hook raises a fault, if enabled on the
//!   [`ServiceContext`].
//! * `tower-service`: `tower_service::Service` implementations for interop with the
//!   tower ecosystem.

mod context;
mod correlation;
mod fault;
mod interceptor;
mod resolve;
mod service;

pub mod intercept;

#[cfg(any(feature = "dispatch", test))]
pub mod dispatch;

pub(crate) mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use context::ServiceContext;
pub use correlation::Correlation;
pub use fault::Fault;
pub use intercept::{FaultStage, Intercept, InterceptLayer, NotSet, Set};
pub use interceptor::Interceptor;
pub use resolve::{Configured, FromService, Resolve};
pub use service::{DynamicService, DynamicServiceExt, Invoke, Layer, Service, Stack};
