// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Middleware that runs paired interception hooks around each service call.
//!
//! The [`Intercept`] middleware wraps a service and, for each call, resolves the
//! applicable [`Interceptor`](crate::Interceptor), runs its before hook, invokes the
//! underlying service, then runs the paired after hook. A fault raised by the before
//! hook aborts the call before the service runs; a fault raised by the after hook
//! replaces the produced output. Faulted calls yield the output produced by the
//! configured fault output function, so callers always receive a value of the
//! service's output type.
//!
//! Construction goes through [`Intercept`]'s associated functions, which return an
//! [`InterceptLayer`] builder. The builder uses type states: the fault output must
//! be provided before the layer can wrap a service.
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
//!         Ok(None)
//!     }
//!
//!     fn after_call(
//!         &self,
//!         _operation: &str,
//!         _output: &String,
//!         _correlation: Option<Correlation>,
//!     ) -> Result<(), Fault> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() {
//! let context = ServiceContext::new();
//! let service = (
//!     Intercept::with::<Gatekeeper>("greet", &context)
//!         .fault_output(|args| format!("rejected: {}", args.fault())),
//!     Invoke::new(|name: String| async move { format!("Hello, {name}!") }),
//! )
//!     .build();
//!
//! assert_eq!(service.invoke("Ferris".into()).await, "Hello, Ferris!");
//! assert_eq!(service.invoke(String::new()).await, "rejected: empty request");
//! # }
//! ```

mod args;
mod callbacks;
mod layer;
mod service;

use std::fmt;

pub use args::{FaultOutputArgs, OnFaultArgs};
pub(crate) use callbacks::{FaultOutput, OnFault};
pub use layer::InterceptLayer;
pub use service::Intercept;

#[cfg(any(feature = "tower-service", test))]
pub use service::InterceptFuture;

/// Type state marker indicating a required setting has been provided.
#[derive(Debug)]
pub struct Set;

/// Type state marker indicating a required setting is still missing.
#[derive(Debug)]
pub struct NotSet;

/// The hook a fault was raised from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaultStage {
    /// The fault was raised before the underlying service ran; the call was aborted.
    Before,

    /// The fault was raised after the underlying service produced an output; the
    /// output was replaced.
    After,
}

impl fmt::Display for FaultStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before_call"),
            Self::After => f.write_str("after_call"),
        }
    }
}
