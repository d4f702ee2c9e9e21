// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Registration-time attachment of interception markers to named operations.
//!
//! A [`Marker`] is a named, reusable piece of interception configuration. A
//! [`Dispatcher`] maps operation names to type-erased services and attaches markers
//! either to a single operation or to every registered operation at once. Attachment
//! happens while the dispatch table is being built; dispatching a call afterwards
//! pays only for the markers actually attached to that operation.
//!
//! Markers are identified by name. Attaching a marker to an operation that already
//! carries a marker with the same name is rejected for a single operation and
//! silently skipped by [`Dispatcher::attach_all`], so service-wide attachment never
//! double-wraps an operation that was configured individually.

mod dispatcher;
mod marker;

pub use dispatcher::{DispatchError, Dispatcher};
pub use marker::Marker;
