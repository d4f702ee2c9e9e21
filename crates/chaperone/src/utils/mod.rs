// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod define_fn_wrapper;

pub(crate) use define_fn_wrapper::define_fn_wrapper;

define_fn_wrapper!(EnableIf<In>(Fn(input: &In) -> bool));

impl<In> EnableIf<In> {
    /// An `EnableIf` that always returns true.
    pub(crate) fn always() -> Self {
        Self::new(|_| true)
    }

    /// An `EnableIf` that always returns false.
    pub(crate) fn never() -> Self {
        Self::new(|_| false)
    }
}

/// Telemetry settings shared by the operations of one logical service.
#[cfg(any(feature = "logs", test))]
#[derive(Clone, Debug)]
pub(crate) struct TelemetryHelper {
    pub(crate) service_name: std::borrow::Cow<'static, str>,
    pub(crate) logs_enabled: bool,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn always_and_never() {
        assert!(EnableIf::always().call(&0));
        assert!(!EnableIf::never().call(&0));
    }
}
