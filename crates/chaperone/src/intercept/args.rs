// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;

use crate::Fault;
use crate::intercept::FaultStage;

/// Arguments passed to the fault output function.
#[derive(Debug)]
pub struct FaultOutputArgs {
    pub(crate) operation: Cow<'static, str>,
    pub(crate) stage: FaultStage,
    pub(crate) fault: Fault,
}

impl FaultOutputArgs {
    /// The name of the operation whose call faulted.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The hook the fault was raised from.
    #[must_use]
    pub fn stage(&self) -> FaultStage {
        self.stage
    }

    /// The fault raised by the hook.
    #[must_use]
    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    /// Consumes the arguments and returns the fault.
    #[must_use]
    pub fn into_fault(self) -> Fault {
        self.fault
    }
}

/// Arguments passed to the `on_fault` callback.
#[derive(Debug)]
pub struct OnFaultArgs {
    pub(crate) operation: Cow<'static, str>,
    pub(crate) stage: FaultStage,
}

impl OnFaultArgs {
    /// The name of the operation whose call faulted.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The hook the fault was raised from.
    #[must_use]
    pub fn stage(&self) -> FaultStage {
        self.stage
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn fault_output_args_accessors() {
        let args = FaultOutputArgs {
            operation: Cow::Borrowed("say_hello"),
            stage: FaultStage::Before,
            fault: Fault::new("denied"),
        };

        assert_eq!(args.operation(), "say_hello");
        assert_eq!(args.stage(), FaultStage::Before);
        assert_eq!(args.fault().message(), "denied");
        assert_eq!(args.into_fault().message(), "denied");
    }

    #[test]
    fn on_fault_args_accessors() {
        let args = OnFaultArgs {
            operation: Cow::Borrowed("say_hello"),
            stage: FaultStage::After,
        };

        assert_eq!(args.operation(), "say_hello");
        assert_eq!(args.stage(), FaultStage::After);
    }
}
