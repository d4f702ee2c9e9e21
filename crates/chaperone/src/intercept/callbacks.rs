// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::intercept::{FaultOutputArgs, OnFaultArgs};

crate::utils::define_fn_wrapper!(FaultOutput<Out>(Fn(args: FaultOutputArgs) -> Out));
crate::utils::define_fn_wrapper!(OnFault<Out>(Fn(output: &Out, args: OnFaultArgs)));
