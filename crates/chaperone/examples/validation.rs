// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Input validation with a configured interceptor.
//!
//! This example demonstrates the basic usage of the interception middleware: a
//! gatekeeper interceptor validates each order before the service runs and aborts
//! invalid calls with a fault.

use chaperone::{
    Correlation, Fault, Intercept, Interceptor, Invoke, Service, ServiceContext, Stack,
};

const ONLY_SOUP: &str = "New England Clam Chowder";

#[derive(Default)]
struct SoupGatekeeper;

impl Interceptor<String, String> for SoupGatekeeper {
    fn before_call(&self, operation: &str, order: &String) -> Result<Option<Correlation>, Fault> {
        if order != ONLY_SOUP {
            // Aborts the call; the kitchen never sees the order.
            return Err(Fault::new(format!(
                "{operation} only accepts {ONLY_SOUP}"
            )));
        }
        Ok(None)
    }

    fn after_call(
        &self,
        _operation: &str,
        _output: &String,
        _correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let context = ServiceContext::new().name("soup_kitchen");

    let stack = (
        Intercept::with::<SoupGatekeeper>("order_soup", &context)
            // Required: what the caller receives when a hook raises a fault
            .fault_output(|args| format!("no soup for you ({})", args.fault())),
        Invoke::new(|order: String| async move { format!("one {order} coming up") }),
    );

    let service = stack.build();

    for order in [ONLY_SOUP, "Miso", "Gumbo"] {
        let response = service.invoke(order.to_string()).await;
        println!("{order}: {response}");
    }
}
