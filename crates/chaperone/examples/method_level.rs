// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Attaching markers through a dispatch table.
//!
//! This example demonstrates registration-time attachment: three operations are
//! registered with a dispatcher, an auditing marker is attached to two of them, and
//! the third dispatches with no interception overhead at all.

use chaperone::dispatch::{Dispatcher, Marker};
use chaperone::{Correlation, Fault, Interceptor, Invoke, ServiceContext};

#[derive(Default)]
struct Auditor;

impl Interceptor<String, String> for Auditor {
    fn before_call(&self, operation: &str, input: &String) -> Result<Option<Correlation>, Fault> {
        println!("audit: {operation}({input}) begins");
        Ok(None)
    }

    fn after_call(
        &self,
        operation: &str,
        output: &String,
        _correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        println!("audit: {operation} produced {output:?}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let context = ServiceContext::new().name("greeter");

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        "say_hello",
        Invoke::new(|name: String| async move { format!("Hello, {name}") }),
    )?;
    dispatcher.register(
        "say_goodbye",
        Invoke::new(|name: String| async move { format!("Goodbye, {name}") }),
    )?;
    dispatcher.register(
        "say_hello_again",
        Invoke::new(|name: String| async move { format!("Hello again, {name}") }),
    )?;

    let marker = Marker::with::<Auditor>("audit", &context)
        .fault_output(|args| format!("call aborted: {}", args.fault()));

    // Method-level attachment: only these two operations are audited.
    dispatcher.attach("say_hello", &marker)?;
    dispatcher.attach("say_goodbye", &marker)?;

    for operation in ["say_hello", "say_goodbye", "say_hello_again"] {
        let response = dispatcher.dispatch(operation, "Ada".to_string()).await?;
        println!("{operation}: {response}");
    }

    Ok(())
}
