// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A service acting as its own interceptor.
//!
//! This example demonstrates the `from_service` resolution strategy: the service
//! type implements both `Service` and `Interceptor`, so its own hooks run around
//! each of its calls. No separate interceptor is constructed.

use std::sync::atomic::{AtomicU64, Ordering};

use chaperone::{
    Correlation, Fault, Intercept, Interceptor, Service, ServiceContext, Stack,
};

#[derive(Default)]
struct Counter {
    calls: AtomicU64,
}

impl Service<u64> for Counter {
    type Out = u64;

    async fn invoke(&self, input: u64) -> u64 {
        input * input
    }
}

impl Interceptor<u64, u64> for Counter {
    fn before_call(&self, operation: &str, input: &u64) -> Result<Option<Correlation>, Fault> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[{operation}] call #{call} begins with input {input}");
        Ok(Some(Correlation::new(call)))
    }

    fn after_call(
        &self,
        operation: &str,
        output: &u64,
        correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        let call = correlation
            .and_then(|token| token.downcast::<u64>().ok())
            .ok_or_else(|| Fault::new("correlation token lost"))?;
        println!("[{operation}] call #{call} produced {output}");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let context = ServiceContext::new().name("squares");

    let stack = (
        Intercept::from_service("square", &context)
            .fault_output(|args| {
                eprintln!("faulted: {}", args.fault());
                0
            }),
        Counter::default(),
    );

    let service = stack.build();

    for input in 1..=5 {
        let output = service.invoke(input).await;
        println!("{input}^2 = {output}");
    }
}
