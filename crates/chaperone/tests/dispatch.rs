// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "dispatch")]

//! Integration tests for the dispatch table using only public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Mutex;

use chaperone::dispatch::{DispatchError, Dispatcher, Marker};
use chaperone::{Correlation, Fault, Interceptor, Invoke, ServiceContext};

struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(Vec::new()),
        })
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("lock should not be poisoned").clone()
    }
}

impl Interceptor<String, String> for Journal {
    fn before_call(&self, operation: &str, input: &String) -> Result<Option<Correlation>, Fault> {
        self.entries
            .lock()
            .expect("lock should not be poisoned")
            .push(format!("before {operation}({input})"));
        Ok(None)
    }

    fn after_call(
        &self,
        operation: &str,
        output: &String,
        _correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        self.entries
            .lock()
            .expect("lock should not be poisoned")
            .push(format!("after {operation} -> {output}"));
        Ok(())
    }
}

fn greeter_dispatcher() -> Dispatcher<String, String> {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register("say_hello", Invoke::new(|name: String| async move { format!("Hello, {name}") }))
        .expect("registration should succeed");
    dispatcher
        .register(
            "say_goodbye",
            Invoke::new(|name: String| async move { format!("Goodbye, {name}") }),
        )
        .expect("registration should succeed");
    dispatcher
        .register(
            "say_hello_again",
            Invoke::new(|name: String| async move { format!("Hello again, {name}") }),
        )
        .expect("registration should succeed");
    dispatcher
}

fn journal_marker(journal: &Arc<Journal>) -> Marker<String, String, chaperone::Configured<String, String>> {
    Marker::with_instance(
        "journal",
        &ServiceContext::new(),
        Arc::clone(journal) as Arc<dyn Interceptor<String, String>>,
    )
    .fault_output(|args| format!("fault: {}", args.fault()))
}

#[tokio::test]
async fn marked_operations_are_intercepted_and_siblings_are_not() {
    let journal = Journal::new();
    let mut dispatcher = greeter_dispatcher();
    let marker = journal_marker(&journal);

    dispatcher
        .attach("say_hello", &marker)
        .expect("attach should succeed");
    dispatcher
        .attach("say_goodbye", &marker)
        .expect("attach should succeed");

    let hello = dispatcher
        .dispatch("say_hello", "Ada".to_string())
        .await
        .expect("dispatch should succeed");
    let goodbye = dispatcher
        .dispatch("say_goodbye", "Ada".to_string())
        .await
        .expect("dispatch should succeed");
    let again = dispatcher
        .dispatch("say_hello_again", "Ada".to_string())
        .await
        .expect("dispatch should succeed");

    assert_eq!(hello, "Hello, Ada");
    assert_eq!(goodbye, "Goodbye, Ada");
    assert_eq!(again, "Hello again, Ada");

    // The undecorated sibling never shows up in the journal.
    assert_eq!(
        journal.entries(),
        [
            "before say_hello(Ada)",
            "after say_hello -> Hello, Ada",
            "before say_goodbye(Ada)",
            "after say_goodbye -> Goodbye, Ada",
        ]
    );
}

#[tokio::test]
async fn attach_all_does_not_double_wrap_individually_configured_operations() {
    let journal = Journal::new();
    let mut dispatcher = greeter_dispatcher();
    let marker = journal_marker(&journal);

    dispatcher
        .attach("say_hello", &marker)
        .expect("attach should succeed");
    dispatcher.attach_all(&marker);

    let _ = dispatcher
        .dispatch("say_hello", "Ada".to_string())
        .await
        .expect("dispatch should succeed");

    // Exactly one hook pair; attach_all skipped the already-marked operation.
    assert_eq!(
        journal.entries(),
        ["before say_hello(Ada)", "after say_hello -> Hello, Ada"]
    );
}

#[tokio::test]
async fn hooks_receive_the_operation_name_not_the_marker_name() {
    let journal = Journal::new();
    let mut dispatcher = greeter_dispatcher();

    dispatcher.attach_all(&journal_marker(&journal));

    let _ = dispatcher
        .dispatch("say_goodbye", "Ada".to_string())
        .await
        .expect("dispatch should succeed");

    assert_eq!(
        journal.entries(),
        ["before say_goodbye(Ada)", "after say_goodbye -> Goodbye, Ada"]
    );
}

#[tokio::test]
async fn faults_surface_through_dispatched_calls() {
    #[derive(Default)]
    struct NoAnonymous;

    impl Interceptor<String, String> for NoAnonymous {
        fn before_call(&self, _operation: &str, input: &String) -> Result<Option<Correlation>, Fault> {
            if input.is_empty() {
                return Err(Fault::new("anonymous callers are not welcome"));
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

    let mut dispatcher = greeter_dispatcher();
    let marker = Marker::with::<NoAnonymous>("gatekeeper", &ServiceContext::new())
        .fault_output(|args| format!("rejected: {}", args.fault()));

    dispatcher.attach_all(&marker);

    let rejected = dispatcher
        .dispatch("say_hello", String::new())
        .await
        .expect("dispatch itself should succeed");
    assert_eq!(rejected, "rejected: anonymous callers are not welcome");

    let greeted = dispatcher
        .dispatch("say_hello", "Ada".to_string())
        .await
        .expect("dispatch should succeed");
    assert_eq!(greeted, "Hello, Ada");
}

#[tokio::test]
async fn lazily_constructed_interceptor_is_shared_across_operations() {
    static CONSTRUCTED: AtomicU16 = AtomicU16::new(0);

    #[derive(Default)]
    struct Counting;

    impl Interceptor<String, String> for Counting {
        fn before_call(&self, _operation: &str, _input: &String) -> Result<Option<Correlation>, Fault> {
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

    let mut dispatcher = greeter_dispatcher();
    let marker = Marker::with_factory("counting", &ServiceContext::new(), || {
        let _ = CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        Counting
    })
    .fault_output(|args| format!("fault: {}", args.fault()));

    dispatcher.attach_all(&marker);
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 0);

    for operation in ["say_hello", "say_goodbye", "say_hello_again"] {
        let _ = dispatcher
            .dispatch(operation, "Ada".to_string())
            .await
            .expect("dispatch should succeed");
    }

    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_operation_is_reported() {
    let dispatcher = greeter_dispatcher();

    let error = dispatcher
        .dispatch("shout", "Ada".to_string())
        .await
        .expect_err("dispatch should fail");

    assert_eq!(error.to_string(), "unknown operation `shout`");
    assert!(matches!(error, DispatchError::UnknownOperation(name) if name == "shout"));
}
