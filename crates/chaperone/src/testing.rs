// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Helpers shared by the unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::{Correlation, Fault, Interceptor};

/// An interceptor whose hooks always succeed and mint no correlation token.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NullInterceptor;

impl<In, Out> Interceptor<In, Out> for NullInterceptor {
    fn before_call(&self, _operation: &str, _input: &In) -> Result<Option<Correlation>, Fault> {
        Ok(None)
    }

    fn after_call(
        &self,
        _operation: &str,
        _output: &Out,
        _correlation: Option<Correlation>,
    ) -> Result<(), Fault> {
        Ok(())
    }
}

/// Captures formatted tracing output so tests can assert on emitted events.
pub(crate) struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub(crate) fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A subscriber writing formatted events into this capture.
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(BufferWriter {
                buffer: Arc::clone(&self.buffer),
            })
            .with_ansi(false)
            .finish()
    }

    pub(crate) fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("lock should not be poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub(crate) fn assert_contains(&self, needle: &str) {
        let contents = self.contents();
        assert!(
            contents.contains(needle),
            "captured logs do not contain {needle:?}:\n{contents}"
        );
    }
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("lock should not be poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
