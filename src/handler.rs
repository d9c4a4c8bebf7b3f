//! Handler contracts.
//!
//! Functions are written against one of two traits:
//! - [`RequestHandler`] receives a deserialized event and returns a serializable result.
//! - [`InvokeHandler`] receives the raw event as a byte stream and writes its result to an output stream.
//!
//! The registry stores both kinds behind [`Function`], which works on raw payload bytes.

use std::io::{self, Read, Write};
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::context::InvokeContext;
use crate::error::{HandlerError, InvokeError};
use crate::function_log::FunctionLog;

pub trait RequestHandler<I, O>: Send + Sync + 'static {
    fn handle(&self, input: I, ctx: &InvokeContext, log: &FunctionLog) -> Result<O, HandlerError>;
}

pub trait InvokeHandler: Send + Sync + 'static {
    fn invoke(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> io::Result<()>;
}

/// A handler with its payload encoding erased.
pub trait Function: Send + Sync + 'static {
    fn call(
        &self,
        payload: &[u8],
        ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> Result<Vec<u8>, InvokeError>;

    /// Media type of the bytes `call` returns.
    fn content_type(&self) -> &'static str {
        "application/octet-stream"
    }
}

/// Adapts a [`RequestHandler`] by decoding the payload as JSON and encoding the result as JSON.
pub struct Typed<H, I, O> {
    handler: H,
    _phantom: PhantomData<fn(I) -> O>,
}

impl<H, I, O> Typed<H, I, O> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<H, I, O> Function for Typed<H, I, O>
where
    H: RequestHandler<I, O>,
    I: DeserializeOwned + 'static,
    O: Serialize + 'static,
{
    fn call(
        &self,
        payload: &[u8],
        ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> Result<Vec<u8>, InvokeError> {
        let input: I = serde_json::from_slice(payload).map_err(InvokeError::InvalidPayload)?;
        let output = self.handler.handle(input, ctx, log)?;
        serde_json::to_vec(&output).map_err(InvokeError::Serialize)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// Adapts an [`InvokeHandler`], passing the payload through untouched.
pub struct Stream<H> {
    handler: H,
}

impl<H> Stream<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H: InvokeHandler> Function for Stream<H> {
    fn call(
        &self,
        payload: &[u8],
        ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> Result<Vec<u8>, InvokeError> {
        let mut input = payload;
        let mut output = Vec::new();
        self.handler.invoke(&mut input, &mut output, ctx, log)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FunctionConfig};

    struct Length;

    impl RequestHandler<Vec<u32>, usize> for Length {
        fn handle(
            &self,
            input: Vec<u32>,
            _ctx: &InvokeContext,
            _log: &FunctionLog,
        ) -> Result<usize, HandlerError> {
            if input.is_empty() {
                return Err(HandlerError::new("empty list"));
            }
            Ok(input.len())
        }
    }

    struct Broken;

    impl InvokeHandler for Broken {
        fn invoke(
            &self,
            _input: &mut dyn Read,
            _output: &mut dyn Write,
            _ctx: &InvokeContext,
            _log: &FunctionLog,
        ) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    fn ctx() -> InvokeContext {
        InvokeContext::new(&Config::default(), &FunctionConfig::new("test", "test"), None)
    }

    #[test]
    fn typed_round_trips_json() {
        let function = Typed::new(Length);
        let log = FunctionLog::new("req");

        let output = function.call(b"[1, 2, 3]", &ctx(), &log).unwrap();

        assert_eq!(output, b"3");
        assert_eq!(function.content_type(), "application/json");
    }

    #[test]
    fn typed_rejects_malformed_payload() {
        let function = Typed::new(Length);
        let log = FunctionLog::new("req");

        let err = function.call(b"{ not json", &ctx(), &log).unwrap_err();

        assert!(matches!(err, InvokeError::InvalidPayload(_)));
    }

    #[test]
    fn typed_propagates_handler_errors() {
        let function = Typed::new(Length);
        let log = FunctionLog::new("req");

        let err = function.call(b"[]", &ctx(), &log).unwrap_err();

        assert!(matches!(err, InvokeError::Handler(_)));
        assert_eq!(err.to_string(), "empty list");
    }

    #[test]
    fn stream_propagates_io_errors() {
        let function = Stream::new(Broken);
        let log = FunctionLog::new("req");

        let err = function.call(b"", &ctx(), &log).unwrap_err();

        let InvokeError::Io(e) = err else {
            panic!("expected an io error");
        };
        assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(function.content_type(), "application/octet-stream");
    }
}
