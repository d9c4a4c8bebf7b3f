//! Runs one invocation of a function.
//!
//! Handlers are synchronous, so each call runs on tokio's blocking pool and is raced against the
//! function's timeout. A blocking thread cannot be cancelled: once the timeout fires the caller gets
//! `InvokeError::Timeout` and whatever the handler eventually returns is dropped.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::FunctionConfig;
use crate::context::InvokeContext;
use crate::error::InvokeError;
use crate::function_log::FunctionLog;
use crate::handler::Function;

pub struct Invocation {
    pub context: InvokeContext,
    pub log: Arc<FunctionLog>,
    pub result: Result<Vec<u8>, InvokeError>,
}

pub async fn invoke(
    function: Arc<dyn Function>,
    config: &FunctionConfig,
    context: InvokeContext,
    payload: Vec<u8>,
) -> Invocation {
    let log = Arc::new(FunctionLog::new(context.request_id()));

    info!(
        function = %config.name,
        request_id = %context.request_id(),
        "Invoking {} ({} bytes)",
        config.handler,
        payload.len()
    );

    let task = {
        let log = Arc::clone(&log);
        let context = context.clone();
        tokio::task::spawn_blocking(move || function.call(&payload, &context, &log))
    };

    let result = match tokio::time::timeout(config.timeout_duration(), task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(InvokeError::Join(e.to_string())),
        Err(_) => {
            warn!(
                "Function '{}' timed out after {} seconds",
                config.name, config.timeout
            );
            Err(InvokeError::Timeout {
                name: config.name.clone(),
                seconds: config.timeout,
            })
        }
    };

    match &result {
        Ok(output) => info!(
            function = %config.name,
            request_id = %context.request_id(),
            "Completed with {} bytes",
            output.len()
        ),
        Err(e) => error!(
            function = %config.name,
            request_id = %context.request_id(),
            "{e}"
        ),
    }

    Invocation {
        context,
        log,
        result,
    }
}
