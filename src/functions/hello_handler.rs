use std::io::{self, Read, Write};

use crate::context::InvokeContext;
use crate::function_log::FunctionLog;
use crate::handler::InvokeHandler;

/// Logs the invocation context, then echoes the event back unchanged.
#[derive(Debug, Default)]
pub struct HelloHandler;

impl InvokeHandler for HelloHandler {
    fn invoke(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> io::Result<()> {
        log.info(format!(
            "reqid={}, brn={}, name={}, ver={}, mem={}",
            ctx.request_id(),
            ctx.function_brn(),
            ctx.function_name(),
            ctx.function_version(),
            ctx.memory_limit_mb()
        ));

        io::copy(input, output)?;
        Ok(())
    }
}
