use std::io::{self, Read, Write};

use crate::context::InvokeContext;
use crate::function_log::FunctionLog;
use crate::handler::InvokeHandler;

pub const RESPONSE: &[u8] = b"hello world!";

/// Ignores its event and answers with a fixed body.
#[derive(Debug, Default)]
pub struct Index;

impl InvokeHandler for Index {
    fn invoke(
        &self,
        _input: &mut dyn Read,
        output: &mut dyn Write,
        _ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> io::Result<()> {
        log.info("console outlog");
        log.error("console errlog");
        output.write_all(RESPONSE)
    }
}
