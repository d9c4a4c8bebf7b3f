use crate::context::InvokeContext;
use crate::error::HandlerError;
use crate::function_log::FunctionLog;
use crate::handler::RequestHandler;
use crate::model::user_info::UserInfo;

/// Greets the user named in the event.
#[derive(Debug, Default)]
pub struct EventHandler;

impl RequestHandler<UserInfo, String> for EventHandler {
    fn handle(
        &self,
        user: UserInfo,
        _ctx: &InvokeContext,
        _log: &FunctionLog,
    ) -> Result<String, HandlerError> {
        Ok(greeting(&user))
    }
}

/// `Hello, {first} {last}`, with absent names rendered as empty strings.
pub fn greeting(user: &UserInfo) -> String {
    format!(
        "Hello, {} {}",
        user.first_name().unwrap_or_default(),
        user.last_name().unwrap_or_default()
    )
}
