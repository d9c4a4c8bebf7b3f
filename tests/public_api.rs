//! Drives the package through its public API, the way a function author would.

use std::time::Duration;

use cfc_hello::config::{Config, FunctionConfig};
use cfc_hello::context::InvokeContext;
use cfc_hello::error::{HandlerError, InvokeError};
use cfc_hello::function_log::{Channel, FunctionLog};
use cfc_hello::functions::{self, event_handler::greeting};
use cfc_hello::handler::RequestHandler;
use cfc_hello::model::user_info::UserInfo;
use cfc_hello::registry::Registry;

struct RequireFirstName;

impl RequestHandler<UserInfo, String> for RequireFirstName {
    fn handle(
        &self,
        user: UserInfo,
        ctx: &InvokeContext,
        log: &FunctionLog,
    ) -> Result<String, HandlerError> {
        log.info(format!("{}ms left", ctx.remaining_time().as_millis()));
        match user.first_name() {
            Some(_) => Ok(greeting(&user)),
            None => {
                log.error("first name missing");
                Err(HandlerError::new("firstName is required"))
            }
        }
    }
}

#[test]
fn user_info_built_with_setters_greets() {
    let mut user = UserInfo::default();
    user.set_first_name("Ada");
    user.set_last_name("Lovelace");

    assert_eq!(user, UserInfo::new("Ada", "Lovelace"));
    assert_eq!(greeting(&user), "Hello, Ada Lovelace");
}

#[test]
fn context_deadline_tracks_timeout() {
    let function = FunctionConfig::new("greet", functions::EVENT_HANDLER).with_timeout(5);
    let ctx = InvokeContext::new(&Config::default(), &function, None);

    assert!(ctx.deadline() > ctx.invoked_at());
    assert!(ctx.remaining_time() <= Duration::from_secs(5));
}

#[test]
fn custom_handler_registers_and_logs_per_channel() {
    let mut registry = Registry::builtin();
    registry.register_request("require_first_name", RequireFirstName);

    let function = FunctionConfig::new("strict", "require_first_name");
    let ctx = InvokeContext::new(&Config::default(), &function, Some("req-1".into()));
    let log = FunctionLog::new(ctx.request_id());

    let err = registry
        .get("require_first_name")
        .unwrap()
        .call(br#"{"lastName":"Hopper"}"#, &ctx, &log)
        .unwrap_err();

    assert!(matches!(err, InvokeError::Handler(_)));
    assert_eq!(log.channel(Channel::Stdout).len(), 1);
    assert_eq!(log.channel(Channel::Stderr), vec!["first name missing"]);
}
