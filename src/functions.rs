//! The functions shipped with this package. Each is registered under the name a deployment refers to
//! in its `handler` field.

pub mod event_handler;
pub mod hello_handler;
pub mod index;

pub use event_handler::EventHandler;
pub use hello_handler::HelloHandler;
pub use index::Index;

pub const EVENT_HANDLER: &str = "com.baidu.demo.EventHandler";
pub const INDEX: &str = "helloworld.Index";
pub const HELLO_HANDLER: &str = "hello_handler";
