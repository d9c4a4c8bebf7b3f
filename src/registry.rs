//! Named handler registration.
//!
//! Deployments refer to handlers by name (`com.baidu.demo.EventHandler`, `hello_handler`, ...).
//! Registering a name twice replaces the earlier handler.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::functions::{self, EventHandler, HelloHandler, Index};
use crate::handler::{Function, InvokeHandler, RequestHandler, Stream, Typed};

#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, Arc<dyn Function>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every function this package ships.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_request(functions::EVENT_HANDLER, EventHandler);
        registry.register_invoke(functions::INDEX, Index);
        registry.register_invoke(functions::HELLO_HANDLER, HelloHandler);
        registry
    }

    pub fn register_request<H, I, O>(&mut self, name: impl Into<String>, handler: H)
    where
        H: RequestHandler<I, O>,
        I: DeserializeOwned + 'static,
        O: Serialize + 'static,
    {
        self.register(name, Arc::new(Typed::new(handler)));
    }

    pub fn register_invoke<H: InvokeHandler>(&mut self, name: impl Into<String>, handler: H) {
        self.register(name, Arc::new(Stream::new(handler)));
    }

    pub fn register(&mut self, name: impl Into<String>, function: Arc<dyn Function>) {
        self.handlers.insert(name.into(), function);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Function>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}
