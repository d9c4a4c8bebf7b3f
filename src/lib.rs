//! A hello world function package and the local runtime that invokes it over HTTP.

pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod function_log;
pub mod functions;
pub mod handler;
pub mod invoker;
pub mod model;
pub mod registry;
