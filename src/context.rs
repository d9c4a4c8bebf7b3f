use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{Config, FunctionConfig};

/// Metadata about a single invocation, handed to every handler.
#[derive(Debug, Clone)]
pub struct InvokeContext {
    request_id: String,
    function_name: String,
    function_brn: String,
    function_version: String,
    memory_limit_mb: u32,
    invoked_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
}

impl InvokeContext {
    /// Generates a request id when the caller did not provide one.
    pub fn new(config: &Config, function: &FunctionConfig, request_id: Option<String>) -> Self {
        let invoked_at = Utc::now();
        // Timeouts are bounded by MAX_TIMEOUT, well inside TimeDelta's range.
        let deadline = invoked_at + TimeDelta::seconds(function.timeout as i64);

        Self {
            request_id: request_id.unwrap_or_else(new_request_id),
            function_name: function.name.clone(),
            function_brn: function_brn(
                &config.region,
                &config.account_id,
                &function.name,
                &function.version,
            ),
            function_version: function.version.clone(),
            memory_limit_mb: function.memory_size,
            invoked_at,
            deadline,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn function_brn(&self) -> &str {
        &self.function_brn
    }

    pub fn function_version(&self) -> &str {
        &self.function_version
    }

    pub fn memory_limit_mb(&self) -> u32 {
        self.memory_limit_mb
    }

    pub fn invoked_at(&self) -> DateTime<Utc> {
        self.invoked_at
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Zero once the deadline has passed.
    pub fn remaining_time(&self) -> Duration {
        (self.deadline - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

pub fn function_brn(region: &str, account_id: &str, name: &str, version: &str) -> String {
    format!("brn:bce:cfc:{region}:{account_id}:function:{name}:{version}")
}

/// 32 lowercase hex characters from 16 random bytes.
fn new_request_id() -> String {
    let mut bytes = [0u8; 16];
    rand::fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
