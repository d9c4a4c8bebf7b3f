use serde::{Deserialize, Serialize};

/// The event accepted by the greeting handler.
///
/// Both names are optional, since callers may send `{}` or leave out either key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl UserInfo {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = Some(first_name.into());
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = Some(last_name.into());
    }
}
