//! Admin user type.

use serde::{Deserialize, Serialize};
use suko_commerce::ids::UserId;

/// A signed-in administrator.
///
/// Stored locally as `{"uid": ..., "email": ..., "displayName": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub uid: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AdminUser {
    pub fn new(uid: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let user = AdminUser::new("mock-admin-uid", "admin@suko.com").with_display_name("Admin");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "uid": "mock-admin-uid",
                "email": "admin@suko.com",
                "displayName": "Admin"
            })
        );
    }

    #[test]
    fn test_label() {
        let user = AdminUser::new("u", "a@b.dk");
        assert_eq!(user.label(), "a@b.dk");
        assert_eq!(user.with_display_name("Ada").label(), "Ada");
    }
}
