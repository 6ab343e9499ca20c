//! User profile and auth payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile record as the API returns it. Only the fields the client reads
/// are typed; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Fields collected by the sign-up form
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub organization: Option<String>,
}

impl RegistrationForm {
    /// The API takes a single display name
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: String,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<&'a str>,
}

impl<'a> From<&'a RegistrationForm> for RegisterRequest<'a> {
    fn from(form: &'a RegistrationForm) -> Self {
        Self {
            name: form.display_name(),
            email: &form.email,
            password: &form.password,
            organization: form
                .organization
                .as_deref()
                .map(str::trim)
                .filter(|org| !org.is_empty()),
        }
    }
}

/// `{user, token}` returned by login and registration
#[derive(Debug, Deserialize)]
pub(crate) struct AuthGrant {
    pub user: User,
    pub token: String,
}

/// `{user}` returned by the profile endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "name": "A",
            "organization": "Acme",
            "role": "analyst"
        }))
        .unwrap();

        assert_eq!(user.id, UserId::Number(1));
        assert_eq!(user.organization.as_deref(), Some("Acme"));
        assert_eq!(user.extra["role"], "analyst");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], "analyst");
    }

    #[test]
    fn test_string_ids() {
        let user: User =
            serde_json::from_value(json!({"id": "5f1c", "name": "B"})).unwrap();
        assert_eq!(user.id, UserId::Text("5f1c".to_string()));
        assert_eq!(user.id.to_string(), "5f1c");
    }

    #[test]
    fn test_register_request_body() {
        let form = RegistrationForm {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            organization: Some("  ".to_string()),
        };

        let body = serde_json::to_value(RegisterRequest::from(&form)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "password": "secret"
            })
        );
    }

    #[test]
    fn test_display_name_with_missing_part() {
        let form = RegistrationForm {
            first_name: "Ada".to_string(),
            ..Default::default()
        };
        assert_eq!(form.display_name(), "Ada");
    }
}
