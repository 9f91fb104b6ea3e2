//! User Model

use serde::{Deserialize, Serialize};

/// User entity
///
/// `password_hash` is never serialized; API responses only ever carry the
/// public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Stored lowercased; uniqueness is case-insensitive.
    pub email: String,
    pub whatsapp: String,
    /// Public path of the uploaded avatar (`/images/users/<file>`), if any.
    pub avatar: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// "user" or "admin"
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The identity kept in the session once a user is logged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Register payload (JSON body or multipart fields)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRegister {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
    pub whatsapp: Option<String>,
}

/// Login payload (JSON body or form fields)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserLogin {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Browser forms send "on"; JSON clients may send a boolean.
    #[serde(default)]
    pub remember: Option<RememberFlag>,
}

/// Remember-me flag: checkbox value from a form or a JSON boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RememberFlag {
    Bool(bool),
    Text(String),
}

impl RememberFlag {
    pub fn is_set(&self) -> bool {
        match self {
            RememberFlag::Bool(b) => *b,
            RememberFlag::Text(s) => matches!(s.as_str(), "on" | "true" | "1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_flag_accepts_form_and_json_values() {
        let form: UserLogin = serde_json::from_str(r#"{"remember": "on"}"#).unwrap();
        assert!(form.remember.unwrap().is_set());

        let json: UserLogin = serde_json::from_str(r#"{"remember": true}"#).unwrap();
        assert!(json.remember.unwrap().is_set());

        let off: UserLogin = serde_json::from_str(r#"{"remember": false}"#).unwrap();
        assert!(!off.remember.unwrap().is_set());

        let absent: UserLogin = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.remember.is_none());
    }

    #[test]
    fn user_serialization_strips_password_hash() {
        let user = User {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            whatsapp: String::new(),
            avatar: None,
            password_hash: "$argon2id$secret".into(),
            role: "user".into(),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ana@example.com");
    }
}
