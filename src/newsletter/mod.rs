pub mod mailchimp;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// In UTF-16 code units.
const MAX_FIRST_NAME: usize = 100;

/// A validated signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub email: String,
    pub first_name: Option<String>,
}

/// What the signup endpoint answers with, paired with an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponse {
    pub status: &'static str,
    pub message: String,
}

impl SignupResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Check a raw JSON body. Returns the user-facing message of the first problem.
pub fn validate(input: &Value) -> Result<Signup, &'static str> {
    let Value::Object(fields) = input else {
        return Err("Invalid request format");
    };

    let email = match fields.get("email") {
        Some(Value::String(s)) if !s.is_empty() => s.trim(),
        _ => return Err("Email is required"),
    };
    if email.is_empty() {
        return Err("Email cannot be empty");
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email address");
    }

    let first_name = match fields.get("firstName") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.encode_utf16().count() > MAX_FIRST_NAME {
                return Err("First name is too long");
            }
            Some(trimmed.to_string())
        }
        Some(_) => return Err("First name must be a string"),
    };

    Ok(Signup {
        email: email.to_string(),
        first_name,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_and_trims() {
        let s = validate(&json!({ "email": "  ada@example.org ", "firstName": " Ada " })).unwrap();
        assert_eq!(s.email, "ada@example.org");
        assert_eq!(s.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn first_name_is_optional() {
        let s = validate(&json!({ "email": "ada@example.org" })).unwrap();
        assert_eq!(s.first_name, None);
        let s = validate(&json!({ "email": "ada@example.org", "firstName": null })).unwrap();
        assert_eq!(s.first_name, None);
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(validate(&json!("ada@example.org")), Err("Invalid request format"));
        assert_eq!(validate(&json!(null)), Err("Invalid request format"));
        assert_eq!(validate(&json!([1, 2])), Err("Invalid request format"));
    }

    #[test]
    fn email_errors() {
        assert_eq!(validate(&json!({})), Err("Email is required"));
        assert_eq!(validate(&json!({ "email": 42 })), Err("Email is required"));
        assert_eq!(validate(&json!({ "email": "" })), Err("Email is required"));
        assert_eq!(validate(&json!({ "email": "   " })), Err("Email cannot be empty"));
        for bad in ["ada", "ada@example", "ada @example.org", "@example.org", "a@b@c.d"] {
            assert_eq!(
                validate(&json!({ "email": bad })),
                Err("Please enter a valid email address"),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn first_name_errors() {
        assert_eq!(
            validate(&json!({ "email": "ada@example.org", "firstName": 7 })),
            Err("First name must be a string")
        );
        let long = "x".repeat(101);
        assert_eq!(
            validate(&json!({ "email": "ada@example.org", "firstName": long })),
            Err("First name is too long")
        );
        let padded = format!("  {}  ", "x".repeat(100));
        assert!(validate(&json!({ "email": "ada@example.org", "firstName": padded })).is_ok());
    }

    #[test]
    fn first_name_length_counts_utf16_units() {
        let fifty = "😀".repeat(50);
        assert!(validate(&json!({ "email": "ada@example.org", "firstName": fifty })).is_ok());
        let fifty_one = "😀".repeat(51);
        assert_eq!(
            validate(&json!({ "email": "ada@example.org", "firstName": fifty_one })),
            Err("First name is too long")
        );
        let accented = "é".repeat(100);
        assert!(validate(&json!({ "email": "ada@example.org", "firstName": accented })).is_ok());
    }
}
