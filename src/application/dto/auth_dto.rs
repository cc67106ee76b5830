//! Authentication DTOs.

use std::fmt;

use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::domain::namespace::Namespace;

/// Login request data.
#[derive(Clone)]
pub struct LoginRequest {
    /// Namespace whose login endpoint is called.
    pub namespace: Namespace,
    /// Account email.
    pub email: String,
    /// Account password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub fn new(namespace: Namespace, email: impl Into<String>, password: String) -> Self {
        Self {
            namespace,
            email: email.into().trim().to_string(),
            password: Zeroizing::new(password),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("namespace", &self.namespace)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registration request data.
#[derive(Clone)]
pub struct RegisterRequest {
    /// Namespace whose registration endpoint is called.
    pub namespace: Namespace,
    /// Account fields other than the password.
    pub fields: Map<String, Value>,
    /// Account password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl RegisterRequest {
    /// Creates new registration request.
    #[must_use]
    pub fn new(namespace: Namespace, fields: Map<String, Value>, password: String) -> Self {
        Self {
            namespace,
            fields,
            password: Zeroizing::new(password),
        }
    }

    /// Full payload sent to the backend.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = self.fields.clone();
        payload.insert(
            "password".to_string(),
            Value::String(self.password.as_str().to_string()),
        );
        payload
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("namespace", &self.namespace)
            .field("fields", &self.fields)
            .field("password", &"***")
            .finish()
    }
}

/// Login response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Namespace signed into.
    pub namespace: Namespace,
    /// Active company, for company sessions.
    pub company_id: Option<String>,
}

impl LoginResponse {
    /// Creates new login response.
    #[must_use]
    pub const fn new(namespace: Namespace, company_id: Option<String>) -> Self {
        Self {
            namespace,
            company_id,
        }
    }
}

/// Registration outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterResponse {
    /// The backend issued a token; the session is open.
    SignedIn(LoginResponse),
    /// The account exists; the operator must now log in.
    Created {
        /// Backend message, if any.
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let request = LoginRequest::new(Namespace::Company, " admin@sahel.sn ", "hunter2".into());
        let debug = format!("{request:?}");

        assert_eq!(request.email, "admin@sahel.sn");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_register_payload_includes_password() {
        let mut fields = Map::new();
        fields.insert("nom".into(), Value::String("Sahel".into()));
        let request = RegisterRequest::new(Namespace::Company, fields, "s3cret".into());

        let payload = request.payload();
        assert_eq!(payload["nom"], "Sahel");
        assert_eq!(payload["password"], "s3cret");
        assert!(!format!("{request:?}").contains("s3cret"));
    }
}
