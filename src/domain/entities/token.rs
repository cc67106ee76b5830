//! Session token value object.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::namespace::Namespace;
use crate::domain::serde_utils;

/// Bearer credential scoped to one console namespace.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    namespace: Namespace,
}

/// Claims read from the payload segment of a JWT session token.
///
/// The payload is decoded, not verified: the backend remains the authority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawClaims")]
pub struct TokenClaims {
    /// Company the token was issued for.
    pub company_id: Option<String>,
    /// Role name, if present.
    pub role: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    pub exp: Option<i64>,
}

/// Payload keys as the backend spells them. `id` is the subject and only
/// stands in for the company when no company key is present.
#[derive(Deserialize)]
struct RawClaims {
    #[serde(default, rename = "compagnieId", deserialize_with = "serde_utils::lenient")]
    compagnie_id_camel: Option<Value>,
    #[serde(default, deserialize_with = "serde_utils::lenient")]
    compagnie_id: Option<Value>,
    #[serde(default, rename = "companyId", deserialize_with = "serde_utils::lenient")]
    company_id: Option<Value>,
    #[serde(default, deserialize_with = "serde_utils::lenient")]
    id: Option<Value>,
    #[serde(default, deserialize_with = "serde_utils::lenient")]
    role: Option<String>,
    #[serde(default, deserialize_with = "serde_utils::lenient")]
    exp: Option<Value>,
}

impl From<RawClaims> for TokenClaims {
    fn from(raw: RawClaims) -> Self {
        let company_id = [raw.compagnie_id_camel, raw.compagnie_id, raw.company_id, raw.id]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        Self {
            company_id,
            role: raw.role,
            exp: raw.exp.as_ref().and_then(epoch_seconds),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl SessionToken {
    /// Creates a token, rejecting empty or whitespace-containing values.
    #[must_use]
    pub fn new(value: impl Into<String>, namespace: Namespace) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return None;
        }

        Some(Self { value, namespace })
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the namespace this token belongs to.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// Decodes the JWT payload, if the token is a JWT.
    #[must_use]
    pub fn claims(&self) -> Option<TokenClaims> {
        let mut segments = self.value.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Returns whether the token carries an `exp` claim earlier than `now`.
    ///
    /// Opaque tokens and tokens without `exp` never expire client-side.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims()
            .and_then(|c| c.exp)
            .is_some_and(|exp| exp <= now.timestamp())
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() <= 10 {
            return "*".repeat(chars.len());
        }

        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("namespace", &self.namespace)
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    /// Builds an unsigned JWT with the given JSON payload.
    pub fn jwt(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{body}.c2lnbmF0dXJl")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::jwt;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rejects_blank_and_spaced_values() {
        assert!(SessionToken::new("   ", Namespace::Company).is_none());
        assert!(SessionToken::new("abc def", Namespace::Company).is_none());
        assert!(SessionToken::new(" abc ", Namespace::Company).is_some());
    }

    #[test]
    fn test_bearer_header() {
        let token = SessionToken::new("abc", Namespace::Platform).unwrap();
        assert_eq!(token.bearer(), "Bearer abc");
        assert_eq!(token.namespace(), Namespace::Platform);
    }

    #[test]
    fn test_claims_company_id_aliases() {
        for payload in [
            r#"{"compagnieId": "c-9"}"#,
            r#"{"compagnie_id": "c-9"}"#,
            r#"{"companyId": "c-9"}"#,
        ] {
            let token = SessionToken::new(jwt(payload), Namespace::Company).unwrap();
            assert_eq!(
                token.claims().unwrap().company_id.as_deref(),
                Some("c-9"),
                "payload {payload}"
            );
        }

        let numeric = SessionToken::new(jwt(r#"{"id": 12}"#), Namespace::Company).unwrap();
        assert_eq!(numeric.claims().unwrap().company_id.as_deref(), Some("12"));
    }

    #[test]
    fn test_company_key_wins_over_subject_id() {
        let token = SessionToken::new(
            jwt(r#"{"id":"u1","compagnieId":"c1","exp":1000}"#),
            Namespace::Company,
        )
        .unwrap();

        let claims = token.claims().unwrap();
        assert_eq!(claims.company_id.as_deref(), Some("c1"));
        assert_eq!(claims.exp, Some(1000));
        assert!(token.is_expired_at(Utc.timestamp_opt(2000, 0).unwrap()));
    }

    #[test]
    fn test_company_key_precedence() {
        let token = SessionToken::new(
            jwt(r#"{"id":"u1","companyId":"c3","compagnie_id":"c2","role":"admin"}"#),
            Namespace::Company,
        )
        .unwrap();

        let claims = token.claims().unwrap();
        assert_eq!(claims.company_id.as_deref(), Some("c2"));
        assert_eq!(claims.role.as_deref(), Some("admin"));

        let subject_only = SessionToken::new(jwt(r#"{"id":"u1"}"#), Namespace::Company).unwrap();
        assert_eq!(subject_only.claims().unwrap().company_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_loose_claim_types_do_not_drop_payload() {
        let token = SessionToken::new(
            jwt(r#"{"compagnieId":null,"companyId":7,"role":5,"exp":"1500"}"#),
            Namespace::Company,
        )
        .unwrap();

        let claims = token.claims().unwrap();
        assert_eq!(claims.company_id.as_deref(), Some("7"));
        assert!(claims.role.is_none());
        assert_eq!(claims.exp, Some(1500));
    }

    #[test]
    fn test_opaque_token_has_no_claims() {
        let token = SessionToken::new("opaque-token-value", Namespace::Company).unwrap();
        assert!(token.claims().is_none());
        assert!(!token.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_expiry() {
        let token = SessionToken::new(jwt(r#"{"exp": 1000}"#), Namespace::Company).unwrap();
        let before = Utc.timestamp_opt(999, 0).unwrap();
        let after = Utc.timestamp_opt(1001, 0).unwrap();

        assert!(!token.is_expired_at(before));
        assert!(token.is_expired_at(after));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let raw = jwt(r#"{"companyId": "secret-company"}"#);
        let token = SessionToken::new(raw.clone(), Namespace::Company).unwrap();

        let debug_output = format!("{token:?}");
        assert!(!debug_output.contains(&raw));
        assert!(token.masked().contains("..."));
    }
}
