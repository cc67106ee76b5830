//! Backend response bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::CompanyDashboard;
use crate::domain::ports::AuthGrant;
use crate::domain::serde_utils;

/// Error body of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Alternative message field.
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The message to surface, if the body carried one.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Body of a login or registration response.
#[derive(Debug, Default, Deserialize)]
pub struct AuthBody {
    /// Issued bearer token.
    #[serde(default, alias = "accessToken", alias = "access_token")]
    pub token: Option<String>,
    /// Company id at top level.
    #[serde(
        default,
        alias = "compagnieId",
        alias = "companyId",
        deserialize_with = "serde_utils::opt_id"
    )]
    pub compagnie_id: Option<String>,
    /// Company, as an id or an embedded record.
    #[serde(default)]
    pub compagnie: Option<Value>,
    /// Signed-in account, possibly embedding its company.
    #[serde(default, alias = "admin")]
    pub user: Option<Value>,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("_id").or_else(|| map.get("id")).and_then(id_of),
        _ => None,
    }
}

impl From<AuthBody> for AuthGrant {
    fn from(body: AuthBody) -> Self {
        let company_id = body
            .compagnie_id
            .or_else(|| body.compagnie.as_ref().and_then(id_of))
            .or_else(|| {
                body.user
                    .as_ref()
                    .and_then(|u| u.get("compagnie").or_else(|| u.get("compagnieId")))
                    .and_then(id_of)
            });

        Self {
            token: body.token,
            company_id,
            message: body.message,
        }
    }
}

/// Dashboard body, bare or wrapped in `{"data": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DashboardBody {
    /// `{"data": {...}}`
    Wrapped {
        /// Wrapped figures.
        data: CompanyDashboard,
    },
    /// `{...}`
    Bare(CompanyDashboard),
}

impl From<DashboardBody> for CompanyDashboard {
    fn from(body: DashboardBody) -> Self {
        match body {
            DashboardBody::Wrapped { data } | DashboardBody::Bare(data) => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_id_sources() {
        let top: AuthBody = serde_json::from_str(r#"{"token": "t", "compagnieId": 5}"#).unwrap();
        let embedded: AuthBody =
            serde_json::from_str(r#"{"token": "t", "compagnie": {"_id": "c9", "nom": "Sahel"}}"#)
                .unwrap();
        let via_user: AuthBody =
            serde_json::from_str(r#"{"accessToken": "t", "user": {"compagnie": "c3"}}"#).unwrap();

        assert_eq!(AuthGrant::from(top).company_id.as_deref(), Some("5"));
        assert_eq!(AuthGrant::from(embedded).company_id.as_deref(), Some("c9"));
        let grant = AuthGrant::from(via_user);
        assert_eq!(grant.company_id.as_deref(), Some("c3"));
        assert_eq!(grant.token.as_deref(), Some("t"));
    }

    #[test]
    fn test_error_message_fallback() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "Bus introuvable"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Bus introuvable"));
        assert_eq!(ErrorBody::default().into_message(), None);
    }

    #[test]
    fn test_dashboard_envelope() {
        let wrapped: DashboardBody = serde_json::from_str(r#"{"data": {"totalBus": 2}}"#).unwrap();
        let bare: DashboardBody = serde_json::from_str(r#"{"totalBus": 3}"#).unwrap();

        assert_eq!(CompanyDashboard::from(wrapped).buses, Some(2.0));
        assert_eq!(CompanyDashboard::from(bare).buses, Some(3.0));
    }
}
