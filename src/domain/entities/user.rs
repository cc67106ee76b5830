//! Platform users.

use serde::{Deserialize, Serialize};

use super::date_of;
use crate::domain::aggregation::count_labels;
use crate::domain::forms::{FieldKind, FormField};
use crate::domain::resource::{Capabilities, Facet, Resource, ResourceKind, Stat, or_na};
use crate::domain::serde_utils;

const ROLES: &[&str] = &["client", "admin"];

/// A platform user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Family name.
    #[serde(default)]
    pub nom: Option<String>,
    /// Given name.
    #[serde(default)]
    pub prenom: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone.
    #[serde(default)]
    pub telephone: Option<String>,
    /// Role name.
    #[serde(default)]
    pub role: Option<String>,
    /// Creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl User {
    /// Full name, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let full = [self.prenom.as_deref(), self.nom.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if full.trim().is_empty() {
            self.email.clone()
        } else {
            Some(full)
        }
    }
}

const FORM: &[FormField] = &[
    FormField::required("nom", "Last name", FieldKind::Text),
    FormField::optional("prenom", "First name", FieldKind::Text),
    FormField::required("email", "Email", FieldKind::Text),
    FormField::optional("telephone", "Phone", FieldKind::Text),
    FormField::required("role", "Role", FieldKind::Choice(ROLES)),
    FormField::required("password", "Password", FieldKind::Secret),
];

const FACETS: &[Facet] = &[Facet {
    key: "role",
    label: "Role",
    options: ROLES,
}];

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!("user {}", or_na(self.display_name()))
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Email", "Phone", "Role", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_na(self.display_name()),
            or_na(self.email.as_deref()),
            or_na(self.telephone.as_deref()),
            or_na(self.role.as_deref()),
            or_na(self.record_date()),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        [&self.nom, &self.prenom, &self.email, &self.telephone]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "role" => self.role.clone(),
            _ => None,
        }
    }

    fn record_date(&self) -> Option<chrono::NaiveDate> {
        date_of(self.created_at.as_deref())
    }

    fn capabilities() -> Capabilities {
        Capabilities::ALL
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }

    fn form_values(&self) -> Vec<String> {
        vec![
            self.nom.clone().unwrap_or_default(),
            self.prenom.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
            self.telephone.clone().unwrap_or_default(),
            self.role
                .clone()
                .filter(|r| ROLES.contains(&r.as_str()))
                .unwrap_or_else(|| ROLES[0].to_string()),
            String::new(),
        ]
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let mut stats = vec![Stat::count("Users", items.len())];
        stats.extend(
            count_labels(items, ROLES, |u| u.role.clone())
                .into_iter()
                .map(|(label, n)| Stat::count(label, n)),
        );
        stats
    }
}
