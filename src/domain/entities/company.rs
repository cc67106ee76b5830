//! Transport companies (platform view).

use serde::{Deserialize, Serialize};

use super::date_of;
use crate::domain::aggregation::count_labels;
use crate::domain::forms::{FieldKind, FormField};
use crate::domain::resource::{Capabilities, Facet, Resource, ResourceKind, Stat, or_na};
use crate::domain::serde_utils;

/// Known account statuses.
const STATUSES: &[&str] = &["active", "suspended"];

/// A transport operator tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Company name.
    #[serde(default)]
    pub nom: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub telephone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub adresse: Option<String>,
    /// Account status.
    #[serde(default)]
    pub statut: Option<String>,
    /// Creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

const FORM: &[FormField] = &[
    FormField::required("nom", "Name", FieldKind::Text),
    FormField::required("email", "Email", FieldKind::Text),
    FormField::optional("telephone", "Phone", FieldKind::Text),
    FormField::optional("adresse", "Address", FieldKind::Text),
    FormField::required("statut", "Status", FieldKind::Choice(STATUSES)),
    FormField::required("password", "Password", FieldKind::Secret),
];

const FACETS: &[Facet] = &[Facet {
    key: "statut",
    label: "Status",
    options: STATUSES,
}];

impl Resource for Company {
    const KIND: ResourceKind = ResourceKind::Company;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!("company {}", or_na(self.nom.as_deref()))
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Email", "Phone", "Address", "Status", "Created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_na(self.nom.as_deref()),
            or_na(self.email.as_deref()),
            or_na(self.telephone.as_deref()),
            or_na(self.adresse.as_deref()),
            or_na(self.statut.as_deref()),
            or_na(self.record_date()),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        [&self.nom, &self.email, &self.telephone, &self.adresse]
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
            "statut" => self.statut.clone(),
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
            self.email.clone().unwrap_or_default(),
            self.telephone.clone().unwrap_or_default(),
            self.adresse.clone().unwrap_or_default(),
            self.statut
                .clone()
                .filter(|s| STATUSES.contains(&s.as_str()))
                .unwrap_or_else(|| STATUSES[0].to_string()),
            String::new(),
        ]
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let mut stats = vec![Stat::count("Companies", items.len())];
        stats.extend(
            count_labels(items, STATUSES, |c| c.statut.clone())
                .into_iter()
                .map(|(label, n)| Stat::count(label, n)),
        );
        stats
    }
}
