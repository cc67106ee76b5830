//! Payments (sales).

use serde::{Deserialize, Serialize};

use super::{User, date_of};
use crate::domain::aggregation::{average_by, count_labels, sum_by};
use crate::domain::resource::{
    Capabilities, Facet, Resource, ResourceKind, Stat, amount_or_na, or_na,
};
use crate::domain::serde_utils::{self, Related};

const STATUSES: &[&str] = &["pending", "completed", "failed"];

/// A ticket payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Transaction reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Amount paid.
    #[serde(default, deserialize_with = "serde_utils::opt_number")]
    pub montant: Option<f64>,
    /// Payment method.
    #[serde(default)]
    pub methode: Option<String>,
    /// Payment status.
    #[serde(default)]
    pub statut: Option<String>,
    /// Paying user.
    #[serde(default)]
    pub user: Option<Related<User>>,
    /// Creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl Payment {
    fn customer(&self) -> Option<String> {
        self.user
            .as_ref()
            .and_then(Related::expanded)
            .and_then(User::display_name)
    }
}

const FACETS: &[Facet] = &[Facet {
    key: "statut",
    label: "Status",
    options: STATUSES,
}];

impl Resource for Payment {
    const KIND: ResourceKind = ResourceKind::Payment;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!(
            "payment {}",
            or_na(self.reference.as_deref().or(self.id.as_deref()))
        )
    }

    fn columns() -> &'static [&'static str] {
        &["Reference", "Amount", "Method", "Status", "Customer", "Date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_na(self.reference.as_deref().or(self.id.as_deref())),
            amount_or_na(self.montant),
            or_na(self.methode.as_deref()),
            or_na(self.statut.as_deref()),
            or_na(self.customer()),
            or_na(self.record_date()),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        [
            self.reference.clone(),
            self.id.clone(),
            self.methode.clone(),
            self.customer(),
        ]
        .into_iter()
        .flatten()
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
        Capabilities::empty()
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let mut stats = vec![
            Stat::count("Payments", items.len()),
            Stat::amount("Revenue", sum_by(items, |p| p.montant)),
            Stat::average("Average amount", average_by(items, |p| p.montant)),
        ];
        stats.extend(
            count_labels(items, STATUSES, |p| p.statut.clone())
                .into_iter()
                .map(|(label, n)| Stat::count(label, n)),
        );
        stats
    }
}
