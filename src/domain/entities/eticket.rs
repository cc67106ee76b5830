//! Issued e-tickets (ebills).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Payment, Trip, User, date_of};
use crate::domain::aggregation::{count_labels, sum_by};
use crate::domain::forms::{FieldKind, FormField};
use crate::domain::resource::{
    Capabilities, Facet, Resource, ResourceKind, Stat, amount_or_na, or_na,
};
use crate::domain::serde_utils::{self, Related};

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Paid and not yet used.
    #[default]
    Valid,
    /// Scanned at boarding.
    Used,
    /// Cancelled by the customer or the company.
    #[serde(alias = "canceled")]
    Cancelled,
    /// Departure passed without boarding.
    Expired,
    /// Any status this console does not know.
    #[serde(other)]
    Other,
}

impl TicketStatus {
    /// Statuses an operator may set.
    pub const OPTIONS: &'static [&'static str] = &["valid", "used", "cancelled", "expired"];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Used => "used",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A traveller listed on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    /// Full name.
    #[serde(default)]
    pub nom: Option<String>,
    /// Age in years.
    #[serde(default, deserialize_with = "serde_utils::opt_count")]
    pub age: Option<u32>,
}

/// An electronic ticket for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ETicket {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Ticket status.
    #[serde(default, deserialize_with = "serde_utils::lenient")]
    pub statut: Option<TicketStatus>,
    /// Booked trip.
    #[serde(default)]
    pub trajet: Option<Related<Trip>>,
    /// Travellers.
    #[serde(default)]
    pub passagers: Vec<Passenger>,
    /// Settling payment.
    #[serde(default)]
    pub paiement: Option<Related<Payment>>,
    /// Buyer.
    #[serde(default)]
    pub user: Option<Related<User>>,
    /// Boarding code payload.
    #[serde(default, alias = "qrCode")]
    pub qr_code: Option<String>,
    /// Issue timestamp.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl ETicket {
    fn trip(&self) -> Option<&Trip> {
        self.trajet.as_ref().and_then(Related::expanded)
    }

    fn amount(&self) -> Option<f64> {
        self.paiement
            .as_ref()
            .and_then(Related::expanded)
            .and_then(|p| p.montant)
    }

    fn customer(&self) -> Option<String> {
        self.user
            .as_ref()
            .and_then(Related::expanded)
            .and_then(User::display_name)
    }

    /// Short reference: the last 8 characters of the id.
    #[must_use]
    pub fn reference(&self) -> Option<String> {
        self.id.as_deref().map(|id| {
            let chars: Vec<char> = id.chars().collect();
            let start = chars.len().saturating_sub(8);
            chars[start..].iter().collect::<String>().to_uppercase()
        })
    }
}

const FACETS: &[Facet] = &[Facet {
    key: "statut",
    label: "Status",
    options: TicketStatus::OPTIONS,
}];

const FORM: &[FormField] = &[FormField::required(
    "statut",
    "Status",
    FieldKind::Choice(TicketStatus::OPTIONS),
)];

impl Resource for ETicket {
    const KIND: ResourceKind = ResourceKind::ETicket;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!("ticket {}", or_na(self.reference()))
    }

    fn columns() -> &'static [&'static str] {
        &[
            "Reference",
            "Status",
            "Route",
            "Departure",
            "Passengers",
            "Amount",
            "Customer",
        ]
    }

    fn cells(&self) -> Vec<String> {
        let trip = self.trip();
        vec![
            or_na(self.reference()),
            or_na(self.statut),
            or_na(trip.and_then(Trip::route)),
            or_na(trip.and_then(|t| t.date_depart.as_deref())),
            self.passagers.len().to_string(),
            amount_or_na(self.amount()),
            or_na(self.customer()),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        let mut texts: Vec<String> = [self.id.clone(), self.customer()]
            .into_iter()
            .flatten()
            .collect();
        if let Some(trip) = self.trip() {
            texts.extend(trip.ville_depart.iter().chain(&trip.ville_arrivee).cloned());
        }
        texts.extend(self.passagers.iter().filter_map(|p| p.nom.clone()));
        texts
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "statut" => self.statut.map(|s| s.to_string()),
            _ => None,
        }
    }

    fn record_date(&self) -> Option<NaiveDate> {
        date_of(self.created_at.as_deref())
            .or_else(|| date_of(self.trip().and_then(|t| t.date_depart.as_deref())))
    }

    fn capabilities() -> Capabilities {
        Capabilities::UPDATE | Capabilities::DELETE
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }

    fn form_values(&self) -> Vec<String> {
        vec![self.statut.unwrap_or_default().to_string()]
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let mut stats = vec![Stat::count("Tickets", items.len())];
        stats.extend(
            count_labels(items, TicketStatus::OPTIONS, |t| t.statut.map(|s| s.to_string()))
                .into_iter()
                .map(|(label, n)| Stat::count(label, n)),
        );
        stats.push(Stat::count(
            "Passengers",
            items.iter().map(|t| t.passagers.len()).sum(),
        ));
        stats.push(Stat::amount("Revenue", sum_by(items, Self::amount)));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::StatValue;
    use crate::domain::serde_utils::ListEnvelope;

    fn tickets() -> Vec<ETicket> {
        serde_json::from_str(
            r#"[
                {
                    "_id": "665f1c2e9a1b2c3d4e5f6789",
                    "statut": "valid",
                    "trajet": {"villeDepart": "Dakar", "villeArrivee": "Thies", "dateDepart": "2024-06-01"},
                    "passagers": [{"nom": "Awa", "age": 31}, {"nom": "Moussa"}],
                    "paiement": {"montant": 5000}
                },
                {"_id": "t2", "statut": "canceled", "trajet": "trip-9", "paiement": "p-1"},
                {"_id": "t3", "statut": "refunded", "createdAt": "2024-05-02T10:00:00Z"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_status_parsing() {
        let items = tickets();
        assert_eq!(items[0].statut, Some(TicketStatus::Valid));
        assert_eq!(items[1].statut, Some(TicketStatus::Cancelled));
        assert_eq!(items[2].statut, Some(TicketStatus::Other));
    }

    #[test]
    fn test_null_status_and_string_age_keep_list_loading() {
        let items = serde_json::from_str::<ListEnvelope<ETicket>>(
            r#"{"data": [
                {"_id": "a1", "statut": "valid"},
                {"_id": "a2", "statut": null, "passagers": [{"nom": "Awa", "age": "31"}]},
                {"_id": "a3", "statut": 4, "passagers": [{"nom": "Ibou", "age": null}]}
            ]}"#,
        )
        .unwrap()
        .into_vec();

        assert_eq!(items.len(), 3);
        assert!(items[1].statut.is_none());
        assert_eq!(items[1].cells()[1], "N/A");
        assert_eq!(items[1].facet_value("statut"), None);
        assert_eq!(items[1].form_values(), vec!["valid"]);
        assert_eq!(items[1].passagers[0].age, Some(31));
        assert!(items[2].statut.is_none());
        assert!(items[2].passagers[0].age.is_none());

        let stats = ETicket::summarize(&items);
        assert_eq!(stats[0], Stat::count("Tickets", 3));
        assert_eq!(stats[1], Stat::count("valid", 1));
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let stats = ETicket::summarize(&[]);
        assert_eq!(stats.len(), 7);
        for s in &stats {
            match s.value {
                StatValue::Count(n) => assert_eq!(n, 0, "{}", s.label),
                StatValue::Amount(v) | StatValue::Average(v) => assert_eq!(v, 0.0, "{}", s.label),
            }
        }
    }

    #[test]
    fn test_cells_with_expanded_trip() {
        let cells = tickets()[0].cells();
        assert_eq!(cells[0], "4E5F6789");
        assert_eq!(cells[2], "Dakar → Thies");
        assert_eq!(cells[3], "2024-06-01");
        assert_eq!(cells[4], "2");
        assert_eq!(cells[5], "5000.00");
    }

    #[test]
    fn test_cells_with_bare_references() {
        let cells = tickets()[1].cells();
        assert_eq!(cells[2], "N/A");
        assert_eq!(cells[5], "N/A");
    }

    #[test]
    fn test_record_date_falls_back_to_trip() {
        let items = tickets();
        assert_eq!(items[0].record_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(items[2].record_date(), NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(items[1].record_date(), None);
    }

    #[test]
    fn test_summary() {
        let stats = ETicket::summarize(&tickets());
        assert_eq!(stats[0], Stat::count("Tickets", 3));
        assert_eq!(stats[1], Stat::count("valid", 1));
        assert_eq!(stats[3], Stat::count("cancelled", 1));
        assert_eq!(stats[5], Stat::count("Passengers", 2));
        assert_eq!(stats[6], Stat::amount("Revenue", 5000.0));
    }
}
