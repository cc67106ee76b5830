//! Bus records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Company;
use crate::domain::aggregation::{count_labels, sum_by};
use crate::domain::forms::{FieldKind, FormField};
use crate::domain::resource::{Capabilities, Facet, Resource, ResourceKind, Stat, or_na};
use crate::domain::serde_utils::{self, Related};

/// Bus category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusCategory {
    /// Regular coach.
    #[serde(alias = "standard", alias = "STANDARD")]
    Standard,
    /// Premium coach.
    #[serde(rename = "VIP", alias = "vip", alias = "Vip")]
    Vip,
    /// Small bus.
    #[serde(alias = "minibus", alias = "MiniBus", alias = "MINIBUS")]
    Minibus,
    /// Any category this console does not know.
    #[serde(other)]
    Other,
}

impl BusCategory {
    /// Labels of the known categories.
    pub const LABELS: &'static [&'static str] = &["Standard", "VIP", "Minibus"];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Vip => "VIP",
            Self::Minibus => "Minibus",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for BusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A bus owned by one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Fleet number.
    #[serde(default, deserialize_with = "serde_utils::opt_id")]
    pub numero: Option<String>,
    /// Category.
    #[serde(default, rename = "type", deserialize_with = "serde_utils::lenient")]
    pub category: Option<BusCategory>,
    /// Seat count.
    #[serde(default, deserialize_with = "serde_utils::opt_count")]
    pub capacite: Option<u32>,
    /// Owning company.
    #[serde(default)]
    pub compagnie: Option<Related<Company>>,
}

const FORM: &[FormField] = &[
    FormField::required("numero", "Number", FieldKind::Text),
    FormField::required("type", "Category", FieldKind::Choice(BusCategory::LABELS)),
    FormField::required("capacite", "Capacity", FieldKind::Integer),
];

const FACETS: &[Facet] = &[Facet {
    key: "type",
    label: "Category",
    options: BusCategory::LABELS,
}];

impl Resource for Bus {
    const KIND: ResourceKind = ResourceKind::Bus;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!("bus #{}", or_na(self.numero.as_deref()))
    }

    fn columns() -> &'static [&'static str] {
        &["Number", "Category", "Capacity", "Company"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_na(self.numero.as_deref()),
            or_na(self.category),
            or_na(self.capacite),
            or_na(
                self.compagnie
                    .as_ref()
                    .and_then(Related::expanded)
                    .and_then(|c| c.nom.as_deref()),
            ),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        [
            self.numero.clone(),
            self.category.map(|c| c.label().to_string()),
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
            "type" => self.category.map(|c| c.label().to_string()),
            _ => None,
        }
    }

    fn capabilities() -> Capabilities {
        Capabilities::ALL
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }

    fn form_values(&self) -> Vec<String> {
        vec![
            self.numero.clone().unwrap_or_default(),
            self.category
                .filter(|c| *c != BusCategory::Other)
                .unwrap_or(BusCategory::Standard)
                .label()
                .to_string(),
            self.capacite.map(|c| c.to_string()).unwrap_or_default(),
        ]
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let mut stats = vec![
            Stat::count("Buses", items.len()),
            Stat::amount("Total seats", sum_by(items, |b| b.capacite.map(f64::from))),
        ];
        stats.extend(
            count_labels(items, BusCategory::LABELS, |b| {
                b.category.map(|c| c.label().to_string())
            })
            .into_iter()
            .map(|(label, n)| Stat::count(label, n)),
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::StatValue;
    use crate::domain::serde_utils::ListEnvelope;

    fn fleet() -> Vec<Bus> {
        serde_json::from_str(
            r#"[
                {"numero": 1, "type": "VIP", "capacite": 40},
                {"numero": 2, "type": "Standard", "capacite": 30}
            ]"#,
        )
        .unwrap()
    }

    fn stat(stats: &[Stat], label: &str) -> StatValue {
        stats.iter().find(|s| s.label == label).unwrap().value
    }

    #[test]
    fn test_capacity_total() {
        let stats = Bus::summarize(&fleet());
        assert_eq!(stat(&stats, "Buses"), StatValue::Count(2));
        assert_eq!(stat(&stats, "Total seats"), StatValue::Amount(70.0));
        assert_eq!(stat(&stats, "VIP"), StatValue::Count(1));
        assert_eq!(stat(&stats, "Minibus"), StatValue::Count(0));
    }

    #[test]
    fn test_empty_fleet_stats_are_zero() {
        let stats = Bus::summarize(&[]);
        for s in &stats {
            match s.value {
                StatValue::Count(n) => assert_eq!(n, 0, "{}", s.label),
                StatValue::Amount(v) | StatValue::Average(v) => assert_eq!(v, 0.0, "{}", s.label),
            }
        }
    }

    #[test]
    fn test_absent_fields_render_na() {
        let bus: Bus = serde_json::from_str(r#"{"_id": "x"}"#).unwrap();
        assert_eq!(bus.id(), Some("x"));
        assert_eq!(bus.cells(), vec!["N/A", "N/A", "N/A", "N/A"]);
    }

    #[test]
    fn test_loose_capacity_keeps_list_loading() {
        let buses = serde_json::from_str::<ListEnvelope<Bus>>(
            r#"[
                {"numero": 1, "type": "VIP", "capacite": 40},
                {"numero": 2, "type": 3, "capacite": "30"},
                {"numero": 3, "type": null, "capacite": null}
            ]"#,
        )
        .unwrap()
        .into_vec();

        assert_eq!(buses.len(), 3);
        assert_eq!(buses[1].capacite, Some(30));
        assert!(buses[1].category.is_none());
        assert_eq!(buses[2].cells()[1..3], ["N/A", "N/A"]);
        assert_eq!(
            stat(&Bus::summarize(&buses), "Total seats"),
            StatValue::Amount(70.0)
        );
    }

    #[test]
    fn test_category_aliases_and_unknown() {
        let bus: Bus = serde_json::from_str(r#"{"type": "vip"}"#).unwrap();
        assert_eq!(bus.category, Some(BusCategory::Vip));

        let bus: Bus = serde_json::from_str(r#"{"type": "Double-decker"}"#).unwrap();
        assert_eq!(bus.category, Some(BusCategory::Other));
        assert_eq!(bus.form_values()[1], "Standard");
    }

    #[test]
    fn test_company_name_when_expanded() {
        let bus: Bus =
            serde_json::from_str(r#"{"numero": "7", "compagnie": {"_id": "c", "nom": "Sahel"}}"#)
                .unwrap();
        assert_eq!(bus.cells()[3], "Sahel");

        let bus: Bus = serde_json::from_str(r#"{"numero": "7", "compagnie": "c"}"#).unwrap();
        assert_eq!(bus.cells()[3], "N/A");
    }
}
