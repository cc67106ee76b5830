//! Scheduled trips (trajets).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Bus, date_of};
use crate::domain::aggregation::average_by;
use crate::domain::forms::{FieldKind, FormField};
use crate::domain::resource::{Capabilities, Resource, ResourceKind, Stat, amount_or_na, or_na};
use crate::domain::serde_utils::{self, Related};

/// A scheduled departure between two cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Departure city.
    #[serde(default, alias = "villeDepart")]
    pub ville_depart: Option<String>,
    /// Arrival city.
    #[serde(default, alias = "villeArrivee")]
    pub ville_arrivee: Option<String>,
    /// Departure date.
    #[serde(default, alias = "dateDepart")]
    pub date_depart: Option<String>,
    /// Departure time.
    #[serde(default, alias = "heureDepart")]
    pub heure_depart: Option<String>,
    /// Ticket price.
    #[serde(default, deserialize_with = "serde_utils::opt_number")]
    pub prix: Option<f64>,
    /// Assigned bus.
    #[serde(default)]
    pub bus: Option<Related<Bus>>,
}

impl Trip {
    /// `FROM → TO`, if both cities are known.
    #[must_use]
    pub fn route(&self) -> Option<String> {
        match (&self.ville_depart, &self.ville_arrivee) {
            (Some(from), Some(to)) => Some(format!("{from} → {to}")),
            _ => None,
        }
    }
}

const FORM: &[FormField] = &[
    FormField::required("ville_depart", "From", FieldKind::Text),
    FormField::required("ville_arrivee", "To", FieldKind::Text),
    FormField::required("date_depart", "Date", FieldKind::Date),
    FormField::required("heure_depart", "Time", FieldKind::Text),
    FormField::required("prix", "Price", FieldKind::Decimal),
    FormField::optional("bus", "Bus id", FieldKind::Text),
];

impl Resource for Trip {
    const KIND: ResourceKind = ResourceKind::Trip;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!("trip {}", or_na(self.route()))
    }

    fn columns() -> &'static [&'static str] {
        &["From", "To", "Date", "Time", "Price", "Bus"]
    }

    fn cells(&self) -> Vec<String> {
        let bus = self.bus.as_ref().and_then(|b| match b {
            Related::Expanded(bus) => bus.numero.clone(),
            Related::Id(_) => None,
        });
        vec![
            or_na(self.ville_depart.as_deref()),
            or_na(self.ville_arrivee.as_deref()),
            or_na(self.record_date()),
            or_na(self.heure_depart.as_deref()),
            amount_or_na(self.prix),
            or_na(bus),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        [&self.ville_depart, &self.ville_arrivee]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn record_date(&self) -> Option<NaiveDate> {
        date_of(self.date_depart.as_deref())
    }

    fn capabilities() -> Capabilities {
        Capabilities::ALL
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }

    fn form_values(&self) -> Vec<String> {
        let bus_id = self.bus.as_ref().and_then(|b| match b {
            Related::Id(id) => Some(id.clone()),
            Related::Expanded(bus) => bus.id.clone(),
        });
        vec![
            self.ville_depart.clone().unwrap_or_default(),
            self.ville_arrivee.clone().unwrap_or_default(),
            self.record_date().map(|d| d.to_string()).unwrap_or_default(),
            self.heure_depart.clone().unwrap_or_default(),
            self.prix.map(|p| p.to_string()).unwrap_or_default(),
            bus_id.unwrap_or_default(),
        ]
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let routes: BTreeSet<String> = items.iter().filter_map(Self::route).collect();
        vec![
            Stat::count("Trips", items.len()),
            Stat::count("Routes", routes.len()),
            Stat::average("Average price", average_by(items, |t| t.prix)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::StatValue;
    use crate::domain::filter::{DateRange, ListFilter};

    fn trips() -> Vec<Trip> {
        serde_json::from_str(
            r#"[
                {"_id": "t1", "ville_depart": "Dakar", "ville_arrivee": "Thies", "date_depart": "2024-03-01", "prix": "2500"},
                {"_id": "t2", "villeDepart": "Dakar", "villeArrivee": "Thies", "dateDepart": "2024-03-09T07:00:00Z", "prix": 3000},
                {"_id": "t3", "ville_depart": "Saint-Louis", "ville_arrivee": "Dakar", "bus": {"_id": "b", "numero": "12"}}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary() {
        let stats = Trip::summarize(&trips());
        assert_eq!(stats[0], Stat::count("Trips", 3));
        assert_eq!(stats[1], Stat::count("Routes", 2));
        assert_eq!(stats[2], Stat::average("Average price", 2750.0));
    }

    #[test]
    fn test_date_range_filter_uses_departure() {
        let items = trips();
        let mut filter = ListFilter::new();
        filter.set_dates(Some(DateRange::parse("2024-03-05..2024-03-31").unwrap()));

        let visible = filter.apply(&items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id(), Some("t2"));
    }

    #[test]
    fn test_cells_render_bus_and_missing_price() {
        let items = trips();
        let cells = items[2].cells();
        assert_eq!(cells[4], "N/A");
        assert_eq!(cells[5], "12");
        assert_eq!(items[2].form_values()[5], "b");
    }

    #[test]
    fn test_no_trips_summary_is_zero() {
        let stats = Trip::summarize(&[]);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[2], Stat::average("Average price", 0.0));
        for s in &stats {
            match s.value {
                StatValue::Count(n) => assert_eq!(n, 0, "{}", s.label),
                StatValue::Amount(v) | StatValue::Average(v) => assert_eq!(v, 0.0, "{}", s.label),
            }
        }
    }
}
