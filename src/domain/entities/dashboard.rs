//! Company dashboard figures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::resource::{amount_or_na, or_na};
use crate::domain::serde_utils;

/// Headline figures the backend computes for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDashboard {
    /// Number of buses.
    #[serde(
        default,
        alias = "totalBus",
        alias = "nbBus",
        deserialize_with = "serde_utils::opt_number"
    )]
    pub buses: Option<f64>,
    /// Number of trips.
    #[serde(
        default,
        alias = "totalTrajets",
        alias = "trajets",
        deserialize_with = "serde_utils::opt_number"
    )]
    pub trips: Option<f64>,
    /// Number of tickets sold.
    #[serde(
        default,
        alias = "totalBillets",
        alias = "billets",
        deserialize_with = "serde_utils::opt_number"
    )]
    pub tickets: Option<f64>,
    /// Revenue.
    #[serde(
        default,
        alias = "chiffreAffaires",
        alias = "totalRevenus",
        alias = "revenus",
        deserialize_with = "serde_utils::opt_number"
    )]
    pub revenue: Option<f64>,
    /// Scalar figures not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CompanyDashboard {
    /// Label/value rows to render, known figures first.
    #[must_use]
    pub fn figures(&self) -> Vec<(String, String)> {
        #[allow(clippy::cast_possible_truncation)]
        let count = |v: Option<f64>| or_na(v.map(|n| n.round() as i64));

        let mut rows = vec![
            ("Buses".to_string(), count(self.buses)),
            ("Trips".to_string(), count(self.trips)),
            ("Tickets sold".to_string(), count(self.tickets)),
            ("Revenue".to_string(), amount_or_na(self.revenue)),
        ];
        rows.extend(self.extra.iter().filter_map(|(key, value)| {
            let rendered = match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), rendered))
        }));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_and_extra_figures() {
        let dash: CompanyDashboard = serde_json::from_str(
            r#"{"totalBus": 4, "totalTrajets": "12", "chiffreAffaires": 150000, "tauxRemplissage": 0.8, "recent": []}"#,
        )
        .unwrap();

        let rows = dash.figures();
        assert_eq!(rows[0], ("Buses".to_string(), "4".to_string()));
        assert_eq!(rows[1], ("Trips".to_string(), "12".to_string()));
        assert_eq!(rows[2].1, "N/A");
        assert_eq!(rows[3].1, "150000.00");
        assert_eq!(rows[4], ("tauxRemplissage".to_string(), "0.8".to_string()));
        assert_eq!(rows.len(), 5);
    }
}
