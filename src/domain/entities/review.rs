//! Customer reviews (avis).

use serde::{Deserialize, Serialize};

use super::{Company, User, date_of};
use crate::domain::aggregation::{average_by, count_labels};
use crate::domain::resource::{Capabilities, Facet, Resource, ResourceKind, Stat, or_na};
use crate::domain::serde_utils::{self, Related};

const RATINGS: &[&str] = &["5", "4", "3", "2", "1"];

/// A customer review of a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Backend identifier.
    #[serde(default, alias = "_id", deserialize_with = "serde_utils::opt_id")]
    pub id: Option<String>,
    /// Rating from 1 to 5.
    #[serde(default, deserialize_with = "serde_utils::opt_number")]
    pub note: Option<f64>,
    /// Free-text comment.
    #[serde(default)]
    pub commentaire: Option<String>,
    /// Author.
    #[serde(default)]
    pub user: Option<Related<User>>,
    /// Reviewed company.
    #[serde(default)]
    pub compagnie: Option<Related<Company>>,
    /// Creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl Review {
    #[allow(clippy::cast_possible_truncation)]
    fn stars(&self) -> Option<String> {
        self.note.map(|n| (n.round() as i64).to_string())
    }

    fn author(&self) -> Option<String> {
        self.user
            .as_ref()
            .and_then(Related::expanded)
            .and_then(User::display_name)
    }

    fn company_name(&self) -> Option<String> {
        self.compagnie
            .as_ref()
            .and_then(Related::expanded)
            .and_then(|c| c.nom.clone())
    }
}

const FACETS: &[Facet] = &[Facet {
    key: "note",
    label: "Rating",
    options: RATINGS,
}];

impl Resource for Review {
    const KIND: ResourceKind = ResourceKind::Review;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        format!("review by {}", or_na(self.author()))
    }

    fn columns() -> &'static [&'static str] {
        &["Rating", "Comment", "Customer", "Company", "Date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_na(self.stars()),
            or_na(self.commentaire.as_deref()),
            or_na(self.author()),
            or_na(self.company_name()),
            or_na(self.record_date()),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        [self.commentaire.clone(), self.author(), self.company_name()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "note" => self.stars(),
            _ => None,
        }
    }

    fn record_date(&self) -> Option<chrono::NaiveDate> {
        date_of(self.created_at.as_deref())
    }

    fn capabilities() -> Capabilities {
        Capabilities::DELETE
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let mut stats = vec![
            Stat::count("Reviews", items.len()),
            Stat::average("Average rating", average_by(items, |r| r.note)),
        ];
        stats.extend(
            count_labels(items, RATINGS, Self::stars)
                .into_iter()
                .map(|(label, n)| Stat::count(format!("{label}★"), n)),
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::StatValue;
    use crate::domain::filter::ListFilter;

    fn reviews() -> Vec<Review> {
        serde_json::from_str(
            r#"[
                {"_id": "r1", "note": 5, "commentaire": "Very clean bus", "compagnie": {"nom": "Sahel"}},
                {"_id": "r2", "note": "4", "commentaire": "Late departure"},
                {"_id": "r3", "commentaire": "No rating"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_average_ignores_unrated() {
        let stats = Review::summarize(&reviews());
        assert_eq!(stats[1], Stat::average("Average rating", 4.5));
        assert_eq!(stats[2], Stat::count("5★", 1));
        assert_eq!(stats[3], Stat::count("4★", 1));
    }

    #[test]
    fn test_rating_facet() {
        let items = reviews();
        let mut filter = ListFilter::new();
        filter.set_facet("note", Some("4".into()));

        let visible = filter.apply(&items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id(), Some("r2"));
    }

    #[test]
    fn test_search_matches_company_name() {
        let items = reviews();
        let mut filter = ListFilter::new();
        filter.set_search("sahel");

        assert_eq!(filter.apply(&items).len(), 1);
    }

    #[test]
    fn test_no_reviews_summary_is_zero() {
        let stats = Review::summarize(&[]);
        assert_eq!(stats.len(), 2 + RATINGS.len());
        assert_eq!(stats[1], Stat::average("Average rating", 0.0));
        for s in &stats {
            match s.value {
                StatValue::Count(n) => assert_eq!(n, 0, "{}", s.label),
                StatValue::Amount(v) | StatValue::Average(v) => assert_eq!(v, 0.0, "{}", s.label),
            }
        }
    }
}
