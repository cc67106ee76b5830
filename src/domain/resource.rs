//! Generic contract shared by every list tab.

use std::fmt;

use bitflags::bitflags;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::domain::forms::FormField;

/// Literal rendered for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Renders an optional value, or `N/A` when absent.
#[must_use]
pub fn or_na<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Renders an optional amount with two decimals, or `N/A` when absent.
#[must_use]
pub fn amount_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// Backend collections managed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Buses of a company.
    Bus,
    /// Scheduled trips.
    Trip,
    /// Issued e-tickets.
    ETicket,
    /// Transport companies.
    Company,
    /// Platform users.
    User,
    /// Customer reviews.
    Review,
    /// Payments (sales).
    Payment,
}

impl ResourceKind {
    /// REST collection segment.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Bus => "buses",
            Self::Trip => "trajets",
            Self::ETicket => "ebills",
            Self::Company => "compagnies",
            Self::User => "users",
            Self::Review => "avis",
            Self::Payment => "paiements",
        }
    }

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bus => "Buses",
            Self::Trip => "Trips",
            Self::ETicket => "E-tickets",
            Self::Company => "Companies",
            Self::User => "Users",
            Self::Review => "Reviews",
            Self::Payment => "Payments",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

bitflags! {
    /// Mutations a tab offers for its resource.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Records can be created.
        const CREATE = 1;
        /// Records can be updated.
        const UPDATE = 1 << 1;
        /// Records can be deleted.
        const DELETE = 1 << 2;
        /// Full CRUD.
        const ALL = Self::CREATE.bits() | Self::UPDATE.bits() | Self::DELETE.bits();
    }
}

/// A discrete filter over one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet {
    /// Attribute key passed to [`Resource::facet_value`].
    pub key: &'static str,
    /// Label shown in the filter bar.
    pub label: &'static str,
    /// Values the filter cycles through.
    pub options: &'static [&'static str],
}

/// Value of one summary statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    /// Number of records.
    Count(usize),
    /// Summed amount.
    Amount(f64),
    /// Mean value.
    Average(f64),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Amount(v) => write!(f, "{v:.2}"),
            Self::Average(v) => write!(f, "{v:.1}"),
        }
    }
}

/// A labelled summary statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    /// Label.
    pub label: String,
    /// Value.
    pub value: StatValue,
}

impl Stat {
    /// Count statistic.
    #[must_use]
    pub fn count(label: impl Into<String>, n: usize) -> Self {
        Self {
            label: label.into(),
            value: StatValue::Count(n),
        }
    }

    /// Amount statistic.
    #[must_use]
    pub fn amount(label: impl Into<String>, v: f64) -> Self {
        Self {
            label: label.into(),
            value: StatValue::Amount(v),
        }
    }

    /// Average statistic.
    #[must_use]
    pub fn average(label: impl Into<String>, v: f64) -> Self {
        Self {
            label: label.into(),
            value: StatValue::Average(v),
        }
    }
}

/// A backend record listed, filtered, summarized and edited by a tab.
pub trait Resource: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Collection this record belongs to.
    const KIND: ResourceKind;

    /// Backend identifier.
    fn id(&self) -> Option<&str>;

    /// Short description used in confirmations.
    fn label(&self) -> String;

    /// Table column titles.
    fn columns() -> &'static [&'static str];

    /// Rendered cells, aligned with [`Resource::columns`].
    fn cells(&self) -> Vec<String>;

    /// Texts the search box matches against.
    fn search_text(&self) -> Vec<String> {
        self.cells()
    }

    /// Discrete filters offered by the tab.
    fn facets() -> &'static [Facet] {
        &[]
    }

    /// Value of a facet attribute.
    fn facet_value(&self, _key: &str) -> Option<String> {
        None
    }

    /// Date used by the date-range filter.
    fn record_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Mutations the tab offers.
    fn capabilities() -> Capabilities;

    /// Fields of the create/edit form.
    fn form_fields() -> &'static [FormField] {
        &[]
    }

    /// Current values, aligned with [`Resource::form_fields`].
    fn form_values(&self) -> Vec<String> {
        Vec::new()
    }

    /// Summary statistics over the whole loaded collection.
    fn summarize(items: &[Self]) -> Vec<Stat>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(3)), "3");
        assert_eq!(or_na::<u32>(None), "N/A");
        assert_eq!(amount_or_na(Some(2.5)), "2.50");
        assert_eq!(amount_or_na(None), "N/A");
    }

    #[test]
    fn test_capabilities_all() {
        assert!(Capabilities::ALL.contains(Capabilities::DELETE));
        assert!(!Capabilities::DELETE.contains(Capabilities::CREATE));
    }

    #[test]
    fn test_collections() {
        assert_eq!(ResourceKind::Bus.collection(), "buses");
        assert_eq!(ResourceKind::ETicket.collection(), "ebills");
        assert_eq!(ResourceKind::Review.collection(), "avis");
    }
}
