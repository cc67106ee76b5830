//! Client-side list filtering.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::resource::{Facet, Resource};

/// Invalid date-range input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date range {input:?}: expected YYYY-MM-DD..YYYY-MM-DD")]
pub struct DateRangeError {
    input: String,
}

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest date kept.
    pub from: Option<NaiveDate>,
    /// Latest date kept.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parses `FROM..TO`, `FROM..`, `..TO` or a single `DATE`.
    ///
    /// # Errors
    /// Returns error if a bound is not a `YYYY-MM-DD` date, or if the range is
    /// reversed.
    pub fn parse(input: &str) -> Result<Self, DateRangeError> {
        let err = || DateRangeError {
            input: input.to_string(),
        };
        let parse_bound = |s: &str| -> Result<Option<NaiveDate>, DateRangeError> {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| err())
        };

        let range = if let Some((from, to)) = input.split_once("..") {
            Self {
                from: parse_bound(from)?,
                to: parse_bound(to)?,
            }
        } else {
            let day = parse_bound(input)?;
            Self { from: day, to: day }
        };

        if range.from.is_none() && range.to.is_none() {
            return Err(err());
        }
        if let (Some(from), Some(to)) = (range.from, range.to)
            && from > to
        {
            return Err(err());
        }

        Ok(range)
    }

    /// Returns whether a date lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        write!(f, "{}..{}", bound(self.from), bound(self.to))
    }
}

/// Search string, discrete facets and date range narrowing a loaded list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    search: String,
    facets: BTreeMap<&'static str, String>,
    dates: Option<DateRange>,
}

impl ListFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search string.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search string.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Selected value of a facet.
    #[must_use]
    pub fn facet(&self, key: &str) -> Option<&str> {
        self.facets.get(key).map(String::as_str)
    }

    /// Selects a facet value; `None` clears it.
    pub fn set_facet(&mut self, key: &'static str, value: Option<String>) {
        match value {
            Some(v) => {
                self.facets.insert(key, v);
            }
            None => {
                self.facets.remove(key);
            }
        }
    }

    /// Advances a facet through `none → option₁ → … → optionₙ → none`.
    pub fn cycle_facet(&mut self, facet: &Facet) {
        let next = match self.facet(facet.key) {
            None => facet.options.first(),
            Some(current) => facet
                .options
                .iter()
                .position(|o| o.eq_ignore_ascii_case(current))
                .and_then(|i| facet.options.get(i + 1)),
        };
        self.set_facet(facet.key, next.map(ToString::to_string));
    }

    /// Current date range.
    #[must_use]
    pub const fn dates(&self) -> Option<DateRange> {
        self.dates
    }

    /// Replaces the date range.
    pub fn set_dates(&mut self, dates: Option<DateRange>) {
        self.dates = dates;
    }

    /// Returns whether any criterion is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.facets.is_empty() || self.dates.is_some()
    }

    /// Clears every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns whether a record satisfies every criterion.
    ///
    /// A record without a date never satisfies an active date range.
    #[must_use]
    pub fn matches<R: Resource>(&self, item: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !item
                .search_text()
                .iter()
                .any(|text| text.to_lowercase().contains(&needle))
        {
            return false;
        }

        for (key, wanted) in &self.facets {
            let matches = item
                .facet_value(key)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(wanted));
            if !matches {
                return false;
            }
        }

        if let Some(range) = self.dates {
            return item.record_date().is_some_and(|d| range.contains(d));
        }

        true
    }

    /// Returns the records satisfying the filter, in their original order.
    #[must_use]
    pub fn apply<'a, R: Resource>(&self, items: &'a [R]) -> Vec<&'a R> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}
