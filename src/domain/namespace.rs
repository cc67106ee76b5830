//! Console namespaces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Route namespace of the active console.
///
/// Each namespace owns its own session token. The platform namespace is the
/// super-admin console; every other route belongs to a company admin.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Per-company admin console.
    #[default]
    Company,
    /// Platform super-admin console.
    Platform,
}

impl Namespace {
    /// Session store key holding this namespace's token.
    #[must_use]
    pub const fn token_key(self) -> &'static str {
        match self {
            Self::Company => "company-token",
            Self::Platform => "platform-token",
        }
    }

    /// Human-readable console title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Company => "Company admin",
            Self::Platform => "Super admin",
        }
    }

    /// Returns the other namespace.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Company => Self::Platform,
            Self::Platform => Self::Company,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Company => write!(f, "company"),
            Self::Platform => write!(f, "platform"),
        }
    }
}

/// Collection scope of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Records owned by one company.
    Company(String),
    /// Unscoped platform-wide listing.
    All,
}

impl ListScope {
    /// Returns the company id for company-scoped lists.
    #[must_use]
    pub fn company_id(&self) -> Option<&str> {
        match self {
            Self::Company(id) => Some(id),
            Self::All => None,
        }
    }
}
