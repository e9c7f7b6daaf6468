//! Refresh targets.
//!
//! A target is a named logical grouping of cached remote data that can be
//! marked stale as a unit. The set is static configuration: it mirrors the
//! collections the client keeps warm, not runtime data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A named data collection that can be refreshed as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Rental transactions and their line items.
    Rentals,
    /// The rentable catalog (dresses, suits, accessories).
    Products,
    /// Product categories.
    Categories,
    /// Customer records.
    Customers,
    /// Back-office dashboard aggregates.
    Dashboard,
    /// Notification settings.
    Notifications,
    /// Content-managed banner sections.
    Banners,
    /// Hero image gallery.
    HeroImages,
}

impl Target {
    /// Every target, in declaration order. Order is irrelevant to the
    /// refresh policy; each member is invalidated independently.
    pub const ALL: [Target; 8] = [
        Target::Rentals,
        Target::Products,
        Target::Categories,
        Target::Customers,
        Target::Dashboard,
        Target::Notifications,
        Target::Banners,
        Target::HeroImages,
    ];

    /// Returns the stable kebab-case name used in cache keys and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Rentals => "rentals",
            Target::Products => "products",
            Target::Categories => "categories",
            Target::Customers => "customers",
            Target::Dashboard => "dashboard",
            Target::Notifications => "notifications",
            Target::Banners => "banners",
            Target::HeroImages => "hero-images",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownTarget(s.to_string()))
    }
}
