//! Venue filter engine
//!
//! Computes the visible subset of a venue listing from a set of independent
//! criteria. Every active criterion must hold (logical AND), required services
//! are themselves AND-ed, and the relative order of the input is preserved.
//!
//! # Example
//!
//! ```rust,ignore
//! let criteria = VenueCriteria::default()
//!     .with_city("Lahore")
//!     .with_capacity(CapacityBracket::From250To500)
//!     .with_service("Catering");
//!
//! let visible = filter_venues(&venues, &criteria);
//! ```

use crate::core::venue::Venue;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI label meaning "no constraint" for city, capacity and venue type
pub const ALL: &str = "All";

/// Separates required services in a query string
pub const SERVICE_SEPARATOR: &str = ",";

/// A filter dimension that is either constraining or switched off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Criterion<T> {
    Active(T),
    Inactive,
}

// Not derived: the derive would demand `T: Default`.
impl<T> Default for Criterion<T> {
    fn default() -> Self {
        Criterion::Inactive
    }
}

impl<T> Criterion<T> {
    pub fn is_active(&self) -> bool {
        matches!(self, Criterion::Active(_))
    }

    pub fn as_active(&self) -> Option<&T> {
        match self {
            Criterion::Active(value) => Some(value),
            Criterion::Inactive => None,
        }
    }

    /// True when inactive, otherwise the predicate applied to the value
    pub fn admits(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Criterion::Active(value) => predicate(value),
            Criterion::Inactive => true,
        }
    }
}

impl Criterion<String> {
    /// Map the `"All"` label (or an empty selection) to [`Criterion::Inactive`]
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() || label == ALL {
            Criterion::Inactive
        } else {
            Criterion::Active(label.to_string())
        }
    }

    /// Map an empty search box to [`Criterion::Inactive`]
    pub fn from_search(term: &str) -> Self {
        if term.is_empty() {
            Criterion::Inactive
        } else {
            Criterion::Active(term.to_string())
        }
    }

    /// Label shown in a select, `"All"` when inactive
    pub fn label(&self) -> &str {
        self.as_active().map_or(ALL, String::as_str)
    }
}

impl Criterion<u64> {
    /// A price ceiling at the largest representable bound constrains nothing
    pub fn from_max_price(max: u64) -> Self {
        if max == u64::MAX {
            Criterion::Inactive
        } else {
            Criterion::Active(max)
        }
    }
}

/// Fixed guest-capacity brackets offered by the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityBracket {
    /// `100 <= capacity <= 250`
    #[serde(rename = "100-250")]
    From100To250,
    /// `250 < capacity <= 500`
    #[serde(rename = "250-500")]
    From250To500,
    /// `500 < capacity <= 1000`
    #[serde(rename = "500-1000")]
    From500To1000,
    /// `capacity > 1000`
    #[serde(rename = "1000+")]
    Over1000,
}

impl CapacityBracket {
    pub const ALL: [CapacityBracket; 4] = [
        CapacityBracket::From100To250,
        CapacityBracket::From250To500,
        CapacityBracket::From500To1000,
        CapacityBracket::Over1000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CapacityBracket::From100To250 => "100-250",
            CapacityBracket::From250To500 => "250-500",
            CapacityBracket::From500To1000 => "500-1000",
            CapacityBracket::Over1000 => "1000+",
        }
    }

    pub fn contains(&self, capacity: i64) -> bool {
        match self {
            CapacityBracket::From100To250 => (100..=250).contains(&capacity),
            CapacityBracket::From250To500 => capacity > 250 && capacity <= 500,
            CapacityBracket::From500To1000 => capacity > 500 && capacity <= 1000,
            CapacityBracket::Over1000 => capacity > 1000,
        }
    }

    /// Parse a select label, `"All"` and `""` meaning no constraint
    pub fn criterion(label: &str) -> Result<Criterion<CapacityBracket>, UnknownBracket> {
        if label.is_empty() || label == ALL {
            Ok(Criterion::Inactive)
        } else {
            label.parse().map(Criterion::Active)
        }
    }
}

impl fmt::Display for CapacityBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A capacity label outside the fixed bracket table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown capacity bracket '{0}'")]
pub struct UnknownBracket(pub String);

impl FromStr for CapacityBracket {
    type Err = UnknownBracket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapacityBracket::ALL
            .into_iter()
            .find(|bracket| bracket.label() == s)
            .ok_or_else(|| UnknownBracket(s.to_string()))
    }
}

/// Everything the listing can filter on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueCriteria {
    /// Case-insensitive substring of name, city or description
    pub search: Criterion<String>,
    /// Exact city
    pub city: Criterion<String>,
    pub capacity: Criterion<CapacityBracket>,
    /// Inclusive price-per-day ceiling in PKR
    pub max_price: Criterion<u64>,
    /// Exact venue type
    pub venue_type: Criterion<String>,
    /// Services that must all appear in the amenities
    pub services: IndexSet<String>,
}

impl VenueCriteria {
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Criterion::from_search(term);
        self
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Criterion::from_label(city);
        self
    }

    pub fn with_capacity(mut self, bracket: CapacityBracket) -> Self {
        self.capacity = Criterion::Active(bracket);
        self
    }

    pub fn with_max_price(mut self, max: u64) -> Self {
        self.max_price = Criterion::from_max_price(max);
        self
    }

    pub fn with_venue_type(mut self, venue_type: &str) -> Self {
        self.venue_type = Criterion::from_label(venue_type);
        self
    }

    /// Require a service; a comma-separated list adds each entry
    ///
    /// Amenity tags never contain commas, so splitting loses nothing and
    /// keeps the criteria expressible as a `services=` query parameter.
    pub fn with_service(mut self, service: &str) -> Self {
        for name in split_services(service) {
            self.services.insert(name.to_string());
        }
        self
    }

    /// True when no criterion constrains the listing
    pub fn is_unconstrained(&self) -> bool {
        !self.search.is_active()
            && !self.city.is_active()
            && !self.capacity.is_active()
            && !self.max_price.is_active()
            && !self.venue_type.is_active()
            && self.services.is_empty()
    }

    /// Whether a single venue satisfies every active criterion
    pub fn matches(&self, venue: &Venue) -> bool {
        self.matches_search(venue)
            && self.city.admits(|city| venue.city == *city)
            && self.capacity.admits(|bracket| bracket.contains(venue.capacity))
            && self
                .max_price
                .admits(|max| venue.price_per_day <= *max as f64)
            && self.venue_type.admits(|kind| venue.venue_type == *kind)
            && self.matches_services(venue)
    }

    fn matches_search(&self, venue: &Venue) -> bool {
        self.search.admits(|term| {
            let term = term.to_lowercase();
            venue.name.to_lowercase().contains(&term)
                || venue.city.to_lowercase().contains(&term)
                || venue.description.to_lowercase().contains(&term)
        })
    }

    // Substring match against the whole amenities text, so "catering"
    // also matches "Outdoor Catering Service".
    fn matches_services(&self, venue: &Venue) -> bool {
        if self.services.is_empty() {
            return true;
        }
        if venue.amenities.is_empty() {
            return false;
        }
        let text = venue.amenities.folded();
        self.services
            .iter()
            .all(|service| text.contains(&service.to_lowercase()))
    }
}

/// Non-blank, trimmed entries of a comma-separated service list
pub fn split_services(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SERVICE_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Order-preserving subset of `venues` matching `criteria`
pub fn filter_venues(venues: &[Venue], criteria: &VenueCriteria) -> Vec<Venue> {
    filter_refs(venues, criteria).into_iter().cloned().collect()
}

/// Borrowing variant of [`filter_venues`]
pub fn filter_refs<'a>(venues: &'a [Venue], criteria: &VenueCriteria) -> Vec<&'a Venue> {
    if criteria.is_unconstrained() {
        return venues.iter().collect();
    }
    venues.iter().filter(|venue| criteria.matches(venue)).collect()
}
