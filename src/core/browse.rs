//! Listing state for the venue browsing page
//!
//! [`VenueBrowser`] owns a read-only snapshot of the venues fetched for the page
//! plus the current [`VenueCriteria`], and keeps the visible list in sync:
//! every setter recomputes it synchronously.

use crate::core::filter::{
    ALL, CapacityBracket, Criterion, VenueCriteria, filter_venues, split_services,
};
use crate::core::venue::Venue;
use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct VenueBrowser {
    venues: Vec<Venue>,
    criteria: VenueCriteria,
    visible: Vec<Venue>,
}

impl VenueBrowser {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self::with_criteria(venues, VenueCriteria::default())
    }

    pub fn with_criteria(venues: Vec<Venue>, criteria: VenueCriteria) -> Self {
        let mut browser = Self {
            venues,
            criteria,
            visible: Vec::new(),
        };
        browser.recompute();
        browser
    }

    /// Venues passing every active criterion, in snapshot order
    pub fn visible(&self) -> &[Venue] {
        &self.visible
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn criteria(&self) -> &VenueCriteria {
        &self.criteria
    }

    /// Replace the snapshot (a fresh fetch)
    pub fn set_venues(&mut self, venues: Vec<Venue>) {
        self.venues = venues;
        self.recompute();
    }

    pub fn set_criteria(&mut self, criteria: VenueCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn set_search(&mut self, term: &str) {
        self.criteria.search = Criterion::from_search(term);
        self.recompute();
    }

    /// `"All"` clears the constraint
    pub fn set_city(&mut self, city: &str) {
        self.criteria.city = Criterion::from_label(city);
        self.recompute();
    }

    pub fn set_capacity(&mut self, capacity: Criterion<CapacityBracket>) {
        self.criteria.capacity = capacity;
        self.recompute();
    }

    pub fn set_max_price(&mut self, max: u64) {
        self.criteria.max_price = Criterion::from_max_price(max);
        self.recompute();
    }

    pub fn set_venue_type(&mut self, venue_type: &str) {
        self.criteria.venue_type = Criterion::from_label(venue_type);
        self.recompute();
    }

    /// Flip a required service on or off
    pub fn toggle_service(&mut self, service: &str) {
        for name in split_services(service) {
            if !self.criteria.services.shift_remove(name) {
                self.criteria.services.insert(name.to_string());
            }
        }
        self.recompute();
    }

    /// Back to the unconstrained listing
    pub fn reset(&mut self) {
        self.criteria = VenueCriteria::default();
        self.recompute();
    }

    /// City choices: `"All"` then every city in first-seen order
    pub fn city_options(&self) -> Vec<String> {
        let cities: IndexSet<&str> = self.venues.iter().map(|v| v.city.as_str()).collect();
        std::iter::once(ALL)
            .chain(cities)
            .map(String::from)
            .collect()
    }

    /// Capacity choices: `"All"` then the fixed bracket labels
    pub fn capacity_options() -> Vec<&'static str> {
        std::iter::once(ALL)
            .chain(CapacityBracket::ALL.iter().map(CapacityBracket::label))
            .collect()
    }

    fn recompute(&mut self) {
        self.visible = filter_venues(&self.venues, &self.criteria);
    }
}
