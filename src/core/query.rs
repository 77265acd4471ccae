//! Query-string parameters for the venue listing

use crate::core::filter::{
    CapacityBracket, Criterion, SERVICE_SEPARATOR, UnknownBracket, VenueCriteria,
};
use serde::{Deserialize, Serialize};

/// Listing filters as they arrive in a URL
///
/// Every parameter is optional; absent parameters and the `"All"` label leave
/// the corresponding criterion inactive.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_venues(Query(params): Query<VenueQuery>) -> ... {
///     let criteria = params.criteria()?;
/// }
///
/// // Usage:
/// GET /venues?city=Lahore&capacity=250-500
/// GET /venues?search=garden&max_price=50000&services=Catering,Parking
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Bracket label, e.g. `250-500` or `1000+`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_type: Option<String>,

    /// Comma separated service names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<String>,
}

impl VenueQuery {
    /// Build criteria, rejecting capacity labels outside the bracket table
    pub fn criteria(&self) -> Result<VenueCriteria, UnknownBracket> {
        let capacity = match self.capacity.as_deref() {
            Some(label) => CapacityBracket::criterion(label.trim())?,
            None => Criterion::Inactive,
        };

        let mut criteria = VenueCriteria {
            search: Criterion::from_search(self.search.as_deref().unwrap_or_default()),
            city: Criterion::from_label(self.city.as_deref().unwrap_or_default()),
            capacity,
            max_price: self
                .max_price
                .map_or(Criterion::Inactive, Criterion::from_max_price),
            venue_type: Criterion::from_label(self.venue_type.as_deref().unwrap_or_default()),
            ..Default::default()
        };

        if let Some(services) = &self.services {
            criteria = criteria.with_service(services);
        }

        Ok(criteria)
    }

    /// Inverse of [`VenueQuery::criteria`], used by the client
    pub fn from_criteria(criteria: &VenueCriteria) -> Self {
        let services = if criteria.services.is_empty() {
            None
        } else {
            Some(
                criteria
                    .services
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(SERVICE_SEPARATOR),
            )
        };

        Self {
            search: criteria.search.as_active().cloned(),
            city: criteria.city.as_active().cloned(),
            capacity: criteria.capacity.as_active().map(|b| b.label().to_string()),
            max_price: criteria.max_price.as_active().copied(),
            venue_type: criteria.venue_type.as_active().cloned(),
            services,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
