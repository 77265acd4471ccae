//! Public venue listing

use crate::core::api::Catalog;
use crate::core::error::{MarketplaceError, MarketplaceResult, ValidationError, VenueError};
use crate::core::filter::filter_venues;
use crate::core::query::VenueQuery;
use crate::core::venue::Venue;
use crate::server::host::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/{id}", get(get_venue))
        .route("/catalog", get(catalog))
}

/// Active venues in insertion order, optionally filtered
async fn list_venues(
    State(host): State<AppState>,
    query: Result<Query<VenueQuery>, QueryRejection>,
) -> MarketplaceResult<Json<Vec<Venue>>> {
    let Query(query) = query.map_err(|e| {
        MarketplaceError::Validation(ValidationError::InvalidQuery {
            message: e.body_text(),
        })
    })?;
    let criteria = query.criteria()?;

    let active: Vec<Venue> = host
        .store
        .list_venues()
        .await?
        .into_iter()
        .filter(|venue| venue.is_active)
        .collect();

    if criteria.is_unconstrained() {
        return Ok(Json(active));
    }
    Ok(Json(filter_venues(&active, &criteria)))
}

async fn get_venue(
    State(host): State<AppState>,
    Path(id): Path<i64>,
) -> MarketplaceResult<Json<Venue>> {
    host.store
        .venue(id)
        .await?
        .filter(|venue| venue.is_active)
        .map(Json)
        .ok_or_else(|| VenueError::NotFound { id }.into())
}

async fn catalog(State(host): State<AppState>) -> Json<Catalog> {
    Json(Catalog::new(
        host.config.catalog.venue_types.clone(),
        host.config.catalog.cities.clone(),
    ))
}
