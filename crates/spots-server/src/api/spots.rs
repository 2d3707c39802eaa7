use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use spots_core::ordering::{self, DistancedSpot};
use spots_core::{QueryMode, Spot};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

/// Raw query parameters, kept as strings so validation owns the parsing.
#[derive(Debug, Deserialize)]
pub(super) struct SpotsQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
    #[serde(rename = "type")]
    pub mode: Option<String>,
}

/// Validated search parameters.
#[derive(Debug, Clone, Copy)]
struct SearchParams {
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
    mode: QueryMode,
}

/// Names the parameter that failed validation.
#[derive(Debug, PartialEq, Eq)]
struct InvalidParam {
    field: &'static str,
}

fn parse_finite(field: &'static str, value: Option<&str>) -> Result<f64, InvalidParam> {
    value
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .ok_or(InvalidParam { field })
}

/// Parse the four raw parameters. Latitude, longitude and radius must be
/// finite floats; `type` must be a known mode literal. No range checks
/// beyond that: out-of-range geographic values go to the store as-is.
fn validate(query: &SpotsQuery) -> Result<SearchParams, InvalidParam> {
    let latitude = parse_finite("latitude", query.latitude.as_deref())?;
    let longitude = parse_finite("longitude", query.longitude.as_deref())?;
    let radius_meters = parse_finite("radius", query.radius.as_deref())?;
    let mode = query
        .mode
        .as_deref()
        .and_then(|raw| QueryMode::from_str(raw).ok())
        .ok_or(InvalidParam { field: "type" })?;

    Ok(SearchParams {
        latitude,
        longitude,
        radius_meters,
        mode,
    })
}

pub(super) async fn get_spots(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SpotsQuery>,
) -> Result<Json<Vec<Spot>>, ApiError> {
    let params = validate(&query).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "invalid_parameter",
            format!("invalid {}", e.field),
        )
    })?;

    let rows = spots_db::search_spots(
        &state.pool,
        params.mode,
        params.longitude,
        params.latitude,
        params.radius_meters,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut ranked: Vec<DistancedSpot> = rows
        .into_iter()
        .map(|row| DistancedSpot {
            distance_meters: row.distance_meters,
            spot: Spot {
                id: row.id,
                name: row.name,
                website: row.website,
                coordinates: row.coordinates,
                description: row.description,
                rating: row.rating,
            },
        })
        .collect();

    ordering::sort_by_proximity(&mut ranked);

    tracing::debug!(mode = %params.mode, count = ranked.len(), "spot search served");

    Ok(Json(ranked.into_iter().map(|d| d.spot).collect()))
}
