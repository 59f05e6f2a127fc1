use crate::{
    dtos::catalog::{
        IntakeResponse, OfferingListItem, OfferingQueryParams, OfferingResponse, UnitQueryParams,
        UnitResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::catalog::{CatalogService, OfferingFilter};
use uuid::Uuid;

/// List units in the catalog
#[utoipa::path(
    get,
    path = "/units",
    params(UnitQueryParams),
    responses(
        (status = 200, description = "Units ordered by code", body = Vec<UnitResponse>),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Catalog"
)]
pub async fn list_units(
    State(state): State<AppState>,
    Query(params): Query<UnitQueryParams>,
) -> Result<Json<Vec<UnitResponse>>, ApiError> {
    let units = CatalogService::list_units(&state.db, params.active_only).await?;
    Ok(Json(units.into_iter().map(UnitResponse::from).collect()))
}

/// List semester offerings
#[utoipa::path(
    get,
    path = "/offerings",
    params(OfferingQueryParams),
    responses(
        (status = 200, description = "Offerings ordered by unit code, newest first", body = Vec<OfferingListItem>),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Catalog"
)]
pub async fn list_offerings(
    State(state): State<AppState>,
    Query(params): Query<OfferingQueryParams>,
) -> Result<Json<Vec<OfferingListItem>>, ApiError> {
    let filter = OfferingFilter {
        unit_id: params.unit_id,
        intake_id: params.intake_id,
        active_only: params.active_only,
    };
    let offerings = CatalogService::list_offerings(&state.db, filter).await?;

    Ok(Json(offerings.into_iter().map(Into::into).collect()))
}

/// List intakes
#[utoipa::path(
    get,
    path = "/intakes",
    responses(
        (status = 200, description = "Intakes, newest year first", body = Vec<IntakeResponse>),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Catalog"
)]
pub async fn list_intakes(
    State(state): State<AppState>,
) -> Result<Json<Vec<IntakeResponse>>, ApiError> {
    let intakes = CatalogService::list_intakes(&state.db).await?;
    Ok(Json(intakes.into_iter().map(Into::into).collect()))
}

/// Get an offering with its unit and requisites
#[utoipa::path(
    get,
    path = "/offerings/{id}",
    params(
        ("id" = Uuid, Path, description = "Offering ID")
    ),
    responses(
        (status = 200, description = "Offering found", body = OfferingResponse),
        (status = 404, description = "Offering not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Catalog"
)]
pub async fn get_offering(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferingResponse>, ApiError> {
    let (offering, unit) = CatalogService::offering_with_unit(&state.db, id).await?;
    let prerequisites = CatalogService::prerequisites_of(&state.db, unit.id).await?;
    let anti_requisites = CatalogService::anti_requisites_of(&state.db, unit.id).await?;

    Ok(Json(OfferingResponse::new(
        offering,
        unit,
        prerequisites,
        anti_requisites,
    )))
}
