//! Section endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{NewSection, Section},
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson, ValidatedPath};

/// List all sections
#[utoipa::path(
    get,
    path = "/sections/sections",
    tag = "sections",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Section list", body = Vec<Section>)
    )
)]
pub async fn list_sections(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Section>>> {
    claims.require_catalog_read()?;
    let sections = state.services.sections.list().await?;
    Ok(Json(sections))
}

/// Get section by ID
#[utoipa::path(
    get,
    path = "/sections/section/{sectionid}",
    tag = "sections",
    security(("bearer_auth" = [])),
    params(("sectionid" = i64, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section details", body = Section),
        (status = 404, description = "Section not found")
    )
)]
pub async fn get_section(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(sectionid): ValidatedPath<i64>,
) -> AppResult<Json<Section>> {
    claims.require_catalog_read()?;
    let section = state.services.sections.get_by_id(sectionid).await?;
    Ok(Json(section))
}

/// Create section
#[utoipa::path(
    post,
    path = "/sections/section",
    tag = "sections",
    security(("bearer_auth" = [])),
    request_body = NewSection,
    responses(
        (status = 201, description = "Section created", body = Section)
    )
)]
pub async fn create_section(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<NewSection>,
) -> AppResult<(StatusCode, Json<Section>)> {
    claims.require_admin()?;
    let section = state.services.sections.create(&data).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// Delete section
#[utoipa::path(
    delete,
    path = "/sections/section/{sectionid}",
    tag = "sections",
    security(("bearer_auth" = [])),
    params(("sectionid" = i64, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section deleted"),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Section still holds books")
    )
)]
pub async fn delete_section(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(sectionid): ValidatedPath<i64>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.sections.delete(sectionid).await?;
    Ok(StatusCode::OK)
}
