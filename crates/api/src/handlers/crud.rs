//! Generic CRUD handlers.
//!
//! Each handler is instantiated per entity in [`crate::routes::catalog`], e.g.
//! `get(crud::list::<Product>)`. Extractor rejections are turned into
//! `400 BAD_REQUEST` so every error uses the same JSON envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use catalog_core::pagination::Page;
use catalog_core::types::DbId;
use catalog_db::record::{CatalogRecord, ChildRecord};

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::service::CatalogService;
use crate::state::AppState;

/// GET /api/v1/{resource}
pub async fn list<T: CatalogRecord>(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    filter: Result<Query<T::Filter>, QueryRejection>,
) -> AppResult<Json<Page<T>>> {
    let Query(page) = page.map_err(bad_query)?;
    let Query(filter) = filter.map_err(bad_query)?;

    let page = CatalogService::new(&state.store)
        .list::<T>(page.into_request()?, &filter)
        .await?;
    Ok(Json(page))
}

/// POST /api/v1/{resource}
pub async fn create<T: CatalogRecord>(
    State(state): State<AppState>,
    input: Result<Json<T::Create>, JsonRejection>,
) -> AppResult<(StatusCode, Json<T>)> {
    let Json(input) = input.map_err(bad_json)?;
    let created = CatalogService::new(&state.store).create::<T>(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/{resource}/{id}
pub async fn get_by_id<T: CatalogRecord>(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<T>> {
    let Path(id) = id.map_err(bad_path)?;
    let record = CatalogService::new(&state.store).get::<T>(id).await?;
    Ok(Json(record))
}

/// PUT /api/v1/{resource}/{id}
pub async fn update<T: CatalogRecord>(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    input: Result<Json<T::Update>, JsonRejection>,
) -> AppResult<Json<T>> {
    let Path(id) = id.map_err(bad_path)?;
    let Json(input) = input.map_err(bad_json)?;
    let updated = CatalogService::new(&state.store)
        .update::<T>(id, input)
        .await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/{resource}/{id}
pub async fn delete<T: CatalogRecord>(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id.map_err(bad_path)?;
    CatalogService::new(&state.store).delete::<T>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/{parent-resource}/{id}/{children}
pub async fn list_children<T: ChildRecord>(
    State(state): State<AppState>,
    parent_id: Result<Path<DbId>, PathRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
    filter: Result<Query<T::Filter>, QueryRejection>,
) -> AppResult<Json<Page<T>>> {
    let Path(parent_id) = parent_id.map_err(bad_path)?;
    let Query(page) = page.map_err(bad_query)?;
    let Query(filter) = filter.map_err(bad_query)?;

    let page = CatalogService::new(&state.store)
        .list_by_parent::<T>(parent_id, page.into_request()?, &filter)
        .await?;
    Ok(Json(page))
}

pub(crate) fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

pub(crate) fn bad_path(rejection: PathRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

fn bad_query(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
