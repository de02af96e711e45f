use std::sync::Arc;

use axum::extract::{Extension, OriginalUri, Path, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::config::RootMode;
use crate::contract::AiData;
use crate::domain::service::InfoService;

use super::dto::{InfoDto, ListInfoQuery, SaveInfoRequest};
use super::error::domain_error_to_problem;
use super::problem::ApiResult;

pub async fn root(
    Extension(svc): Extension<Arc<InfoService>>,
    Extension(mode): Extension<RootMode>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Response> {
    match mode {
        RootMode::Greeting => {
            tracing::debug!(name = AiData::default().name(), "default ai data");
            Ok(svc.greeting().to_owned().into_response())
        }
        RootMode::Infos => list_all(&svc, uri.path())
            .await
            .map(IntoResponse::into_response),
        RootMode::Upstream => upstream_text(&svc, uri.path())
            .await
            .map(IntoResponse::into_response),
    }
}

pub async fn cached_upstream(
    Extension(svc): Extension<Arc<InfoService>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<String> {
    upstream_text(&svc, uri.path()).await
}

pub async fn list_infos(
    Extension(svc): Extension<Arc<InfoService>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ListInfoQuery>,
) -> ApiResult<Json<Vec<InfoDto>>> {
    match query.name {
        Some(name) => {
            let infos = svc
                .find_by_name(&name)
                .await
                .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
            Ok(Json(infos.into_iter().map(Into::into).collect()))
        }
        None => list_all(&svc, uri.path()).await,
    }
}

pub async fn get_info(
    Extension(svc): Extension<Arc<InfoService>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> ApiResult<Json<InfoDto>> {
    let info = svc
        .get_info(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(Json(info.into()))
}

pub async fn save_info(
    Extension(svc): Extension<Arc<InfoService>>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<SaveInfoRequest>,
) -> ApiResult<impl IntoResponse> {
    let info = svc
        .save_info(req.into())
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    let location = format!("/infos/{}", info.id);
    let dto: InfoDto = info.into();
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(dto)))
}

pub async fn delete_info(
    Extension(svc): Extension<Arc<InfoService>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    svc.delete_info(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> &'static str {
    "ok"
}

async fn list_all(svc: &InfoService, instance: &str) -> ApiResult<Json<Vec<InfoDto>>> {
    let infos = svc
        .get_all_info()
        .await
        .map_err(|e| domain_error_to_problem(&e, instance))?;
    Ok(Json(infos.into_iter().map(Into::into).collect()))
}

async fn upstream_text(svc: &InfoService, instance: &str) -> ApiResult<String> {
    svc.get_cached_upstream()
        .await
        .map_err(|e| domain_error_to_problem(&e, instance))
}
