//! Management API 链接操作

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::{debug, info};

use crate::errors::ShortkeyError;
use crate::services::{KeyRange, LinkService};

use super::error::ApiError;
use super::helpers::{report_response, run_blocking};
use super::types::{AddLinkForm, ByHashQuery, RangeParams, RemoveHashForm};

/// `POST /link/add` → rows of `(url, key)`
pub async fn add_links(
    service: web::Data<Arc<LinkService>>,
    form: web::Form<AddLinkForm>,
) -> Result<HttpResponse, ApiError> {
    let service = service.get_ref().clone();
    let input = form.into_inner().link;

    let added = run_blocking(move || service.add_links(&input)).await?;
    debug!("add: {} rows", added.len());

    report_response(
        added
            .iter()
            .map(|link| [link.url.clone().into_bytes(), link.key.as_bytes().to_vec()]),
    )
}

/// `GET /link/byHash?hash=<key>` → raw URL body, or 404
pub async fn link_by_hash(
    service: web::Data<Arc<LinkService>>,
    query: web::Query<ByHashQuery>,
) -> Result<HttpResponse, ApiError> {
    let service = service.get_ref().clone();
    let key = query.into_inner().hash;

    let url = run_blocking(move || {
        service
            .lookup(key.as_bytes())?
            .ok_or_else(|| ShortkeyError::not_found(key))
    })
    .await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(url))
}

/// `GET /link/list?start=&end=` → rows of `(key, url)`
pub async fn list_links(
    service: web::Data<Arc<LinkService>>,
    query: web::Query<RangeParams>,
) -> Result<HttpResponse, ApiError> {
    let service = service.get_ref().clone();
    let params = query.into_inner();
    let range = KeyRange::new(params.start.as_deref(), params.end.as_deref());

    let rows = run_blocking(move || service.list(&range)).await?;
    report_response(rows.into_iter().map(|(key, url)| [key, url]))
}

/// `POST /hash/remove` → rows of `(key)`
pub async fn remove_hashes(
    service: web::Data<Arc<LinkService>>,
    form: web::Form<RemoveHashForm>,
) -> Result<HttpResponse, ApiError> {
    let service = service.get_ref().clone();
    let input = form.into_inner().hash;

    let keys = run_blocking(move || service.remove_keys(&input)).await?;
    report_response(keys.into_iter().map(|key| [key]))
}

/// `POST /hash/cleanup` → single row `("total", count)`
pub async fn cleanup_hashes(
    service: web::Data<Arc<LinkService>>,
    form: web::Form<RangeParams>,
) -> Result<HttpResponse, ApiError> {
    let service = service.get_ref().clone();
    let params = form.into_inner();
    let range = KeyRange::new(params.start.as_deref(), params.end.as_deref());

    let total = run_blocking(move || service.cleanup(&range)).await?;
    info!("cleanup: {} removed", total);

    report_response([["total".to_string(), total.to_string()]])
}
