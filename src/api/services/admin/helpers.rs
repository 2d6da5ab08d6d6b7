//! Management API 帮助函数

use actix_web::{HttpResponse, web};

use crate::errors::Result;
use crate::utils::render_report;

use super::error::ApiError;

/// Run a blocking store operation on the blocking thread pool.
pub async fn run_blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::from)
}

/// 构建 CSV 表格响应
pub fn report_response<I, R, F>(rows: I) -> std::result::Result<HttpResponse, ApiError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let body = render_report(rows)?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body))
}
