use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderValue, LOCATION};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, error, trace};

use crate::services::{RedirectResolver, key_window};

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        resolver: web::Data<Arc<RedirectResolver>>,
    ) -> HttpResponse {
        // 路径不足一个 key 宽度，直接 404，不查存储
        let Some(key) = key_window(req.path()) else {
            trace!("Path shorter than a key rejected: {}", req.path());
            return Self::not_found_response();
        };

        let key = key.to_vec();
        let resolver = resolver.get_ref().clone();
        match web::block(move || resolver.resolve(&key)).await {
            Ok(Ok(Some(url))) => Self::finish_redirect(url),
            Ok(Ok(None)) => {
                debug!("Redirect key not found: {}", req.path());
                Self::not_found_response()
            }
            Ok(Err(e)) => {
                error!("Store error during redirect lookup: {}", e);
                Self::error_response()
            }
            Err(e) => {
                error!("Redirect lookup task failed: {}", e);
                Self::error_response()
            }
        }
    }

    /// Anything other than `GET` is a plain 404.
    pub async fn reject() -> HttpResponse {
        Self::not_found_response()
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND).finish()
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal Server Error")
    }

    fn finish_redirect(url: Vec<u8>) -> HttpResponse {
        match HeaderValue::from_bytes(&url) {
            Ok(location) => HttpResponse::build(StatusCode::FOUND)
                .insert_header((LOCATION, location))
                .finish(),
            Err(e) => {
                // 存入的 URL 不做校验，含控制字符时无法作为 Location
                error!(
                    "Stored URL is not a valid Location header ({}): {:?}",
                    e,
                    String::from_utf8_lossy(&url)
                );
                Self::error_response()
            }
        }
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{tail:.*}")
        .route(web::get().to(RedirectService::handle_redirect))
        .default_service(web::to(RedirectService::reject))
}
