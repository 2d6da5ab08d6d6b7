//! Management API 路由配置

use actix_web::web;

use super::backup::download_backup;
use super::link_crud::{add_links, cleanup_hashes, link_by_hash, list_links, remove_hashes};

/// 链接路由 `/link`
///
/// 包含：
/// - POST /link/add - 批量添加
/// - GET /link/byHash - 按 key 查询
/// - GET /link/list - 按 key 区间列出
pub fn link_routes() -> actix_web::Scope {
    web::scope("/link")
        .route("/add", web::post().to(add_links))
        .route("/byHash", web::get().to(link_by_hash))
        .route("/list", web::get().to(list_links))
}

/// Key 路由 `/hash`
///
/// 包含：
/// - POST /hash/remove - 批量删除
/// - POST /hash/cleanup - 区间清理
pub fn hash_routes() -> actix_web::Scope {
    web::scope("/hash")
        .route("/remove", web::post().to(remove_hashes))
        .route("/cleanup", web::post().to(cleanup_hashes))
}

/// Management API 路由
///
/// 组合所有子模块路由
pub fn management_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(link_routes())
        .service(hash_routes())
        .route("/backup", web::get().to(download_backup));
}
