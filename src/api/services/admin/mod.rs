//! Management API 服务模块
//!
//! 私有管理端点（仅部署在可信网络）：
//! - 链接批量添加、查询、列出
//! - 批量删除与区间清理
//! - 存储备份导出
//!
//! All responses are plain text; tabular ones are CSV.

mod backup;
pub mod error;
mod helpers;
mod link_crud;
pub mod routes;
mod types;

pub use types::*;

pub use error::ApiError;

pub use backup::{BACKUP_FILENAME, download_backup};
pub use link_crud::{add_links, cleanup_hashes, link_by_hash, list_links, remove_hashes};
pub use routes::management_routes;
