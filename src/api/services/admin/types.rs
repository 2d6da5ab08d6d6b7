//! Management API 请求类型

use serde::Deserialize;

/// `POST /link/add`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddLinkForm {
    /// Newline-separated URLs.
    #[serde(default)]
    pub link: String,
}

/// `GET /link/byHash`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ByHashQuery {
    #[serde(default)]
    pub hash: String,
}

/// `GET /link/list` and `POST /hash/cleanup`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// `POST /hash/remove`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveHashForm {
    /// Newline-separated keys.
    #[serde(default)]
    pub hash: String,
}
