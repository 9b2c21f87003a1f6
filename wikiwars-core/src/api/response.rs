//! Response shapes of `action=query` (formatversion 2)
//!
//! Records are kept as raw JSON values here; turning them into
//! [`crate::types::RawRecord`] happens per record in the fetcher so that one
//! malformed entry is dropped instead of failing the page.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The API's `continue` object, echoed back verbatim on the next request.
pub type Continuation = BTreeMap<String, String>;

/// Top-level body of an `action=query` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Present while more results remain
    #[serde(rename = "continue", default)]
    pub continuation: Option<Continuation>,
    /// Result set; absent when the API reports an error
    #[serde(default)]
    pub query: Option<QueryBody>,
    /// Error object (the API answers these with HTTP 200)
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// The `query` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryBody {
    /// `prop=revisions` results, one entry per requested title
    #[serde(default)]
    pub pages: Vec<PageEntry>,
    /// `list=usercontribs` results
    #[serde(default)]
    pub usercontribs: Option<Vec<serde_json::Value>>,
}

/// One page in `query.pages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Title does not exist
    #[serde(default)]
    pub missing: bool,
    /// Title is not a valid page name
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub revisions: Vec<serde_json::Value>,
}

/// `error` object returned in place of `query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl ApiErrorBody {
    /// Error codes meaning "this user does not exist or cannot exist".
    pub fn is_bad_user(&self) -> bool {
        self.code.starts_with("baduser") || self.code == "nosuchuser"
    }
}
