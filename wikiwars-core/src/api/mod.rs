//! MediaWiki API access
//!
//! Revision and contribution histories come from the `action=query` API:
//!
//! | Subject | Query | Continuation key |
//! |---------|-------|------------------|
//! | Article | `prop=revisions&titles=..&rvprop=timestamp\|user\|ids&rvlimit=max` | `rvcontinue` |
//! | Contributor | `list=usercontribs&ucuser=..&ucprop=title\|timestamp\|ids&uclimit=max` | `uccontinue` |
//!
//! Responses are requested with `formatversion=2`, so `pages` is an array and
//! flags like `missing` are booleans. The whole `continue` object of a
//! response is echoed back on the next request.
//!
//! [`PageSource`] is the seam between the pagination logic in
//! [`crate::fetch`] and the network; [`WikiClient`] is the reqwest-backed
//! implementation.

mod client;
mod response;

use std::future::Future;

pub use client::WikiClient;
pub use response::{ApiErrorBody, Continuation, PageEntry, QueryBody, QueryResponse};

use crate::error::FetchError;
use crate::types::Subject;

/// Query-string parameters for one API request, in order.
pub type QueryParams = Vec<(String, String)>;

/// Something that can answer one page of an `action=query` request.
pub trait PageSource {
    /// Issue a single request. Implementations must not retry.
    fn fetch_page(
        &self,
        params: &[(String, String)],
    ) -> impl Future<Output = std::result::Result<QueryResponse, FetchError>> + Send;
}

/// Parameters for the first page of a subject's history.
pub fn base_params(subject: &Subject) -> QueryParams {
    let mut params = vec![
        ("action", "query"),
        ("format", "json"),
        ("formatversion", "2"),
    ];

    match subject {
        Subject::Article(title) => {
            params.extend([
                ("prop", "revisions"),
                ("titles", title.as_str()),
                ("rvprop", "timestamp|user|ids"),
                ("rvlimit", "max"),
            ]);
        }
        Subject::Contributor(username) => {
            params.extend([
                ("list", "usercontribs"),
                ("ucuser", username.as_str()),
                ("ucprop", "title|timestamp|ids"),
                ("uclimit", "max"),
            ]);
        }
    }

    params
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parameters for a follow-up page: the base query plus the continuation.
pub fn continued_params(subject: &Subject, continuation: &Continuation) -> QueryParams {
    let mut params = base_params(subject);
    params.extend(continuation.iter().map(|(k, v)| (k.clone(), v.clone())));
    params
}
