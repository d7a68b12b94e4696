//! Link header pagination (RFC 8288)
//!
//! Format: `Link: <https://api.github.com/...?page=2>; rel="next", <...>; rel="last"`

use super::types::LinkRelation;
use crate::error::Result;
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::sync::LazyLock;
use url::Url;

/// Relation type that marks the following page
pub const NEXT_REL: &str = "next";

// One entry: the bracketed URI, then its parameters up to the next '<'
static LINK_ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]*)>([^<]*)").unwrap());

/// Parse every entry of a `Link` header value
pub fn parse_link_header(header: &str) -> Vec<LinkRelation> {
    LINK_ENTRY
        .captures_iter(header)
        .filter_map(|caps| {
            let uri = caps.get(1)?.as_str().trim();
            let params = caps.get(2).map_or("", |m| m.as_str());

            let rels = params
                .split(';')
                .filter_map(|param| {
                    let (key, value) = param.trim().trim_end_matches(',').split_once('=')?;
                    key.trim()
                        .eq_ignore_ascii_case("rel")
                        .then(|| value.trim().trim_matches('"').trim_matches('\''))
                })
                .flat_map(str::split_whitespace)
                .map(str::to_string)
                .collect::<Vec<_>>();

            (!rels.is_empty()).then(|| LinkRelation {
                uri: uri.to_string(),
                rels,
            })
        })
        .collect()
}

/// Find the URI tagged with `rel` in a `Link` header value
pub fn find_link(header: &str, rel: &str) -> Option<String> {
    parse_link_header(header)
        .into_iter()
        .find(|link| link.has_rel(rel))
        .map(|link| link.uri)
}

/// Extract the `rel="next"` URI from a `Link` header value
pub fn next_link(header: &str) -> Option<String> {
    find_link(header, NEXT_REL)
}

/// Extract the `rel="next"` URI from response headers.
///
/// Servers may split links across several `Link` headers; all are searched.
pub fn next_link_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(next_link)
}

/// Resolve a link target against the URI of the response that carried it.
///
/// Absolute links are returned exactly as the server sent them.
pub fn resolve_link(current: &str, link: &str) -> Result<String> {
    if Url::parse(link).is_ok() {
        return Ok(link.to_string());
    }
    let base = Url::parse(current)?;
    Ok(base.join(link)?.to_string())
}
