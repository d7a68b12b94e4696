//! Tests for pagination module

use super::*;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Link Header Parsing Tests
// ============================================================================

#[test]
fn test_next_link_before_prev() {
    let header = r#"<https://api.example/items?page=2>; rel="next", <https://api.example/items?page=1>; rel="prev""#;
    assert_eq!(
        next_link(header),
        Some("https://api.example/items?page=2".to_string())
    );
}

#[test]
fn test_next_link_after_prev() {
    let header = r#"<https://api.example/items?page=1>; rel="prev", <https://api.example/items?page=3>; rel="next""#;
    assert_eq!(
        next_link(header),
        Some("https://api.example/items?page=3".to_string())
    );
}

#[test]
fn test_next_link_github_full_header() {
    let header = concat!(
        r#"<https://api.github.com/repositories/1300192/issues?page=2>; rel="prev", "#,
        r#"<https://api.github.com/repositories/1300192/issues?page=4>; rel="next", "#,
        r#"<https://api.github.com/repositories/1300192/issues?page=515>; rel="last", "#,
        r#"<https://api.github.com/repositories/1300192/issues?page=1>; rel="first""#
    );
    assert_eq!(
        next_link(header),
        Some("https://api.github.com/repositories/1300192/issues?page=4".to_string())
    );
    assert_eq!(
        find_link(header, "last"),
        Some("https://api.github.com/repositories/1300192/issues?page=515".to_string())
    );
}

#[test_case(r#"<https://api.example/items?page=1>; rel="prev""# ; "prev only")]
#[test_case(r#"<https://api.example/items?page=9>; rel="last", <https://api.example/items?page=1>; rel="first""# ; "last and first")]
#[test_case("" ; "empty header")]
#[test_case("not a link header" ; "garbage")]
#[test_case(r#"<https://api.example/items?page=2>; title="next""# ; "next only in another param")]
fn test_no_next_link(header: &str) {
    assert_eq!(next_link(header), None);
}

#[test_case(r#"<https://a.example/2>; rel=next"# ; "unquoted rel")]
#[test_case(r#"<https://a.example/2>;rel="next""# ; "no space")]
#[test_case(r#"<https://a.example/2>; REL="NEXT""# ; "uppercase")]
#[test_case(r#"<https://a.example/2>; rel="next last""# ; "multiple rels")]
#[test_case(r#"<https://a.example/2>; type="text/html"; rel="next""# ; "rel after other param")]
fn test_next_link_variants(header: &str) {
    assert_eq!(next_link(header), Some("https://a.example/2".to_string()));
}

#[test]
fn test_link_with_comma_in_uri() {
    let header = r#"<https://a.example/search?q=a,b&page=2>; rel="next""#;
    assert_eq!(
        next_link(header),
        Some("https://a.example/search?q=a,b&page=2".to_string())
    );
}

#[test]
fn test_parse_link_header_entries() {
    let links = parse_link_header(r#"<https://a.example/2>; rel="next last", <https://a.example/1>; rel="prev""#);

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].uri, "https://a.example/2");
    assert_eq!(links[0].rels, vec!["next".to_string(), "last".to_string()]);
    assert!(links[0].has_rel("last"));
    assert!(links[1].has_rel("prev"));
    assert!(!links[1].has_rel("next"));
}

#[test]
fn test_parse_link_header_skips_entries_without_rel() {
    let links = parse_link_header(r#"<https://a.example/1>, <https://a.example/2>; rel="next""#);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].uri, "https://a.example/2");
}

// ============================================================================
// Header Map Tests
// ============================================================================

#[test]
fn test_next_link_from_headers() {
    let mut headers = HeaderMap::new();
    assert_eq!(next_link_from_headers(&headers), None);

    headers.insert(
        "Link",
        HeaderValue::from_static(r#"<https://a.example/2>; rel="next""#),
    );
    assert_eq!(
        next_link_from_headers(&headers),
        Some("https://a.example/2".to_string())
    );
}

#[test]
fn test_next_link_from_split_headers() {
    let mut headers = HeaderMap::new();
    headers.append(LINK, HeaderValue::from_static(r#"<https://a.example/1>; rel="prev""#));
    headers.append(LINK, HeaderValue::from_static(r#"<https://a.example/3>; rel="next""#));

    assert_eq!(
        next_link_from_headers(&headers),
        Some("https://a.example/3".to_string())
    );
}

// ============================================================================
// Link Resolution Tests
// ============================================================================

#[test_case("https://a.example/items?page=1", "https://b.example/items?page=2", "https://b.example/items?page=2" ; "absolute")]
#[test_case("https://a.example/items", "https://API.example/items?q=a%2cb&page=2", "https://API.example/items?q=a%2cb&page=2" ; "absolute kept verbatim")]
#[test_case("https://a.example/items", "https://b.example", "https://b.example" ; "absolute without path")]
#[test_case("not a url", "https://b.example/items?page=2", "https://b.example/items?page=2" ; "absolute with bad base")]
#[test_case("https://a.example/items?page=1", "/items?page=2", "https://a.example/items?page=2" ; "root relative")]
#[test_case("https://a.example/v1/items?page=1", "items?page=2", "https://a.example/v1/items?page=2" ; "path relative")]
fn test_resolve_link(current: &str, link: &str, expected: &str) {
    assert_eq!(resolve_link(current, link).unwrap(), expected);
}

#[test]
fn test_resolve_link_bad_base() {
    assert!(matches!(
        resolve_link("not a url", "/items?page=2"),
        Err(crate::error::Error::InvalidUrl(_))
    ));
}

// ============================================================================
// FetchResult Tests
// ============================================================================

#[test]
fn test_fetch_result_single() {
    let result = FetchResult::Single(json!({"id": 1}));
    assert!(result.is_single());
    assert!(!result.is_pages());
    assert_eq!(result.len(), 1);
    assert!(!result.is_empty());
    assert_eq!(result.clone().into_pages(), vec![json!({"id": 1})]);
    assert_eq!(result.into_single(), Some(json!({"id": 1})));
}

#[test]
fn test_fetch_result_pages() {
    let result = FetchResult::Pages(vec![json!([1, 2]), json!([3])]);
    assert!(result.is_pages());
    assert_eq!(result.len(), 2);
    assert_eq!(result.clone().into_single(), None);
    assert_eq!(result.into_pages(), vec![json!([1, 2]), json!([3])]);

    let empty: FetchResult = FetchResult::Pages(Vec::new());
    assert!(empty.is_empty());
}

#[test]
fn test_fetch_result_serializes_untagged() {
    let single = FetchResult::Single(json!({"id": 1}));
    assert_eq!(serde_json::to_value(&single).unwrap(), json!({"id": 1}));

    let pages = FetchResult::Pages(vec![json!([1]), json!([2])]);
    assert_eq!(serde_json::to_value(&pages).unwrap(), json!([[1], [2]]));
}
