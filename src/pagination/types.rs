//! Pagination types
//!
//! The shapes a fetch can produce and the parsed form of a `Link` header entry.

use crate::types::JsonValue;
use serde::Serialize;

/// Decoded page bodies in the order they were fetched
pub type PageCollection<T = JsonValue> = Vec<T>;

/// Outcome of a fetch.
///
/// The variant is fixed by the caller's pagination flag before the first
/// request goes out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchResult<T = JsonValue> {
    /// Pagination was not requested: the first satisfying response body
    Single(T),
    /// Pagination was requested: every page body, first page first
    Pages(PageCollection<T>),
}

impl<T> FetchResult<T> {
    /// Check if this is a single body
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Check if this is a page collection
    pub fn is_pages(&self) -> bool {
        matches!(self, Self::Pages(_))
    }

    /// Number of bodies held
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pages(pages) => pages.len(),
        }
    }

    /// True only for an empty page collection
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the single body, if this is one
    pub fn into_single(self) -> Option<T> {
        match self {
            Self::Single(body) => Some(body),
            Self::Pages(_) => None,
        }
    }

    /// Take every body as a list; a single body becomes a one-element list
    pub fn into_pages(self) -> PageCollection<T> {
        match self {
            Self::Single(body) => vec![body],
            Self::Pages(pages) => pages,
        }
    }
}

/// One `<uri>; rel="..."` entry of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRelation {
    /// Target URI exactly as written between the angle brackets
    pub uri: String,
    /// Relation types, e.g. `next`, `prev`, `last`
    pub rels: Vec<String>,
}

impl LinkRelation {
    /// Check whether this entry carries the given relation type
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}
