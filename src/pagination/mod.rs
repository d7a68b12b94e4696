//! Pagination module
//!
//! Follows `rel="next"` links from the `Link` response header, GitHub style.
//!
//! # Overview
//!
//! The fetcher asks this module two questions after every page: is there a
//! next link, and what absolute URI does it point at. The answers are pure
//! functions of the response headers and the current request URI.

mod link;
mod types;

pub use link::{
    find_link, next_link, next_link_from_headers, parse_link_header, resolve_link, NEXT_REL,
};
pub use types::{FetchResult, LinkRelation, PageCollection};

#[cfg(test)]
mod tests;
