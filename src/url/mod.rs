//! URL handling module for Sitecorpus
//!
//! This module provides href normalization against a crawl context, seed URL
//! parsing, same-domain scope checks and filtering of non-navigable links.

mod domain;
mod normalize;

pub use domain::{extract_domain, hosts_in_scope, is_in_scope, is_navigable_href};
pub use normalize::{normalize_href, parse_seed_url, CrawlContext};
