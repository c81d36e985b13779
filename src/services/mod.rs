//! Service layer for the asset hunter.
//!
//! This module contains the building blocks of the query-and-triage pipeline:
//! - Query construction and encoding (`QueryExpression`, `EncodedQuery`)
//! - Rate-limited remote search (`HunterClient`)
//! - Company name normalization (`format_company_name`)
//! - Keyword grouping for the secondary pass (`chunk_keywords`)
//! - Title filtering (`ContentFilter`) and deduplication (`dedup_assets`)

mod client;
mod dedup;
mod filter;
mod keywords;
mod names;
mod query;

pub use client::{HunterClient, QueryOutcome, SUCCESS_CODE, Throttle};
pub use dedup::dedup_assets;
pub use filter::{ContentFilter, Pass, Verdict};
pub use keywords::chunk_keywords;
pub use names::format_company_name;
pub use query::{EncodedQuery, PERMISSION_PROBE, Predicate, QueryExpression};
