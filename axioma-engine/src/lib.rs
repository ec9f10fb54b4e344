//! # AXIOMA Engine
//!
//! The query and aggregation logic of the reporting API. Each engine is a stateless
//! service over one or more repository traits from `axioma-repository`:
//!
//! - [`ReserveReportEngine`]: groups the most recent legal reserve records by
//!   cut-off date, category and subcategory, with running totals.
//! - [`IndicatorSearchEngine`]: full-text or top-N indicator search with the
//!   related entities of every match.
//! - [`IndicatorDetailEngine`]: per-entity time series of an indicator.
//! - [`UserDirectory`]: synchronizes verified identities into local users and
//!   maintains their favorite indicators.
//!
//! [`Engines`] bundles all four for injection into the HTTP layer.

pub mod config;
pub mod context;
pub mod errors;
pub mod indicator_detail;
pub mod indicator_search;
pub mod reserve_report;
pub mod user_directory;

#[cfg(test)]
mod mocks;

pub use config::{DetailConfig, EngineConfig, ReportConfig, SearchConfig, UserDirectoryConfig};
pub use context::{Engines, Repositories};
pub use errors::EngineError;
pub use indicator_detail::IndicatorDetailEngine;
pub use indicator_search::{IndicatorSearchEngine, SearchRequest};
pub use reserve_report::{ReserveReportEngine, REPORT_NAME, UNKNOWN_SOURCE};
pub use user_directory::UserDirectory;
