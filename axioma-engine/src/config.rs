//! Configuration types for the engines.
//!
//! The engines never read the environment; the binary builds an [`EngineConfig`]
//! from its settings and hands it over at construction.

/// Number of distinct cut-off dates included in the reserve report by default.
pub const DEFAULT_REPORT_DATE_WINDOW: i64 = 3;

/// Largest search limit accepted by default.
pub const DEFAULT_SEARCH_MAX_LIMIT: usize = 100;

/// Configuration for all engines.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub report: ReportConfig,
    pub search: SearchConfig,
    pub detail: DetailConfig,
    pub users: UserDirectoryConfig,
}

/// Configuration for the reserve report.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Number of most recent distinct cut-off dates to report.
    pub date_window: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            date_window: DEFAULT_REPORT_DATE_WINDOW,
        }
    }
}

/// Configuration for the indicator search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results a single search may request.
    ///
    /// Set to `None` to disable the limit. Defaults to 100.
    pub max_limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_limit: Some(DEFAULT_SEARCH_MAX_LIMIT),
        }
    }
}

impl SearchConfig {
    /// Create a config with no upper bound on the search limit.
    pub fn unlimited() -> Self {
        Self { max_limit: None }
    }
}

/// Configuration for the indicator detail lookups.
#[derive(Debug, Clone, Default)]
pub struct DetailConfig {
    /// When set, only entities whose type is in this list are reported.
    pub entity_types: Option<Vec<String>>,
}

/// Configuration for user synchronization.
#[derive(Debug, Clone)]
pub struct UserDirectoryConfig {
    /// Store newly created users as verified regardless of the identity claim.
    pub force_email_verified_on_create: bool,
}

impl Default for UserDirectoryConfig {
    fn default() -> Self {
        Self {
            force_email_verified_on_create: true,
        }
    }
}
