//! Construction of all engines from a shared set of repositories.
use std::sync::Arc;

use axioma_repository::{IndicatorRepository, ReserveRepository, UserRepository};

use crate::config::EngineConfig;
use crate::indicator_detail::IndicatorDetailEngine;
use crate::indicator_search::IndicatorSearchEngine;
use crate::reserve_report::ReserveReportEngine;
use crate::user_directory::UserDirectory;

/// The repositories the engines read from and write to.
#[derive(Clone)]
pub struct Repositories {
    pub reserve: Arc<dyn ReserveRepository>,
    pub indicators: Arc<dyn IndicatorRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// All engines, built once at start-up and shared by every request.
#[derive(Clone)]
pub struct Engines {
    pub reserve: Arc<ReserveReportEngine>,
    pub search: Arc<IndicatorSearchEngine>,
    pub detail: Arc<IndicatorDetailEngine>,
    pub users: Arc<UserDirectory>,
}

impl Engines {
    pub fn new(repositories: Repositories, config: EngineConfig) -> Self {
        Self {
            reserve: Arc::new(ReserveReportEngine::new(
                repositories.reserve,
                config.report,
            )),
            search: Arc::new(IndicatorSearchEngine::new(
                repositories.indicators.clone(),
                config.search,
            )),
            detail: Arc::new(IndicatorDetailEngine::new(
                repositories.indicators,
                config.detail,
            )),
            users: Arc::new(UserDirectory::new(repositories.users, config.users)),
        }
    }
}
