//! # AXIOMA Shared
//!
//! This crate defines the data structures shared across the AXIOMA reporting API:
//! legal reserve reports, indicator search and detail payloads, users and favorites.
//! It contains no I/O; the repository and engine crates build on these types.

pub mod types;

pub use types::decimal;
pub use types::indicator::{
    DetailRow, EntityLink, EntityRef, EntitySeries, FavoriteIndicator, IndicatorDetails,
    IndicatorEntitiesDetails, IndicatorMatch, IndicatorSummary, SeriesPoint,
};
pub use types::language::{Language, ParseLanguageError};
pub use types::ordered::DateMap;
pub use types::reserve::{
    CategoryGroup, CategoryTotal, ReserveEntry, ReserveReport, SubcategoryTotal,
    SubcategoryValues,
};
pub use types::user::{IdentityClaims, NewUser, User};
