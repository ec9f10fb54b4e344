//! This module defines and re-exports the interfaces for the repositories.
//! It serves as a central point for accessing traits related to data interaction.
mod indicators;
mod reserve;
mod users;

pub use indicators::{DetailQuery, IndicatorQuery, IndicatorRepository};
pub use reserve::ReserveRepository;
pub use users::UserRepository;
