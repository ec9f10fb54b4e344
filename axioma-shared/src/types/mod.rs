//! This module defines the core data structures used across the reporting API.

pub mod decimal;
pub mod indicator;
pub mod language;
pub mod ordered;
pub mod reserve;
pub mod user;
