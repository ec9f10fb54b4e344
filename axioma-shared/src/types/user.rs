//! Users synchronized from the identity provider.

use serde::{Deserialize, Serialize};

/// Claims extracted from a verified identity token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub phone: Option<String>,
    pub country_code: Option<String>,
}

/// A persisted user row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
    pub country_code: Option<String>,
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
    pub country_code: Option<String>,
}
