use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::user::Currency;

/// Local login state, created at sign-in/sign-up and removed at sign-out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub email: String,
    pub remember: bool,
    /// Unix timestamp (seconds)
    pub authenticated_at: i64,
}

/// Identity reported by the external identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Profile fields collected by the sign-up form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSeed {
    pub name: String,
    pub budget: f64,
    pub currency: Currency,
}
