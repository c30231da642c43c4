use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Static educational tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub preview: String,
    pub checklist: Vec<String>,
}

/// Completion flags keyed by tip id
pub type TipsProgress = BTreeMap<String, bool>;
