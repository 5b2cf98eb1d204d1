use serde::{Deserialize, Serialize};

/// A submission draft carried by the caller.
///
/// The UI shell accumulates these across its own dialog steps and hands the
/// finished value to the engine in one call; the engine keeps no per-actor
/// conversation state. Serializable so shells can park an in-flight draft
/// wherever they keep session data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftRequest {
    pub division: Option<String>,
    pub direction: Option<String>,
    pub checkpoint: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub car_brand: Option<String>,
    pub people_count: Option<u32>,
    pub leader_name: Option<String>,
    pub cargo: Option<String>,
    pub purpose: String,
}

impl DraftRequest {
    /// A draft carrying only free text.
    #[must_use]
    pub fn free_form(purpose: impl Into<String>) -> Self {
        Self {
            purpose: purpose.into(),
            ..Self::default()
        }
    }
}
