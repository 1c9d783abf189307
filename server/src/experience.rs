use serde::{Deserialize, Serialize};

/// A category grouping bookable experiences, e.g. "Water Sports".
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Vibe {
    /// The ID of the vibe.
    pub id: String,

    /// The URL slug. Unique.
    pub slug: String,

    pub title: String,

    pub description: String,

    pub tagline: String,

    /// Locked display position, starting at 1.
    pub order: u32,
}

/// A single bookable activity offered through a third-party operator.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Experience {
    /// The ID of the experience.
    pub id: String,

    /// The URL slug. Unique.
    pub slug: String,

    pub title: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    /// The advertised price. Never negative.
    pub price: f64,

    /// ISO 4217 currency code.
    pub currency: String,

    /// The ID of the vibe it belongs to.
    pub vibe_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Free-text duration as shown to visitors, e.g. "2-3 hours".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Duration in minutes, when known. Preferred over parsing `duration`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    /// Average operator rating, 0 to 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub highlights: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub included: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_point: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_policy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_hint: Option<String>,
}
