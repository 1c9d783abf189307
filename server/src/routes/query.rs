use serde::Deserialize;

use crate::attribution::{CapturedParams, UtmParams};

/// Listing-page query parameters. Band and sort values are free-form
/// strings here; unrecognized ones fall back to their defaults when
/// parsed.
#[derive(Debug, Default, Deserialize)]
pub struct ExperienceQuery {
    pub price: Option<String>,
    pub duration: Option<String>,
    pub rating: Option<String>,
    pub sort: Option<String>,
    /// Restricts the listing to one vibe, by ID.
    pub vibe: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub mood: Option<String>,
    pub time: Option<String>,
    pub group: Option<String>,
}

/// The attribution-qualifying parameters of a landing URL.
#[derive(Debug, Default, Deserialize)]
pub struct AttributionQuery {
    pub click_id: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

// the attribution fields are repeated here because flattening is not
// supported by the urlencoded deserializer behind warp::query
#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub experience: String,
    pub click_id: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

impl BookingQuery {
    /// Splits off the experience slug from the qualifying parameters.
    pub fn into_parts(self) -> (String, CapturedParams) {
        let captured = AttributionQuery {
            click_id: self.click_id,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
            utm_content: self.utm_content,
            utm_term: self.utm_term,
        }
        .into_captured();

        (self.experience, captured)
    }
}

impl AttributionQuery {
    /// Extracts the qualifying parameters, treating empty strings the
    /// same as absent ones.
    pub fn into_captured(self) -> CapturedParams {
        let utm = UtmParams {
            source: non_empty(self.utm_source),
            medium: non_empty(self.utm_medium),
            campaign: non_empty(self.utm_campaign),
            content: non_empty(self.utm_content),
            term: non_empty(self.utm_term),
        };

        CapturedParams {
            click_id: non_empty(self.click_id),
            utm: if utm.is_empty() { None } else { Some(utm) },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
