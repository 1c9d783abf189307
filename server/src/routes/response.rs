use serde::Serialize;

use crate::experience::Experience;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Experiences {
        total: usize,
        experiences: Vec<Experience>,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Message {
        text: &'a str,
    },
    Recommendations {
        vibes: Vec<&'static str>,
    },
}
