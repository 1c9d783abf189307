use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Experience { slug: String },
    Experiences,
    Message { locale: String, key: String },
    MustSee,
    Vibe { slug: String },
    Vibes,
}

impl Context {
    pub fn experience(slug: String) -> Context {
        Context::Experience { slug }
    }

    pub fn experiences() -> Context {
        Context::Experiences
    }

    pub fn message(locale: String, key: String) -> Context {
        Context::Message { locale, key }
    }

    pub fn must_see() -> Context {
        Context::MustSee
    }

    pub fn vibe(slug: String) -> Context {
        Context::Vibe { slug }
    }

    pub fn vibes() -> Context {
        Context::Vibes
    }
}
