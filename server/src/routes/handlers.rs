use std::time::{Duration, Instant};

use log::{debug, info, warn};
use warp::http::StatusCode;
use warp::path::FullPath;
use warp::reject;
use warp::reply::{json, with_header, with_status, Reply};

use crate::attribution::{self, now_millis};
use crate::environment::Environment;
use crate::errors::BackendError;
use crate::filters::{
    apply_filters, sort_experiences, DurationBand, ExperienceFilters, PriceBand, RatingBand,
    SortOrder,
};
use crate::locale::{normalize_path, Locale};
use crate::recommend::{self, GroupType, Mood, TimeAvailable};
use crate::routes::{
    query::{AttributionQuery, BookingQuery, ExperienceQuery, RecommendationQuery},
    rejection::{Context, Rejection},
    response::SuccessResponse,
};

const SERVER_TIMING_HEADER: &str = "server-timing";

/// Diagnostic header naming the canonical path a normalization hit
/// redirected to. Server-side debugging only.
const LOCALE_REDIRECT_HEADER: &str = "x-locale-redirect";

const LOCATION_HEADER: &str = "location";

type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

/// Emits a 308 to the canonical path when the request carries a doubled
/// locale prefix; rejects otherwise so the request falls through.
pub async fn locale_redirect(
    environment: Environment,
    path: FullPath,
    raw_query: String,
) -> RouteResult {
    let target = match normalize_path(path.as_str()) {
        Some(target) => target,
        None => return Err(reject::not_found()),
    };

    info!(environment.logger, "Normalizing doubled locale prefix"; "from" => path.as_str(), "to" => &target);

    let location = if raw_query.is_empty() {
        target.clone()
    } else {
        format!("{}?{}", target, raw_query)
    };

    Ok(Box::new(with_header(
        with_header(StatusCode::PERMANENT_REDIRECT, LOCATION_HEADER, location),
        LOCALE_REDIRECT_HEADER,
        target,
    )) as Box<dyn Reply>)
}

pub async fn vibes(environment: Environment) -> RouteResult {
    timed! {
        let vibes = environment
            .catalog
            .vibes()
            .await
            .map_err(|e: BackendError| Rejection::new(Context::vibes(), e))?;

        json(&vibes)
    }
}

pub async fn vibe(environment: Environment, slug: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::vibe(slug.clone()), e);

        let option = environment
            .catalog
            .vibe_by_slug(&slug)
            .await
            .map_err(error_handler)?;

        match option {
            Some(vibe) => with_status(json(&vibe), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn experiences(environment: Environment, query: ExperienceQuery) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::experiences(), e);

        let ExperienceQuery {
            price,
            duration,
            rating,
            sort,
            vibe,
            q,
        } = query;

        let records = match (&vibe, &q) {
            (Some(vibe), _) => environment.catalog.experiences_by_vibe(vibe).await,
            (None, Some(q)) => environment.catalog.search(q).await,
            (None, None) => environment.catalog.experiences().await,
        }
        .map_err(error_handler)?;

        let filters = ExperienceFilters {
            price: PriceBand::from_query(price.as_deref()),
            duration: DurationBand::from_query(duration.as_deref()),
            rating: RatingBand::from_query(rating.as_deref()),
        };

        let filtered = apply_filters(&records, &filters);
        let sorted = sort_experiences(&filtered, SortOrder::from_query(sort.as_deref()));

        json(&SuccessResponse::Experiences {
            total: sorted.len(),
            experiences: sorted,
        })
    }
}

pub async fn experience(environment: Environment, slug: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::experience(slug.clone()), e);

        let option = environment
            .catalog
            .experience_by_slug(&slug)
            .await
            .map_err(error_handler)?;

        match option {
            Some(experience) => with_status(json(&experience), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn must_see(environment: Environment) -> RouteResult {
    timed! {
        let experiences = environment
            .catalog
            .must_see()
            .await
            .map_err(|e: BackendError| Rejection::new(Context::must_see(), e))?;

        json(&SuccessResponse::Experiences {
            total: experiences.len(),
            experiences,
        })
    }
}

pub async fn recommendations(
    _environment: Environment,
    query: RecommendationQuery,
) -> RouteResult {
    timed! {
        let RecommendationQuery { mood, time, group } = query;

        let vibes = recommend::recommend(
            Mood::from_query(mood.as_deref()),
            TimeAvailable::from_query(time.as_deref()),
            GroupType::from_query(group.as_deref()),
        );

        json(&SuccessResponse::Recommendations { vibes })
    }
}

pub async fn message(environment: Environment, locale: String, key: String) -> RouteResult {
    timed! {
        let error_handler =
            |e: BackendError| Rejection::new(Context::message(locale.clone(), key.clone()), e);

        let locale: Locale = locale.parse().map_err(error_handler)?;
        let text = environment.translations.translate(locale, &key);

        json(&SuccessResponse::Message { text })
    }
}

pub async fn attribution(environment: Environment) -> RouteResult {
    timed! {
        let record = match environment.attribution.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(environment.logger, "Attribution store read failed"; "error" => %e);
                None
            }
        };

        match record {
            Some(record) => with_status(json(&record), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn attribution_capture(
    environment: Environment,
    query: AttributionQuery,
) -> RouteResult {
    timed! {
        let record = attribution::capture(
            environment.attribution.as_ref(),
            &environment.logger,
            query.into_captured(),
            now_millis(),
        );

        match record {
            Some(record) => with_status(json(&record), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn attribution_clear(environment: Environment) -> RouteResult {
    timed! {
        debug!(environment.logger, "Clearing attribution record...");
        environment.attribution.clear();

        StatusCode::NO_CONTENT
    }
}

/// Captures any attribution on the URL, then hands the visitor off to the
/// partner with the experience and attribution attached.
pub async fn booking(environment: Environment, query: BookingQuery) -> RouteResult {
    timed! {
        let (experience, captured) = query.into_parts();

        let record = attribution::capture(
            environment.attribution.as_ref(),
            &environment.logger,
            captured,
            now_millis(),
        );

        let target = environment.urls.booking_redirect(&experience, record.as_ref());
        debug!(environment.logger, "Handing booking off"; "experience" => &experience, "target" => %target);

        with_header(StatusCode::TEMPORARY_REDIRECT, LOCATION_HEADER, target.as_str())
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
