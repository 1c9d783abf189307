use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        UnknownLocale { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::filters::BoxedFilter;
    use warp::path::{end, full};
    use warp::Filter;
    use warp::Reply;
    use warp::{delete, get as g, path as p, path::param as par, post, query};

    use super::{handlers, query as q};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any()
                .map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_vibes_route => vibes, rt; p("vibes"), end(), g());
    route!(make_vibe_route => vibe, rt; p("vibes"), par::<String>(), end(), g());
    route!(make_experiences_route => experiences, rt; p("experiences"), query::<q::ExperienceQuery>(), end(), g());
    route!(make_experience_route => experience, rt; p("experiences"), par::<String>(), end(), g());
    route!(make_must_see_route => must_see, rt; p("must-see"), end(), g());
    route!(make_recommendations_route => recommendations, rt; p("recommendations"), query::<q::RecommendationQuery>(), end(), g());
    route!(make_message_route => message, rt; p("messages"), par::<String>(), par::<String>(), end(), g());
    route!(make_attribution_route => attribution, rt; p("attribution"), end(), g());
    route!(make_attribution_capture_route => attribution_capture, rt; p("attribution"), query::<q::AttributionQuery>(), end(), post());
    route!(make_attribution_clear_route => attribution_clear, rt; p("attribution"), end(), delete());
    route!(make_booking_route => booking, rt; p("out"), p("booking"), query::<q::BookingQuery>(), end(), g());

    /// Canonicalizes doubled locale prefixes ahead of every other route.
    /// Non-matching requests reject and fall through to the rest of the
    /// tree.
    pub fn make_locale_redirect_route(environment: Environment) -> Route {
        let raw_query = warp::query::raw()
            .or_else(|_| async { Ok::<_, warp::Rejection>((String::new(),)) });

        warp::any()
            .map(move || environment.clone())
            .and(full())
            .and(raw_query)
            .and_then(handlers::locale_redirect)
            .boxed()
    }
}
