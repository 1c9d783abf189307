use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use warp::http::StatusCode;
use warp::reject;
use warp::{Filter, Reply};

use backend::attribution::store::MemoryStore;
use backend::catalog::StaticCatalog;
use backend::environment::Environment;
use backend::i18n::Translations;
use backend::locale::Locale;
use backend::routes;
use backend::urls::Urls;
use log::{o, Discard, Logger};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VibeResponse {
    id: String,
    slug: String,
    title: String,
    description: String,
    tagline: String,
    order: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExperiencesResponse {
    total: usize,
    experiences: Vec<ExperienceResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExperienceResponse {
    id: String,
    slug: String,
    title: String,
    description: String,
    short_description: Option<String>,
    price: f64,
    currency: String,
    vibe_id: String,
    location: Option<String>,
    duration: Option<String>,
    duration_minutes: Option<u32>,
    rating: Option<f64>,
    review_count: Option<u32>,
    #[serde(default)]
    highlights: Vec<String>,
    #[serde(default)]
    included: Vec<String>,
    meeting_point: Option<String>,
    cancellation_policy: Option<String>,
    language: Option<String>,
    group_size: Option<String>,
    availability_hint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecommendationsResponse {
    vibes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessageResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessageErrorResponse {
    locale: String,
    key: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HealthzResponse {
    revision: Option<String>,
    timestamp: Option<String>,
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttributionResponse {
    click_id: Option<String>,
    utm: Option<UtmResponse>,
    first_touch_timestamp: i64,
    last_touch_timestamp: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UtmResponse {
    source: Option<String>,
    medium: Option<String>,
    campaign: Option<String>,
    content: Option<String>,
    term: Option<String>,
}

fn make_environment() -> Environment {
    let logger = Arc::new(Logger::root(Discard, o!()));

    let mut messages = HashMap::new();
    messages.insert(
        Locale::En,
        json!({
            "nav": { "mustSee": "Must see" },
            "quiz": { "buttons": { "next": "Next" } }
        }),
    );
    messages.insert(Locale::Es, json!({ "nav": { "mustSee": "Imprescindibles" } }));

    Environment::new(
        logger,
        Arc::new(StaticCatalog::new()),
        Arc::new(MemoryStore::new()),
        Arc::new(Translations::new(messages).expect("build translations")),
        Arc::new(Urls::new("https://partner.example/visit")),
    )
}

fn make_filter(
    environment: Environment,
) -> impl Filter<Extract = impl Reply, Error = reject::Rejection> + Clone {
    let logger = environment.logger.clone();

    routes::make_locale_redirect_route(environment.clone())
        .or(routes::make_vibes_route(environment.clone()))
        .or(routes::make_vibe_route(environment.clone()))
        .or(routes::make_experiences_route(environment.clone()))
        .or(routes::make_must_see_route(environment.clone()))
        .or(routes::make_experience_route(environment.clone()))
        .or(routes::make_recommendations_route(environment.clone()))
        .or(routes::make_message_route(environment.clone()))
        .or(routes::make_attribution_capture_route(environment.clone()))
        .or(routes::make_attribution_clear_route(environment.clone()))
        .or(routes::make_attribution_route(environment.clone()))
        .or(routes::make_booking_route(environment))
        .recover(move |r| routes::format_rejection(logger.clone(), r))
}

fn slugs(response: &ExperiencesResponse) -> Vec<&str> {
    response
        .experiences
        .iter()
        .map(|e| e.slug.as_str())
        .collect()
}

#[tokio::test]
async fn doubled_locale_prefix_redirects_permanently() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/en/es/experiences?price=under_50")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers()["location"],
        "/es/experiences?price=under_50"
    );
    assert_eq!(response.headers()["x-locale-redirect"], "/es/experiences");
}

#[tokio::test]
async fn repeated_locale_prefix_collapses() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/en/en/must-see")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers()["location"], "/en/must-see");
}

#[tokio::test]
async fn asset_paths_are_not_redirected() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/assets/en/en/logo.png")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn single_locale_prefix_is_left_alone() {
    let filter = make_filter(make_environment());

    let response = warp::test::request().path("/en/vibes").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vibes_are_listed_in_display_order() {
    let filter = make_filter(make_environment());

    let response = warp::test::request().path("/vibes").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::OK);
    let vibes: Vec<VibeResponse> = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(vibes.len(), 14);
    assert_eq!(vibes[0].slug, "vip-tours");
    let orders: Vec<u32> = vibes.iter().map(|v| v.order).collect();
    assert_eq!(orders, (1..=14).collect::<Vec<u32>>());
}

#[tokio::test]
async fn vibe_lookup_by_slug() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/vibes/theme-parks")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let vibe: VibeResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(vibe.slug, "theme-parks");
    assert!(!vibe.id.is_empty());
    assert!(!vibe.title.is_empty());
    assert!(!vibe.description.is_empty());
    assert!(!vibe.tagline.is_empty());

    let missing = warp::test::request()
        .path("/vibes/volcano-surfing")
        .reply(&filter)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn experiences_default_to_recommended_order() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.total, 6);
    assert_eq!(
        slugs(&body),
        vec![
            "siam-park-ticket",
            "private-vip-tour",
            "loro-parque-ticket",
            "skip-line-teide",
            "teide-sunset-tour",
            "island-bus-tour",
        ]
    );
}

#[tokio::test]
async fn experiences_sort_by_price_ascending() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?sort=price_low")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        slugs(&body),
        vec![
            "skip-line-teide",
            "island-bus-tour",
            "siam-park-ticket",
            "loro-parque-ticket",
            "teide-sunset-tour",
            "private-vip-tour",
        ]
    );
}

#[tokio::test]
async fn experiences_sort_by_popularity() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?sort=popularity")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        slugs(&body),
        vec![
            "siam-park-ticket",
            "loro-parque-ticket",
            "skip-line-teide",
            "island-bus-tour",
            "teide-sunset-tour",
            "private-vip-tour",
        ]
    );
}

#[tokio::test]
async fn price_filter_drops_expensive_experiences() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?price=under_50")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.total, 5);
    assert!(!slugs(&body).contains(&"private-vip-tour"));
}

#[tokio::test]
async fn duration_filter_keeps_only_short_experiences() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?duration=short")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(slugs(&body), vec!["skip-line-teide"]);
}

#[tokio::test]
async fn unknown_filter_values_fall_back_to_defaults() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?price=cheap&sort=newest")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.total, 6);
    assert_eq!(body.experiences[0].slug, "siam-park-ticket");
}

#[tokio::test]
async fn vibe_filter_narrows_the_listing() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?vibe=1")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        slugs(&body),
        vec!["private-vip-tour", "teide-sunset-tour"]
    );
    assert!(body.experiences.iter().all(|e| e.vibe_id == "1"));
}

#[tokio::test]
async fn search_is_case_and_accent_insensitive() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences?q=TEIDE")
        .reply(&filter)
        .await;

    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        slugs(&body),
        vec!["skip-line-teide", "teide-sunset-tour"]
    );
}

#[tokio::test]
async fn must_see_preserves_curated_order() {
    let filter = make_filter(make_environment());

    let response = warp::test::request().path("/must-see").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: ExperiencesResponse = serde_json::from_slice(response.body()).unwrap();
    let ids: Vec<&str> = body.experiences.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "5", "4", "3", "6"]);
}

#[tokio::test]
async fn experience_lookup_by_slug() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/experiences/teide-sunset-tour")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let experience: ExperienceResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(experience.id, "1");
    assert_eq!(experience.price, 45.0);

    let missing = warp::test::request()
        .path("/experiences/underwater-hike")
        .reply(&filter)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recommendations_without_answers_are_empty() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/recommendations")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: RecommendationsResponse = serde_json::from_slice(response.body()).unwrap();
    assert!(body.vibes.is_empty());
}

#[tokio::test]
async fn single_answer_recommends_its_vibes() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/recommendations?mood=relax")
        .reply(&filter)
        .await;

    let body: RecommendationsResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        body.vibes,
        vec!["vip-tours", "cable-car-observatory", "boat-trips-cruises"]
    );
}

#[tokio::test]
async fn overlapping_answers_recommend_the_intersection() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/recommendations?mood=romantic&time=fullday&group=friends")
        .reply(&filter)
        .await;

    let body: RecommendationsResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.vibes, vec!["boat-trips-cruises"]);
}

#[tokio::test]
async fn disjoint_answers_fall_back_to_the_union() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/recommendations?mood=relax&time=evening")
        .reply(&filter)
        .await;

    let body: RecommendationsResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        body.vibes,
        vec![
            "vip-tours",
            "cable-car-observatory",
            "boat-trips-cruises",
            "shows-entertainment",
            "gastronomy-tastings",
        ]
    );
}

#[tokio::test]
async fn recommendations_are_capped_at_six() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/recommendations?mood=relax&time=fullday&group=family")
        .reply(&filter)
        .await;

    let body: RecommendationsResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.vibes.len(), 6);
}

#[tokio::test]
async fn messages_resolve_in_the_requested_locale() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/messages/es/nav.mustSee")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.text, "Imprescindibles");
}

#[tokio::test]
async fn missing_translations_fall_back_to_english_then_the_key() {
    let filter = make_filter(make_environment());

    let fallback = warp::test::request()
        .path("/messages/fr/quiz.buttons.next")
        .reply(&filter)
        .await;
    let body: MessageResponse = serde_json::from_slice(fallback.body()).unwrap();
    assert_eq!(body.text, "Next");

    let unknown_key = warp::test::request()
        .path("/messages/en/quiz.buttons.skip")
        .reply(&filter)
        .await;
    let body: MessageResponse = serde_json::from_slice(unknown_key.body()).unwrap();
    assert_eq!(body.text, "quiz.buttons.skip");
}

#[tokio::test]
async fn unknown_locale_is_a_bad_request() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/messages/xx/nav.mustSee")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageErrorResponse = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.locale, "xx");
    assert_eq!(body.key, "nav.mustSee");
    assert!(!body.message.is_empty());
}

#[tokio::test]
async fn attribution_capture_and_merge_flow() {
    let filter = make_filter(make_environment());

    let empty = warp::test::request().path("/attribution").reply(&filter).await;
    assert_eq!(empty.status(), StatusCode::NOT_FOUND);

    let first = warp::test::request()
        .method("POST")
        .path("/attribution?click_id=abc123&utm_source=google")
        .reply(&filter)
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let record: AttributionResponse = serde_json::from_slice(first.body()).unwrap();
    assert_eq!(record.click_id.as_deref(), Some("abc123"));
    assert_eq!(record.utm.as_ref().unwrap().source.as_deref(), Some("google"));
    assert_eq!(record.first_touch_timestamp, record.last_touch_timestamp);
    let first_touch = record.first_touch_timestamp;

    let second = warp::test::request()
        .method("POST")
        .path("/attribution?utm_source=bing&utm_campaign=summer")
        .reply(&filter)
        .await;
    let record: AttributionResponse = serde_json::from_slice(second.body()).unwrap();
    assert_eq!(record.click_id.as_deref(), Some("abc123"));
    let utm = record.utm.as_ref().unwrap();
    assert_eq!(utm.source.as_deref(), Some("bing"));
    assert_eq!(utm.campaign.as_deref(), Some("summer"));
    assert_eq!(record.first_touch_timestamp, first_touch);

    let stored = warp::test::request().path("/attribution").reply(&filter).await;
    assert_eq!(stored.status(), StatusCode::OK);

    let cleared = warp::test::request()
        .method("DELETE")
        .path("/attribution")
        .reply(&filter)
        .await;
    assert_eq!(cleared.status(), StatusCode::NO_CONTENT);

    let gone = warp::test::request().path("/attribution").reply(&filter).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_capture_does_not_create_a_record() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .method("POST")
        .path("/attribution?click_id=&utm_source=")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let stored = warp::test::request().path("/attribution").reply(&filter).await;
    assert_eq!(stored.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn healthz_reports_build_metadata() {
    let filter = routes::admin::make_healthz_route(make_environment());

    let response = warp::test::request().path("/healthz").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: HealthzResponse = serde_json::from_slice(response.body()).unwrap();
    assert!(!body.version.is_empty());
    let _ = (body.revision, body.timestamp);
}

#[tokio::test]
async fn booking_hands_off_to_the_partner_with_attribution() {
    let filter = make_filter(make_environment());

    let response = warp::test::request()
        .path("/out/booking?experience=teide-sunset-tour&click_id=abc123&utm_source=google")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert_eq!(
        location,
        "https://partner.example/visit?experience=teide-sunset-tour&click_id=abc123&utm_source=google"
    );

    let stored = warp::test::request().path("/attribution").reply(&filter).await;
    assert_eq!(stored.status(), StatusCode::OK);
    let record: AttributionResponse = serde_json::from_slice(stored.body()).unwrap();
    assert_eq!(record.click_id.as_deref(), Some("abc123"));
}
