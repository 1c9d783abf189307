use futures::future::{self, BoxFuture, FutureExt};
use lazy_static::lazy_static;

use crate::errors::BackendError;
use crate::experience::{Experience, Vibe};
use crate::normalization::normalize_query;

/// The read side of the catalog. Backends must be safe for concurrent
/// reads; nothing here mutates.
pub trait Catalog: Send + Sync {
    /// Lists all vibes in display order.
    fn vibes(&self) -> BoxFuture<Result<Vec<Vibe>, BackendError>>;

    fn vibe_by_slug(&self, slug: &str) -> BoxFuture<Result<Option<Vibe>, BackendError>>;

    /// Lists all experiences.
    fn experiences(&self) -> BoxFuture<Result<Vec<Experience>, BackendError>>;

    fn experience_by_slug(&self, slug: &str)
        -> BoxFuture<Result<Option<Experience>, BackendError>>;

    fn experiences_by_vibe(&self, vibe_id: &str)
        -> BoxFuture<Result<Vec<Experience>, BackendError>>;

    /// Matches free text against titles, descriptions and locations.
    fn search(&self, query: &str) -> BoxFuture<Result<Vec<Experience>, BackendError>>;

    /// Returns the curated must-see selection in its fixed order.
    fn must_see(&self) -> BoxFuture<Result<Vec<Experience>, BackendError>>;
}

/// Curated must-see selection. The order is intentional.
const MUST_SEE_IDS: [&str; 6] = ["1", "2", "5", "4", "3", "6"];

/// A catalog seeded at process start and read-only thereafter.
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        StaticCatalog
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for StaticCatalog {
    fn vibes(&self) -> BoxFuture<Result<Vec<Vibe>, BackendError>> {
        future::ready(Ok(VIBES.clone())).boxed()
    }

    fn vibe_by_slug(&self, slug: &str) -> BoxFuture<Result<Option<Vibe>, BackendError>> {
        let vibe = VIBES.iter().find(|vibe| vibe.slug == slug).cloned();

        future::ready(Ok(vibe)).boxed()
    }

    fn experiences(&self) -> BoxFuture<Result<Vec<Experience>, BackendError>> {
        future::ready(Ok(EXPERIENCES.clone())).boxed()
    }

    fn experience_by_slug(
        &self,
        slug: &str,
    ) -> BoxFuture<Result<Option<Experience>, BackendError>> {
        let experience = EXPERIENCES
            .iter()
            .find(|experience| experience.slug == slug)
            .cloned();

        future::ready(Ok(experience)).boxed()
    }

    fn experiences_by_vibe(
        &self,
        vibe_id: &str,
    ) -> BoxFuture<Result<Vec<Experience>, BackendError>> {
        let experiences = EXPERIENCES
            .iter()
            .filter(|experience| experience.vibe_id == vibe_id)
            .cloned()
            .collect();

        future::ready(Ok(experiences)).boxed()
    }

    fn search(&self, query: &str) -> BoxFuture<Result<Vec<Experience>, BackendError>> {
        let needle = normalize_query(query);

        let experiences = if needle.is_empty() {
            vec![]
        } else {
            EXPERIENCES
                .iter()
                .filter(|experience| matches_query(experience, &needle))
                .cloned()
                .collect()
        };

        future::ready(Ok(experiences)).boxed()
    }

    fn must_see(&self) -> BoxFuture<Result<Vec<Experience>, BackendError>> {
        let experiences = MUST_SEE_IDS
            .iter()
            .filter_map(|id| EXPERIENCES.iter().find(|experience| experience.id == *id))
            .cloned()
            .collect();

        future::ready(Ok(experiences)).boxed()
    }
}

fn matches_query(experience: &Experience, needle: &str) -> bool {
    let mut haystacks = vec![
        normalize_query(&experience.title),
        normalize_query(&experience.description),
    ];

    if let Some(short_description) = &experience.short_description {
        haystacks.push(normalize_query(short_description));
    }

    if let Some(location) = &experience.location {
        haystacks.push(normalize_query(location));
    }

    haystacks.iter().any(|haystack| haystack.contains(needle))
}

fn vibe(id: &str, slug: &str, title: &str, description: &str, tagline: &str, order: u32) -> Vibe {
    Vibe {
        id: id.to_owned(),
        slug: slug.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        tagline: tagline.to_owned(),
        order,
    }
}

lazy_static! {
    /// The vibes, in locked display order.
    static ref VIBES: Vec<Vibe> = vec![
        vibe(
            "1",
            "vip-tours",
            "VIP Tours",
            "Exclusive premium tours",
            "Exclusive access to Tenerife's most coveted experiences",
            1,
        ),
        vibe(
            "2",
            "theme-parks",
            "Theme Parks",
            "Family fun and entertainment",
            "Unforgettable family adventures await",
            2,
        ),
        vibe(
            "3",
            "tickets-attractions",
            "Tickets & Attractions",
            "Skip-the-line tickets and attractions",
            "Skip the queues, maximize your time",
            3,
        ),
        vibe(
            "4",
            "bus-excursions",
            "Bus Excursions",
            "Guided bus tours around the island",
            "Discover the island in comfort and style",
            4,
        ),
        vibe(
            "5",
            "boat-trips-cruises",
            "Boat Trips & Cruises",
            "Ocean adventures and cruises",
            "Set sail for unforgettable ocean moments",
            5,
        ),
        vibe(
            "6",
            "shows-entertainment",
            "Shows & Entertainment",
            "Live shows and evening entertainment",
            "Evenings filled with world-class performances",
            6,
        ),
        vibe(
            "7",
            "water-sports",
            "Water Sports",
            "Aquatic activities and water fun",
            "Dive into thrilling aquatic adventures",
            7,
        ),
        vibe(
            "8",
            "cable-car-observatory",
            "Cable Car & Observatory",
            "Mountain views and stargazing",
            "Reach new heights and gaze at the stars",
            8,
        ),
        vibe(
            "9",
            "diving-fishing",
            "Diving & Fishing",
            "Underwater adventures and fishing trips",
            "Explore the depths or cast your line",
            9,
        ),
        vibe(
            "10",
            "adventure-nature",
            "Adventure & Nature",
            "Outdoor adventures and nature experiences",
            "Connect with Tenerife's wild side",
            10,
        ),
        vibe(
            "11",
            "gastronomy-tastings",
            "Gastronomy & Tastings",
            "Culinary experiences and tastings",
            "Savor the authentic flavors of the Canaries",
            11,
        ),
        vibe(
            "12",
            "car-rental",
            "Car Rental",
            "Vehicle rental services",
            "Freedom to explore at your own pace",
            12,
        ),
        vibe(
            "13",
            "bike-rental",
            "Bike Rental",
            "Bicycle rental services",
            "Pedal through scenic routes",
            13,
        ),
        vibe(
            "14",
            "transfers-transport",
            "Transfers & Transport",
            "Airport transfers and transport services",
            "Seamless journeys from start to finish",
            14,
        ),
    ];

    static ref EXPERIENCES: Vec<Experience> = vec![
        Experience {
            id: "1".to_owned(),
            slug: "teide-sunset-tour".to_owned(),
            title: "Teide Sunset Tour".to_owned(),
            description: "Experience the breathtaking sunset from Mount Teide, Spain's highest peak. This guided tour takes you to the summit where you'll witness one of nature's most spectacular displays as the sun sets over the Canary Islands. Includes cable car access, expert guide commentary, and time to explore the volcanic landscape.".to_owned(),
            short_description: Some("Sunset tour to Mount Teide".to_owned()),
            price: 45.0,
            currency: "EUR".to_owned(),
            vibe_id: "1".to_owned(),
            location: Some("Mount Teide".to_owned()),
            duration: Some("4 hours".to_owned()),
            duration_minutes: Some(240),
            rating: Some(4.5),
            review_count: Some(120),
            highlights: vec![
                "Cable car ride to summit".to_owned(),
                "Expert local guide".to_owned(),
                "Sunset viewing platform".to_owned(),
                "Volcanic landscape exploration".to_owned(),
            ],
            included: vec![
                "Cable car tickets".to_owned(),
                "Professional guide".to_owned(),
                "Hotel pickup and drop-off".to_owned(),
                "Small group experience".to_owned(),
            ],
            meeting_point: Some("Hotel pickup available or meet at cable car base station".to_owned()),
            cancellation_policy: Some("Free cancellation up to 24 hours before start time".to_owned()),
            language: Some("English, Spanish".to_owned()),
            group_size: Some("Small groups up to 16 people".to_owned()),
            availability_hint: Some("Multiple departures daily".to_owned()),
        },
        Experience {
            id: "2".to_owned(),
            slug: "siam-park-ticket".to_owned(),
            title: "Siam Park Ticket".to_owned(),
            description: "Enjoy full day access to Siam Park, one of the world's best water parks. Experience thrilling water slides, lazy rivers, wave pools, and family-friendly attractions. Perfect for all ages, with dining options and relaxation areas throughout the park.".to_owned(),
            short_description: Some("Full day water park access".to_owned()),
            price: 38.0,
            currency: "EUR".to_owned(),
            vibe_id: "2".to_owned(),
            location: Some("Costa Adeje".to_owned()),
            duration: Some("Full day".to_owned()),
            duration_minutes: Some(480),
            rating: Some(4.8),
            review_count: Some(450),
            highlights: vec![
                "Skip-the-line entry".to_owned(),
                "All attractions included".to_owned(),
                "Family-friendly".to_owned(),
                "Multiple dining options".to_owned(),
            ],
            included: vec![
                "Full day park admission".to_owned(),
                "Access to all attractions".to_owned(),
                "Locker rental available".to_owned(),
            ],
            meeting_point: Some("Direct entry at Siam Park main entrance".to_owned()),
            cancellation_policy: Some("Free cancellation up to 48 hours before visit date".to_owned()),
            availability_hint: Some("Available daily, year-round".to_owned()),
            ..Default::default()
        },
        Experience {
            id: "3".to_owned(),
            slug: "private-vip-tour".to_owned(),
            title: "Private VIP Tour".to_owned(),
            description: "Exclusive private tour with personal guide".to_owned(),
            short_description: Some("Private guided experience".to_owned()),
            price: 150.0,
            currency: "EUR".to_owned(),
            vibe_id: "1".to_owned(),
            location: Some("Tenerife".to_owned()),
            duration: Some("6 hours".to_owned()),
            duration_minutes: Some(360),
            rating: Some(4.9),
            review_count: Some(85),
            ..Default::default()
        },
        Experience {
            id: "4".to_owned(),
            slug: "loro-parque-ticket".to_owned(),
            title: "Loro Parque Ticket".to_owned(),
            description: "Access to Loro Parque theme park".to_owned(),
            short_description: Some("Theme park admission".to_owned()),
            price: 42.0,
            currency: "EUR".to_owned(),
            vibe_id: "2".to_owned(),
            location: Some("Puerto de la Cruz".to_owned()),
            duration: Some("Full day".to_owned()),
            duration_minutes: Some(480),
            rating: Some(4.7),
            review_count: Some(320),
            ..Default::default()
        },
        Experience {
            id: "5".to_owned(),
            slug: "skip-line-teide".to_owned(),
            title: "Skip the Line: Teide Cable Car".to_owned(),
            description: "Priority access to Mount Teide cable car".to_owned(),
            short_description: Some("Skip-the-line cable car ticket".to_owned()),
            price: 28.0,
            currency: "EUR".to_owned(),
            vibe_id: "3".to_owned(),
            location: Some("Mount Teide".to_owned()),
            duration: Some("2 hours".to_owned()),
            duration_minutes: Some(120),
            rating: Some(4.6),
            review_count: Some(280),
            ..Default::default()
        },
        Experience {
            id: "6".to_owned(),
            slug: "island-bus-tour".to_owned(),
            title: "Full Island Bus Tour".to_owned(),
            description: "Comprehensive bus tour around Tenerife".to_owned(),
            short_description: Some("Complete island exploration".to_owned()),
            price: 35.0,
            currency: "EUR".to_owned(),
            vibe_id: "4".to_owned(),
            location: Some("Tenerife".to_owned()),
            duration: Some("8 hours".to_owned()),
            duration_minutes: Some(480),
            rating: Some(4.4),
            review_count: Some(195),
            ..Default::default()
        },
    ];
}
