use std::cmp::Ordering;

use crate::experience::Experience;

/// Price bands selectable on listing pages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PriceBand {
    All,
    Under50,
    Between50And100,
    Over100,
}

/// Duration bands, applied to an effective duration in minutes.
///
/// The bands are independent predicates, not a partition: `Short` (under
/// 240) and `HalfDay` (180 to 480) overlap on purpose, matching how the
/// site has always bucketed durations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DurationBand {
    All,
    Short,
    HalfDay,
    FullDay,
    MultiDay,
}

/// Rating bands. Unrated experiences fail every band except `All`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RatingBand {
    All,
    FourPlus,
    TopRated,
}

/// Sort orders for experience listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Recommended,
    PriceLow,
    PriceHigh,
    Rating,
    Popularity,
}

/// One listing page's worth of filter selections, rebuilt from query
/// parameters on every request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExperienceFilters {
    pub price: PriceBand,
    pub duration: DurationBand,
    pub rating: RatingBand,
}

impl Default for PriceBand {
    fn default() -> Self {
        PriceBand::All
    }
}

impl Default for DurationBand {
    fn default() -> Self {
        DurationBand::All
    }
}

impl Default for RatingBand {
    fn default() -> Self {
        RatingBand::All
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Recommended
    }
}

impl PriceBand {
    /// Parses a query parameter, treating anything unrecognized as `All`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("under_50") => PriceBand::Under50,
            Some("between_50_100") => PriceBand::Between50And100,
            Some("over_100") => PriceBand::Over100,
            _ => PriceBand::All,
        }
    }

    fn matches(self, price: f64) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Under50 => price < 50.0,
            PriceBand::Between50And100 => (50.0..=100.0).contains(&price),
            PriceBand::Over100 => price > 100.0,
        }
    }
}

impl DurationBand {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("short") => DurationBand::Short,
            Some("half_day") => DurationBand::HalfDay,
            Some("full_day") => DurationBand::FullDay,
            Some("multi_day") => DurationBand::MultiDay,
            _ => DurationBand::All,
        }
    }

    fn matches(self, minutes: u32) -> bool {
        match self {
            DurationBand::All => true,
            DurationBand::Short => minutes < 240,
            DurationBand::HalfDay => (180..480).contains(&minutes),
            DurationBand::FullDay => (480..1440).contains(&minutes),
            DurationBand::MultiDay => minutes >= 1440,
        }
    }
}

impl RatingBand {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("four_plus") => RatingBand::FourPlus,
            Some("top_rated") => RatingBand::TopRated,
            _ => RatingBand::All,
        }
    }

    fn matches(self, rating: Option<f64>) -> bool {
        match self {
            RatingBand::All => true,
            RatingBand::FourPlus => rating.map(|r| r >= 4.0).unwrap_or(false),
            RatingBand::TopRated => rating.map(|r| r >= 4.5).unwrap_or(false),
        }
    }
}

impl SortOrder {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("price_low") => SortOrder::PriceLow,
            Some("price_high") => SortOrder::PriceHigh,
            Some("rating") => SortOrder::Rating,
            Some("popularity") => SortOrder::Popularity,
            _ => SortOrder::Recommended,
        }
    }
}

/// The duration used for band checks: the explicit minutes field when the
/// operator provides one, otherwise a best-effort parse of the free-text
/// duration. Unknown durations count as zero minutes.
pub fn effective_minutes(experience: &Experience) -> u32 {
    experience
        .duration_minutes
        .unwrap_or_else(|| parse_duration_minutes(experience.duration.as_deref()))
}

/// Approximates a free-text duration as minutes.
///
/// "Multi day" counts as 1440, "full day" as 480, "half day" as 240.
/// Otherwise the first hour range ("2-3 hours", "4 hours", "2h") is
/// averaged and converted. Anything else is zero.
pub fn parse_duration_minutes(duration: Option<&str>) -> u32 {
    let lower = match duration {
        Some(duration) => duration.to_lowercase(),
        None => return 0,
    };

    if lower.contains("multi") {
        return 1440;
    }
    if lower.contains("full day") || lower.contains("full-day") {
        return 480;
    }
    if lower.contains("half day") || lower.contains("half-day") {
        return 240;
    }

    match first_hour_range(&lower) {
        Some((start, end)) => (((start + end) as f64 / 2.0) * 60.0) as u32,
        None => 0,
    }
}

/// Finds the first "N" or "N-M" immediately followed (modulo spaces and a
/// dash) by an hour marker.
fn first_hour_range(lower: &str) -> Option<(u32, u32)> {
    let bytes = lower.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let first: u32 = match lower[start..i].parse() {
            Ok(value) => value,
            Err(_) => continue,
        };

        let mut j = i;
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'-' {
            j += 1;
            while j < bytes.len() && bytes[j] == b' ' {
                j += 1;
            }
        }

        let mut second = None;
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            let digits_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            second = lower[digits_start..j].parse().ok();
            while j < bytes.len() && bytes[j] == b' ' {
                j += 1;
            }
        }

        if lower[j..].starts_with('h') {
            return Some((first, second.unwrap_or(first)));
        }
    }

    None
}

/// Keeps the experiences passing all three band predicates, in their
/// original order. Never fabricates or mutates records.
pub fn apply_filters(
    experiences: &[Experience],
    filters: &ExperienceFilters,
) -> Vec<Experience> {
    experiences
        .iter()
        .filter(|experience| {
            filters.price.matches(experience.price)
                && filters.duration.matches(effective_minutes(experience))
                && filters.rating.matches(experience.rating)
        })
        .cloned()
        .collect()
}

/// Returns a freshly sorted copy; the input order is left alone.
pub fn sort_experiences(experiences: &[Experience], order: SortOrder) -> Vec<Experience> {
    let mut sorted = experiences.to_vec();

    match order {
        SortOrder::PriceLow => sorted.sort_by(|a, b| compare_f64(a.price, b.price)),
        SortOrder::PriceHigh => sorted.sort_by(|a, b| compare_f64(b.price, a.price)),
        SortOrder::Rating => sorted.sort_by(|a, b| {
            compare_f64(b.rating.unwrap_or(0.0), a.rating.unwrap_or(0.0)).then_with(|| {
                b.review_count
                    .unwrap_or(0)
                    .cmp(&a.review_count.unwrap_or(0))
            })
        }),
        SortOrder::Popularity => sorted.sort_by(|a, b| {
            b.review_count
                .unwrap_or(0)
                .cmp(&a.review_count.unwrap_or(0))
        }),
        SortOrder::Recommended => {
            sorted.sort_by(|a, b| compare_f64(recommended_score(b), recommended_score(a)))
        }
    }

    sorted
}

/// Balances quality with popularity: rating plus ln(reviews + 1) / 10.
fn recommended_score(experience: &Experience) -> f64 {
    experience.rating.unwrap_or(0.0)
        + ((experience.review_count.unwrap_or(0) as f64) + 1.0).ln() / 10.0
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
