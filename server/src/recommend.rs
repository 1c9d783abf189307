//! Deterministic quiz-answer to vibe mapping for the "get inspired" flow.
//!
//! Each answer maps to a short, priority-ordered list of vibe slugs.
//! Multiple answers are intersected; a disjoint intersection falls back to
//! the union so that a visitor who answered anything never sees an empty
//! result.

/// The most vibes a single recommendation returns.
const MAX_RECOMMENDATIONS: usize = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mood {
    Relax,
    Adventure,
    Romantic,
    Family,
    Culture,
    Ocean,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeAvailable {
    TwoToThreeHours,
    HalfDay,
    FullDay,
    Evening,
    MultiDay,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupType {
    Couple,
    Family,
    Friends,
    Solo,
    Seniors,
}

impl Mood {
    /// Parses a query parameter; anything unrecognized counts as unanswered.
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value? {
            "relax" => Some(Mood::Relax),
            "adventure" => Some(Mood::Adventure),
            "romantic" => Some(Mood::Romantic),
            "family" => Some(Mood::Family),
            "culture" => Some(Mood::Culture),
            "ocean" => Some(Mood::Ocean),
            _ => None,
        }
    }

    fn vibes(self) -> &'static [&'static str] {
        match self {
            Mood::Relax => &["vip-tours", "cable-car-observatory", "boat-trips-cruises"],
            Mood::Adventure => &["adventure-nature", "water-sports", "diving-fishing"],
            Mood::Romantic => &["vip-tours", "boat-trips-cruises", "shows-entertainment"],
            Mood::Family => &["theme-parks", "tickets-attractions", "bus-excursions"],
            Mood::Culture => &["tickets-attractions", "bus-excursions", "gastronomy-tastings"],
            Mood::Ocean => &["boat-trips-cruises", "water-sports", "diving-fishing"],
        }
    }
}

impl TimeAvailable {
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value? {
            "2-3hours" => Some(TimeAvailable::TwoToThreeHours),
            "halfday" => Some(TimeAvailable::HalfDay),
            "fullday" => Some(TimeAvailable::FullDay),
            "evening" => Some(TimeAvailable::Evening),
            "multiday" => Some(TimeAvailable::MultiDay),
            _ => None,
        }
    }

    fn vibes(self) -> &'static [&'static str] {
        match self {
            TimeAvailable::TwoToThreeHours => &[
                "tickets-attractions",
                "cable-car-observatory",
                "gastronomy-tastings",
            ],
            TimeAvailable::HalfDay => &["vip-tours", "bus-excursions", "water-sports"],
            TimeAvailable::FullDay => &["theme-parks", "boat-trips-cruises", "adventure-nature"],
            TimeAvailable::Evening => &["shows-entertainment", "gastronomy-tastings"],
            TimeAvailable::MultiDay => &["car-rental", "bike-rental"],
        }
    }
}

impl GroupType {
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value? {
            "couple" => Some(GroupType::Couple),
            "family" => Some(GroupType::Family),
            "friends" => Some(GroupType::Friends),
            "solo" => Some(GroupType::Solo),
            "seniors" => Some(GroupType::Seniors),
            _ => None,
        }
    }

    fn vibes(self) -> &'static [&'static str] {
        match self {
            GroupType::Couple => &[
                "vip-tours",
                "boat-trips-cruises",
                "shows-entertainment",
                "gastronomy-tastings",
            ],
            GroupType::Family => &[
                "theme-parks",
                "tickets-attractions",
                "bus-excursions",
                "water-sports",
            ],
            GroupType::Friends => &[
                "adventure-nature",
                "water-sports",
                "boat-trips-cruises",
                "shows-entertainment",
            ],
            GroupType::Solo => &[
                "tickets-attractions",
                "bus-excursions",
                "cable-car-observatory",
                "gastronomy-tastings",
            ],
            GroupType::Seniors => &[
                "bus-excursions",
                "vip-tours",
                "tickets-attractions",
                "shows-entertainment",
            ],
        }
    }
}

/// Maps quiz answers to an ordered list of vibe slugs, at most six.
///
/// No answers yields nothing. One answer yields its own list. Several
/// answers yield the vibes common to all of them, in the first list's
/// order; when nothing is common, the de-duplicated union of every
/// consulted list is used instead.
pub fn recommend(
    mood: Option<Mood>,
    time: Option<TimeAvailable>,
    group: Option<GroupType>,
) -> Vec<&'static str> {
    let mut sets: Vec<&'static [&'static str]> = vec![];

    if let Some(mood) = mood {
        sets.push(mood.vibes());
    }
    if let Some(time) = time {
        sets.push(time.vibes());
    }
    if let Some(group) = group {
        sets.push(group.vibes());
    }

    match sets.len() {
        0 => vec![],
        1 => sets[0].iter().take(MAX_RECOMMENDATIONS).copied().collect(),
        _ => {
            let intersection: Vec<&'static str> = sets[0]
                .iter()
                .filter(|slug| sets[1..].iter().all(|set| set.contains(slug)))
                .copied()
                .collect();

            if intersection.is_empty() {
                let mut union: Vec<&'static str> = vec![];
                for set in &sets {
                    for slug in *set {
                        if !union.contains(slug) {
                            union.push(slug);
                        }
                    }
                }
                union.truncate(MAX_RECOMMENDATIONS);
                union
            } else {
                intersection
                    .into_iter()
                    .take(MAX_RECOMMENDATIONS)
                    .collect()
            }
        }
    }
}
