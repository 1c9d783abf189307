use log::{warn, Logger};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use self::store::AttributionStore;

pub mod store;

/// The UTM campaign-tracking fields captured from a landing URL.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UtmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl UtmParams {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.medium.is_none()
            && self.campaign.is_none()
            && self.content.is_none()
            && self.term.is_none()
    }

    /// Merges field by field. An incoming value wins only when present; an
    /// absent incoming field never clears a previously captured one.
    fn merged(existing: Option<UtmParams>, incoming: Option<UtmParams>) -> Option<UtmParams> {
        match (existing, incoming) {
            (None, None) => None,
            (None, Some(incoming)) => Some(incoming),
            (Some(existing), None) => Some(existing),
            (Some(existing), Some(incoming)) => Some(UtmParams {
                source: incoming.source.or(existing.source),
                medium: incoming.medium.or(existing.medium),
                campaign: incoming.campaign.or(existing.campaign),
                content: incoming.content.or(existing.content),
                term: incoming.term.or(existing.term),
            }),
        }
    }
}

/// A session-scoped affiliate-attribution record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Attribution {
    /// The affiliate network's click identifier, if one was seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm: Option<UtmParams>,

    /// When the first qualifying visit happened, in unix milliseconds.
    /// Set once and never changed afterwards.
    pub first_touch_timestamp: i64,

    /// When the most recent qualifying visit happened, in unix milliseconds.
    pub last_touch_timestamp: i64,
}

/// The attribution-relevant parameters pulled off an incoming URL.
#[derive(Clone, Debug, Default)]
pub struct CapturedParams {
    pub click_id: Option<String>,
    pub utm: Option<UtmParams>,
}

impl CapturedParams {
    /// Whether the URL carried nothing that qualifies the visit.
    pub fn is_empty(&self) -> bool {
        self.click_id.is_none() && self.utm.is_none()
    }
}

/// Current time as unix milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Folds newly captured parameters into whatever the store holds.
///
/// An empty capture reads but never writes. A first capture stamps both
/// touch timestamps with `now`; later captures keep the first touch, move
/// the last touch, and merge click ID and UTM fields individually. Store
/// failures degrade: a failed read acts like an empty store and a failed
/// write still hands the merged record back to the caller.
pub fn capture(
    store: &dyn AttributionStore,
    logger: &Logger,
    captured: CapturedParams,
    now: i64,
) -> Option<Attribution> {
    let existing = match store.load() {
        Ok(existing) => existing,
        Err(e) => {
            warn!(logger, "Attribution store read failed"; "error" => %e);
            None
        }
    };

    if captured.is_empty() {
        return existing;
    }

    let record = match existing {
        Some(previous) => Attribution {
            click_id: captured.click_id.or(previous.click_id),
            utm: UtmParams::merged(previous.utm, captured.utm),
            first_touch_timestamp: previous.first_touch_timestamp,
            last_touch_timestamp: now,
        },
        None => Attribution {
            click_id: captured.click_id,
            utm: captured.utm,
            first_touch_timestamp: now,
            last_touch_timestamp: now,
        },
    };

    if let Err(e) = store.save(&record) {
        warn!(logger, "Attribution store write failed"; "error" => %e);
    }

    Some(record)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use log::{o, Discard, Logger};

    use super::store::{AttributionStore, MemoryStore};
    use super::{capture, CapturedParams, UtmParams};

    fn logger() -> Logger {
        Logger::root(Discard, o!())
    }

    fn utm_source(value: &str) -> Option<UtmParams> {
        Some(UtmParams {
            source: Some(value.to_owned()),
            ..Default::default()
        })
    }

    #[test]
    fn empty_capture_reads_without_writing() {
        let store = MemoryStore::new();

        assert!(capture(&store, &logger(), CapturedParams::default(), 1000).is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn first_capture_stamps_both_touches() {
        let store = MemoryStore::new();

        let record = capture(
            &store,
            &logger(),
            CapturedParams {
                click_id: Some("abc".to_owned()),
                utm: utm_source("google"),
            },
            1000,
        )
        .unwrap();

        assert_eq!(record.first_touch_timestamp, 1000);
        assert_eq!(record.last_touch_timestamp, 1000);
        assert_eq!(record.click_id.as_deref(), Some("abc"));
        assert_eq!(store.load().unwrap(), Some(record));
    }

    #[test]
    fn later_captures_merge_without_clearing() {
        let store = MemoryStore::new();
        let logger = logger();

        capture(
            &store,
            &logger,
            CapturedParams {
                click_id: None,
                utm: utm_source("google"),
            },
            1000,
        );

        let record = capture(
            &store,
            &logger,
            CapturedParams {
                click_id: None,
                utm: Some(UtmParams {
                    medium: Some("cpc".to_owned()),
                    ..Default::default()
                }),
            },
            2000,
        )
        .unwrap();

        let utm = record.utm.unwrap();
        assert_eq!(utm.source.as_deref(), Some("google"));
        assert_eq!(utm.medium.as_deref(), Some("cpc"));
        assert_eq!(record.first_touch_timestamp, 1000);
        assert_eq!(record.last_touch_timestamp, 2000);
    }

    #[test]
    fn incoming_click_id_wins_but_absence_keeps_the_old_one() {
        let store = MemoryStore::new();
        let logger = logger();

        capture(
            &store,
            &logger,
            CapturedParams {
                click_id: Some("first".to_owned()),
                utm: None,
            },
            1000,
        );

        let record = capture(
            &store,
            &logger,
            CapturedParams {
                click_id: None,
                utm: utm_source("newsletter"),
            },
            2000,
        )
        .unwrap();
        assert_eq!(record.click_id.as_deref(), Some("first"));

        let record = capture(
            &store,
            &logger,
            CapturedParams {
                click_id: Some("second".to_owned()),
                utm: None,
            },
            3000,
        )
        .unwrap();
        assert_eq!(record.click_id.as_deref(), Some("second"));
        assert_eq!(record.first_touch_timestamp, 1000);
    }

    #[test]
    fn stores_are_object_safe() {
        let store: Arc<dyn AttributionStore> = Arc::new(MemoryStore::new());
        assert!(store.load().unwrap().is_none());
    }
}
