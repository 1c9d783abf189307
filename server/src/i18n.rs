use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::errors::BackendError;
use crate::locale::{Locale, ALL_LOCALES, DEFAULT_LOCALE};

/// The per-locale message tables, loaded once at startup. English is the
/// reference table every other locale falls back to.
pub struct Translations {
    messages: HashMap<Locale, Value>,
}

impl Translations {
    /// Creates an instance from already-parsed tables. The English table
    /// must be present.
    pub fn new(messages: HashMap<Locale, Value>) -> Result<Self, BackendError> {
        if !messages.contains_key(&DEFAULT_LOCALE) {
            return Err(BackendError::MissingReferenceMessages);
        }

        Ok(Translations { messages })
    }

    /// Loads `<locale>.json` files from a directory. A missing file for a
    /// non-English locale is tolerated; that locale simply always falls
    /// back.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, BackendError> {
        let dir = dir.as_ref();
        let mut messages = HashMap::new();

        for locale in &ALL_LOCALES {
            let path = dir.join(format!("{}.json", locale.as_str()));

            let raw = match fs::read(&path) {
                Ok(raw) => raw,
                Err(e) if e.kind() == ErrorKind::NotFound && *locale != DEFAULT_LOCALE => {
                    continue;
                }
                Err(source) => return Err(BackendError::UnreadableMessages { path, source }),
            };

            let table = serde_json::from_slice(&raw).map_err(|source| {
                BackendError::MalformedMessages {
                    locale: locale.as_str(),
                    source,
                }
            })?;

            messages.insert(*locale, table);
        }

        Self::new(messages)
    }

    /// Walks a dot-separated key path through the locale's table.
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        let mut current = self.messages.get(&locale)?;

        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }

        current.as_str()
    }

    /// Resolves a message, degrading from the locale's table to English
    /// and finally to the raw key. Lookup failures never escape here.
    pub fn translate<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.lookup(locale, key)
            .or_else(|| self.lookup(DEFAULT_LOCALE, key))
            .unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::Translations;
    use crate::locale::Locale;

    fn translations() -> Translations {
        let mut messages = HashMap::new();
        messages.insert(
            Locale::En,
            json!({
                "common": { "search": "Search", "bookNow": "Book now" },
                "x": { "y": "Hello" }
            }),
        );
        messages.insert(
            Locale::Fr,
            json!({
                "common": { "search": "Rechercher" }
            }),
        );

        Translations::new(messages).unwrap()
    }

    #[test]
    fn present_keys_resolve_in_the_requested_locale() {
        let translations = translations();

        assert_eq!(translations.translate(Locale::Fr, "common.search"), "Rechercher");
        assert_eq!(translations.translate(Locale::En, "x.y"), "Hello");
    }

    #[test]
    fn missing_keys_fall_back_to_english() {
        let translations = translations();

        assert_eq!(translations.translate(Locale::Fr, "x.y"), "Hello");
        assert_eq!(translations.translate(Locale::Fr, "common.bookNow"), "Book now");
    }

    #[test]
    fn a_locale_with_no_table_always_falls_back() {
        let translations = translations();

        assert_eq!(translations.translate(Locale::Ru, "common.search"), "Search");
    }

    #[test]
    fn unknown_keys_degrade_to_the_raw_key() {
        let translations = translations();

        assert_eq!(translations.translate(Locale::Fr, "common.missing"), "common.missing");
        assert_eq!(translations.translate(Locale::En, "nope"), "nope");
        // a path into a non-object leaf misses rather than panicking
        assert_eq!(translations.translate(Locale::En, "x.y.z"), "x.y.z");
    }

    #[test]
    fn the_english_table_is_mandatory() {
        let mut messages = HashMap::new();
        messages.insert(Locale::Fr, json!({}));

        assert!(Translations::new(messages).is_err());
    }
}
