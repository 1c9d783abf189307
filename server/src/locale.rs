use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BackendError;

/// The locales the site is served in.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Es,
    De,
    Fr,
    It,
    Ru,
    Pl,
}

/// The reference locale. Its message table must always exist.
pub const DEFAULT_LOCALE: Locale = Locale::En;

pub const ALL_LOCALES: [Locale; 7] = [
    Locale::En,
    Locale::Es,
    Locale::De,
    Locale::Fr,
    Locale::It,
    Locale::Ru,
    Locale::Pl,
];

/// Path prefixes that are never locale-normalized.
const ASSET_PREFIXES: [&str; 7] = [
    "/assets",
    "/api",
    "/images",
    "/videos",
    "/favicon.ico",
    "/robots.txt",
    "/sitemap.xml",
];

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::It => "it",
            Locale::Ru => "ru",
            Locale::Pl => "pl",
        }
    }
}

impl FromStr for Locale {
    type Err = BackendError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            "de" => Ok(Locale::De),
            "fr" => Ok(Locale::Fr),
            "it" => Ok(Locale::It),
            "ru" => Ok(Locale::Ru),
            "pl" => Ok(Locale::Pl),
            _ => Err(BackendError::UnknownLocale {
                code: code.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks whether a path serves an asset rather than a page. Asset paths
/// are matched by prefix (on whole segments) or by a file extension on the
/// final segment, and are excluded from locale normalization.
pub fn is_asset_path(path: &str) -> bool {
    if ASSET_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{}/", prefix)))
    {
        return true;
    }

    match path.rsplit('/').next() {
        Some(last) => match last.rsplit_once('.') {
            Some((_, extension)) => {
                !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric())
            }
            None => false,
        },
        None => false,
    }
}

/// Collapses a doubled locale prefix into its canonical form.
///
/// A path starting with two consecutive locale segments is rewritten to a
/// single prefix: equal segments keep one copy, differing segments keep the
/// second (the later choice wins). Asset paths and paths without a doubled
/// prefix return `None` and pass through untouched.
///
/// ```
/// use backend::locale::normalize_path;
/// assert_eq!(normalize_path("/en/es/must-see"), Some("/es/must-see".to_owned()));
/// assert_eq!(normalize_path("/es/es"), Some("/es".to_owned()));
/// assert_eq!(normalize_path("/es/must-see"), None);
/// ```
pub fn normalize_path(path: &str) -> Option<String> {
    if is_asset_path(path) {
        return None;
    }

    let stripped = path.strip_prefix('/')?;
    let (first, after_first) = match stripped.split_once('/') {
        Some((segment, rest)) => (segment, rest),
        None => return None,
    };
    let first: Locale = first.parse().ok()?;

    let (second, remainder) = match after_first.split_once('/') {
        Some((segment, rest)) => (segment, Some(rest)),
        None => (after_first, None),
    };
    let second: Locale = second.parse().ok()?;

    let target = if first == second { first } else { second };

    Some(match remainder {
        Some(rest) => format!("/{}/{}", target.as_str(), rest),
        None => format!("/{}", target.as_str()),
    })
}
