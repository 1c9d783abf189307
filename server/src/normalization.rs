/// Normalizes free-text search input by stripping surrounding whitespace,
/// decomposing it into Unicode Normalization Form D, and lowercasing it, so
/// that queries and catalog text compare consistently.
///
/// ```
/// use backend::normalization::normalize_query;
/// assert_eq!(normalize_query(" Teide "), "teide");
/// ```
pub fn normalize_query(query: impl AsRef<str>) -> String {
    use unicode_normalization::UnicodeNormalization;

    query.as_ref().trim().nfd().collect::<String>().to_lowercase()
}
