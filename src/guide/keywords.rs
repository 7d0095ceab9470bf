//! The fixed keyword vocabulary and the genre mapping onto it.
//!
//! The consuming guide importer validates keyword references against the
//! full enumeration, so the whole table is emitted on every run no matter
//! which genres actually occur. The genre mapping is a closed vocabulary;
//! unknown genre strings map to the General keyword.

/// Keyword id assigned to genres outside the closed vocabulary.
pub const DEFAULT_KEYWORD: &str = "k1";

/// The full keyword table: `(id, word)` pairs, emitted in this order.
pub const KEYWORDS: &[(&str, &str)] = &[
    ("k1", "General"),
    ("k100", "All"),
    ("k101", "Action"),
    ("k102", "Comedy"),
    ("k103", "Documentary"),
    ("k104", "Series"),
    ("k105", "Educational"),
    ("k106", "Family"),
    ("k107", "Movies"),
    ("k108", "Music"),
    ("k109", "News"),
    ("k110", "Reality"),
    ("k111", "Sitcom"),
    ("k112", "Sports"),
    ("k113", "Other"),
];

/// Maps a display genre onto its keyword id.
///
/// Anything outside the closed set, including empty and `"N/A"`, maps to
/// [`DEFAULT_KEYWORD`].
#[must_use]
pub fn keyword_for_genre(genre: &str) -> &'static str {
    match genre {
        "News" => "k109",
        "Sports" => "k112",
        "Movies" => "k107",
        "Series" => "k104",
        "Documentary" => "k103",
        "Other" => "k113",
        _ => DEFAULT_KEYWORD,
    }
}
