//! Shareable locations for analyzed words.
//!
//! A word maps to the path `/w/<slug>`. The slug is the percent-encoded word
//! with encoded spaces written as `+`, so `"ice cream"` becomes
//! `/w/ice+cream`. Decoding accepts both `+` and `%2B` as spaces.

use std::fmt;

use log::debug;

/// Path prefix of word locations.
pub const WORD_PATH_PREFIX: &str = "/w/";

/// The location of an analyzed word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordLocation {
    word: String,
}

impl WordLocation {
    /// Creates the location for `word`.
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }

    /// Recovers a location from a slug or a full `/w/<slug>` path.
    ///
    /// Returns `None` when the slug is empty or does not decode as UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// # use etymon::location::WordLocation;
    /// let location = WordLocation::decode("/w/ice+cream").expect("valid slug");
    /// assert_eq!(location.word(), "ice cream");
    /// ```
    pub fn decode(path_or_slug: &str) -> Option<Self> {
        let slug = path_or_slug
            .strip_prefix(WORD_PATH_PREFIX)
            .unwrap_or(path_or_slug);
        if slug.is_empty() {
            return None;
        }

        let spaced = slug.replace('+', " ");
        match urlencoding::decode(&spaced) {
            Ok(decoded) => Some(Self::new(decoded.replace('+', " "))),
            Err(err) => {
                debug!(slug, err:%; "Ignoring undecodable word slug");
                None
            }
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Returns the encoded slug.
    pub fn slug(&self) -> String {
        urlencoding::encode(&self.word).replace("%20", "+")
    }

    /// Returns the full path, e.g. `/w/ice+cream`.
    pub fn path(&self) -> String {
        format!("{WORD_PATH_PREFIX}{}", self.slug())
    }
}

impl fmt::Display for WordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_word() {
        let location = WordLocation::new("deconstructor");
        assert_eq!(location.path(), "/w/deconstructor");
    }

    #[test]
    fn test_spaces_become_plus() {
        let location = WordLocation::new("ice cream");
        assert_eq!(location.slug(), "ice+cream");
        assert_eq!(location.to_string(), "/w/ice+cream");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let location = WordLocation::new("rock&roll/é");
        assert_eq!(location.slug(), "rock%26roll%2F%C3%A9");
    }

    #[test]
    fn test_decode_plus_variants() {
        assert_eq!(
            WordLocation::decode("ice+cream").map(|l| l.word().to_string()),
            Some("ice cream".to_string())
        );
        assert_eq!(
            WordLocation::decode("/w/ice%2Bcream").map(|l| l.word().to_string()),
            Some("ice cream".to_string())
        );
        assert_eq!(
            WordLocation::decode("caf%C3%A9").map(|l| l.word().to_string()),
            Some("café".to_string())
        );
    }

    #[test]
    fn test_decode_rejects_empty_and_invalid() {
        assert!(WordLocation::decode("/w/").is_none());
        assert!(WordLocation::decode("%FF").is_none());
    }
}
