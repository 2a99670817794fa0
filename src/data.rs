//! Emoji reference records
//!
//! Reference data follows the emojione `emoji.json` layout: an object keyed by
//! emoji name, where each value describes one emoji:
//!
//! ```json
//! {
//!   "wink": {
//!     "unicode": "1f609",
//!     "shortname": ":wink:",
//!     "aliases": [],
//!     "aliases_ascii": [";)", ";-)"]
//!   }
//! }
//! ```
//!
//! The keys carry no meaning for conversion and are discarded, but their order
//! is kept so that alias registration is deterministic. A plain JSON array of
//! records is accepted as well.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::EmojiError;

/// Ordered, non-empty sequence of Unicode scalar values defining one emoji
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Codepoints(Vec<char>);

impl Codepoints {
    /// Build from scalar values, rejecting an empty sequence
    pub fn new(chars: Vec<char>) -> Result<Self, EmojiError> {
        if chars.is_empty() {
            return Err(EmojiError::MalformedRecord(
                "codepoint sequence is empty".to_string(),
            ));
        }
        Ok(Self(chars))
    }

    /// Scalar values in order
    pub fn chars(&self) -> &[char] {
        &self.0
    }

    /// Canonical Unicode string (the literal emoji)
    pub fn to_unicode(&self) -> String {
        self.0.iter().collect()
    }

    /// Dash-joined lowercase hex, at least four digits per codepoint
    ///
    /// This is the form used for asset file names, e.g. `0033-20e3`.
    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .map(|&c| format!("{:04x}", u32::from(c)))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// HTML numeric character references, one `&#xHHHH;` per codepoint
    pub fn to_entities(&self) -> String {
        self.0
            .iter()
            .map(|&c| format!("&#x{:04x};", u32::from(c)))
            .collect()
    }
}

impl FromStr for Codepoints {
    type Err = EmojiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = s
            .split('-')
            .map(|part| {
                u32::from_str_radix(part.trim(), 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        EmojiError::MalformedRecord(format!(
                            "invalid codepoint '{part}' in '{s}'"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(chars)
    }
}

impl TryFrom<String> for Codepoints {
    type Error = EmojiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Codepoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One emoji as described by the reference data
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmojiRecord {
    /// Canonical codepoint sequence
    #[serde(rename = "unicode")]
    pub codepoints: Codepoints,
    /// Primary shortname, e.g. `:wink:`
    pub shortname: String,
    /// Additional shortnames
    pub aliases: Vec<String>,
    /// ASCII glyphs, e.g. `;)`
    pub aliases_ascii: Vec<String>,
}

impl EmojiRecord {
    /// Build a record from its external (dash-joined hex) codepoint form
    ///
    /// # Examples
    ///
    /// ```
    /// use emoji_converter::data::EmojiRecord;
    ///
    /// let record = EmojiRecord::new("1f609", ":wink:", &[], &[";)"]).unwrap();
    /// assert_eq!(record.codepoints.to_unicode(), "\u{1f609}");
    /// ```
    pub fn new(
        unicode: &str,
        shortname: &str,
        aliases: &[&str],
        aliases_ascii: &[&str],
    ) -> Result<Self, EmojiError> {
        Ok(Self {
            codepoints: unicode.parse()?,
            shortname: shortname.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            aliases_ascii: aliases_ascii.iter().map(|s| s.to_string()).collect(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceData {
    Keyed(serde_json::Map<String, serde_json::Value>),
    List(Vec<serde_json::Value>),
}

/// Decode reference records from JSON
///
/// Any missing field or invalid codepoint fails the whole load; a converter
/// is never built from partial data.
pub fn load_reference_json(json: &str) -> Result<Vec<EmojiRecord>, EmojiError> {
    match serde_json::from_str::<ReferenceData>(json)? {
        ReferenceData::List(values) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<EmojiRecord>(value)
                    .map_err(|e| EmojiError::MalformedRecord(format!("record {index}: {e}")))
            })
            .collect(),
        ReferenceData::Keyed(entries) => entries
            .into_iter()
            .map(|(name, value)| {
                serde_json::from_value::<EmojiRecord>(value).map_err(|e| {
                    EmojiError::MalformedRecord(format!("entry '{name}': {e}"))
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_single_codepoint() {
        let cps: Codepoints = "1f609".parse().unwrap();
        assert_eq!(cps.chars(), &['\u{1f609}']);
        assert_eq!(cps.to_unicode(), "\u{1f609}");
        assert_eq!(cps.to_entities(), "&#x1f609;");
    }

    #[test]
    fn test_parse_keycap_sequence_keeps_four_digits() {
        let cps: Codepoints = "0033-20e3".parse().unwrap();
        assert_eq!(cps.to_unicode(), "3\u{20e3}");
        assert_eq!(cps.to_hex(), "0033-20e3");
        assert_eq!(cps.to_entities(), "&#x0033;&#x20e3;");
    }

    #[test]
    fn test_uppercase_hex_is_normalized() {
        let cps: Codepoints = "1F1FA-1F1F8".parse().unwrap();
        assert_eq!(cps.to_hex(), "1f1fa-1f1f8");
    }

    #[test]
    fn test_reject_empty_and_invalid_codepoints() {
        assert!("".parse::<Codepoints>().is_err());
        assert!("zz".parse::<Codepoints>().is_err());
        // Surrogates are not Unicode scalar values
        assert!("d800".parse::<Codepoints>().is_err());
        assert!("1f609-".parse::<Codepoints>().is_err());
    }

    #[test]
    fn test_load_keyed_reference_data_preserves_order() {
        let json = r#"{
            "zzz": {"unicode": "1f604", "shortname": ":smile:", "aliases": [], "aliases_ascii": [":)"]},
            "aaa": {"unicode": "1f609", "shortname": ":wink:", "aliases": [], "aliases_ascii": [";)"]}
        }"#;
        let records = load_reference_json(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].shortname, ":smile:");
        assert_eq!(records[1].shortname, ":wink:");
    }

    #[test]
    fn test_load_list_reference_data() {
        let json = r#"[{"unicode": "2764", "shortname": ":heart:", "aliases": [], "aliases_ascii": ["<3"]}]"#;
        let records = load_reference_json(json).unwrap();
        assert_eq!(records[0].codepoints.to_unicode(), "\u{2764}");
        assert_eq!(records[0].aliases_ascii, vec!["<3".to_string()]);
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let json = r#"{"wink": {"unicode": "1f609", "shortname": ":wink:", "aliases": []}}"#;
        match load_reference_json(json) {
            Err(EmojiError::MalformedRecord(message)) => assert!(message.contains("wink")),
            other => panic!("Expected MalformedRecord, got: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_codepoint_in_data_is_fatal() {
        let json = r#"[{"unicode": "xyz", "shortname": ":x:", "aliases": [], "aliases_ascii": []}]"#;
        assert!(matches!(
            load_reference_json(json),
            Err(EmojiError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_missing_field_in_list_names_the_record() {
        let json = r#"[
            {"unicode": "1f609", "shortname": ":wink:", "aliases": [], "aliases_ascii": []},
            {"unicode": "1f604", "shortname": ":smile:", "aliases": []}
        ]"#;
        match load_reference_json(json) {
            Err(EmojiError::MalformedRecord(message)) => {
                assert!(message.contains("record 1"), "{message}");
                assert!(message.contains("aliases_ascii"), "{message}");
            }
            other => panic!("Expected MalformedRecord, got: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_hex_form_parses_back_to_same_sequence(
            chars in prop::collection::vec(any::<char>(), 1..5),
        ) {
            let cps = Codepoints::new(chars.clone()).unwrap();
            let reparsed: Codepoints = cps.to_hex().parse().unwrap();
            prop_assert_eq!(reparsed.chars(), chars.as_slice());
        }
    }
}
