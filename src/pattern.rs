//! Composite token patterns
//!
//! Two alternations are compiled from the [`AliasTable`]:
//!
//! - [`MatchExpression`] finds every enabled token in a text node. Which
//!   tokens are enabled depends on the `ascii` and `shortname` flags, so the
//!   expression is rebuilt when either flag changes and only then.
//! - [`EncodingExpression`] finds literal emoji in serialized output so they
//!   can be replaced by numeric character references. It does not depend on
//!   configuration and is compiled once.
//!
//! Alternatives are ordered longest-first. The regex engine reports the
//! leftmost match and, among alternatives starting at the same position, the
//! first listed one, so the longest token wins (`;-)` before `;)`, a keycap
//! sequence before its base digit).

use std::borrow::Cow;

use regex::{Captures, Match, Regex, RegexBuilder};

use crate::alias_table::{AliasTable, TokenClass};
use crate::error::EmojiError;

/// Compiled program size limit; full emoji data yields several thousand
/// alternatives.
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Token classes enabled by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenClasses {
    /// Match ASCII glyphs such as `;)`
    pub ascii: bool,
    /// Match shortnames such as `:wink:`
    pub shortname: bool,
}

fn compile(mut tokens: Vec<&str>) -> Result<Option<Regex>, EmojiError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    tokens.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tokens.dedup();

    let pattern = tokens
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");

    let regex = RegexBuilder::new(&pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .dfa_size_limit(PATTERN_SIZE_LIMIT)
        .build()?;

    Ok(Some(regex))
}

/// Alternation over the tokens enabled by the current flags
#[derive(Debug, Clone)]
pub struct MatchExpression {
    classes: TokenClasses,
    regex: Option<Regex>,
}

impl MatchExpression {
    /// Compile the alternation for `classes`
    ///
    /// Literal emoji are always included; disabled classes are left out of
    /// the alternation entirely.
    pub fn build(table: &AliasTable, classes: TokenClasses) -> Result<Self, EmojiError> {
        let mut tokens: Vec<&str> = table
            .tokens(TokenClass::Literal)
            .iter()
            .map(String::as_str)
            .collect();
        if classes.shortname {
            tokens.extend(table.tokens(TokenClass::Shortname).iter().map(String::as_str));
        }
        if classes.ascii {
            tokens.extend(table.tokens(TokenClass::Ascii).iter().map(String::as_str));
        }

        tracing::debug!(
            ascii = classes.ascii,
            shortname = classes.shortname,
            alternatives = tokens.len(),
            "Compiling emoji match expression"
        );

        Ok(Self {
            classes,
            regex: compile(tokens)?,
        })
    }

    /// Flags this expression was built for
    pub fn classes(&self) -> TokenClasses {
        self.classes
    }

    /// Leftmost token in `text`
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.regex.as_ref().and_then(|regex| regex.find(text))
    }

    /// All non-overlapping tokens in `text`, left to right
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = Match<'t>> + 'r
    where
        't: 'r,
    {
        self.regex
            .iter()
            .flat_map(move |regex| regex.find_iter(text))
    }

    /// Replace every token using `replacement`
    pub fn replace_all<'t, F>(&self, text: &'t str, mut replacement: F) -> Cow<'t, str>
    where
        F: FnMut(&str) -> String,
    {
        match &self.regex {
            Some(regex) => regex.replace_all(text, |caps: &Captures<'_>| replacement(&caps[0])),
            None => Cow::Borrowed(text),
        }
    }
}

/// Alternation over canonical Unicode strings for the entity-encoding pass
#[derive(Debug, Clone)]
pub struct EncodingExpression {
    regex: Option<Regex>,
}

impl EncodingExpression {
    /// Compile the alternation over every literal emoji in `table`
    pub fn build(table: &AliasTable) -> Result<Self, EmojiError> {
        let tokens = table
            .tokens(TokenClass::Literal)
            .iter()
            .map(String::as_str)
            .collect();
        Ok(Self {
            regex: compile(tokens)?,
        })
    }

    /// Replace literal emoji in `text` with numeric character references
    ///
    /// # Examples
    ///
    /// ```
    /// use emoji_converter::alias_table::AliasTable;
    /// use emoji_converter::data::EmojiRecord;
    /// use emoji_converter::pattern::EncodingExpression;
    ///
    /// let records = [EmojiRecord::new("1f609", ":wink:", &[], &[";)"]).unwrap()];
    /// let table = AliasTable::build(&records).unwrap();
    /// let encoder = EncodingExpression::build(&table).unwrap();
    /// assert_eq!(encoder.encode(&table, "hi \u{1f609}"), "hi &#x1f609;");
    /// ```
    pub fn encode<'t>(&self, table: &AliasTable, text: &'t str) -> Cow<'t, str> {
        match &self.regex {
            Some(regex) => regex.replace_all(text, |caps: &Captures<'_>| {
                let matched = &caps[0];
                table.entities(matched).unwrap_or(matched).to_string()
            }),
            None => Cow::Borrowed(text),
        }
    }
}
