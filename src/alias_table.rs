//! Token to emoji mapping built from reference records
//!
//! Every recognized token (the literal emoji itself, shortnames, shortname
//! aliases and ASCII glyphs) maps to exactly one emoji. Registration is
//! insert-if-absent: when two records claim the same token, the first one
//! keeps it and the later claim is ignored. Registering the same token twice
//! is therefore idempotent.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::data::{Codepoints, EmojiRecord};
use crate::error::EmojiError;

/// Class of a registered token, deciding which configuration flag gates it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Literal emoji characters, always matchable
    Literal,
    /// Shortnames and shortname aliases, gated by `shortname`
    Shortname,
    /// ASCII glyphs, gated by `ascii`
    Ascii,
}

/// One emoji resolved from a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emoji {
    /// Canonical codepoint sequence
    pub codepoints: Codepoints,
    /// Canonical Unicode string
    pub unicode: String,
}

/// Mapping from token string to emoji, with per-class token views
#[derive(Debug, Default)]
pub struct AliasTable {
    emojis: Vec<Emoji>,
    tokens: HashMap<String, usize>,
    literal: Vec<String>,
    shortname: Vec<String>,
    ascii: Vec<String>,
    entities: HashMap<String, String>,
}

impl AliasTable {
    /// Build the table from reference records
    ///
    /// Fails with [`EmojiError::MalformedRecord`] when a record carries an
    /// empty token.
    pub fn build(records: &[EmojiRecord]) -> Result<Self, EmojiError> {
        let mut table = Self::default();

        for record in records {
            let unicode = record.codepoints.to_unicode();
            let index = table.emojis.len();
            table.emojis.push(Emoji {
                codepoints: record.codepoints.clone(),
                unicode: unicode.clone(),
            });

            table.insert_if_absent(&unicode, index, TokenClass::Literal)?;
            table.insert_if_absent(&record.shortname, index, TokenClass::Shortname)?;
            for alias in &record.aliases {
                table.insert_if_absent(alias, index, TokenClass::Shortname)?;
            }
            for alias in &record.aliases_ascii {
                table.insert_if_absent(alias, index, TokenClass::Ascii)?;
            }

            table
                .entities
                .entry(unicode)
                .or_insert_with(|| record.codepoints.to_entities());
        }

        tracing::debug!(
            emojis = table.emojis.len(),
            tokens = table.tokens.len(),
            "Built emoji alias table"
        );

        Ok(table)
    }

    /// Register `token` unless it is already present
    ///
    /// Returns `true` when the token was newly registered.
    fn insert_if_absent(
        &mut self,
        token: &str,
        index: usize,
        class: TokenClass,
    ) -> Result<bool, EmojiError> {
        if token.is_empty() {
            return Err(EmojiError::MalformedRecord(format!(
                "empty {class:?} token for emoji {}",
                self.emojis[index].codepoints
            )));
        }

        match self.tokens.entry(token.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(index);
                match class {
                    TokenClass::Literal => self.literal.push(token.to_string()),
                    TokenClass::Shortname => self.shortname.push(token.to_string()),
                    TokenClass::Ascii => self.ascii.push(token.to_string()),
                }
                Ok(true)
            }
        }
    }

    /// Resolve a token
    pub fn get(&self, token: &str) -> Option<&Emoji> {
        self.tokens.get(token).map(|&index| &self.emojis[index])
    }

    /// Whether `token` is registered in any class
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no tokens are registered
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens registered under `class`, in registration order
    pub fn tokens(&self, class: TokenClass) -> &[String] {
        match class {
            TokenClass::Literal => &self.literal,
            TokenClass::Shortname => &self.shortname,
            TokenClass::Ascii => &self.ascii,
        }
    }

    /// Numeric character references for a canonical Unicode string
    pub fn entities(&self, unicode: &str) -> Option<&str> {
        self.entities.get(unicode).map(String::as_str)
    }

    /// Dash-joined hex codepoints of a canonical emoji string
    ///
    /// Returns `None` when `unicode` is not a known emoji.
    pub fn codepoints_of(&self, unicode: &str) -> Option<String> {
        if !self.entities.contains_key(unicode) {
            return None;
        }
        self.get(unicode).map(|emoji| emoji.codepoints.to_hex())
    }
}
