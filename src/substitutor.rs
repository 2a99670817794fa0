//! Tree walk replacing tokens in text nodes
//!
//! The walk starts at the document node and visits children by index, so the
//! child list can be spliced while it is being enumerated. Excluded elements
//! (see [`crate::exclusion`]) are skipped together with their subtree.
//!
//! Text renderers rewrite each text node in place. Structural renderers turn
//! the first token of a text node into an element: the node is replaced by
//! `[before, element, after]` (empty fragments omitted) and the walk resumes
//! after the inserted nodes, so the `after` fragment is not scanned again.

use std::borrow::Cow;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, NodeData};

use crate::alias_table::AliasTable;
use crate::assets::AssetFetcher;
use crate::error::EmojiError;
use crate::exclusion::ExclusionPolicy;
use crate::pattern::MatchExpression;
use crate::renderer::{Renderer, text_node};

/// One substitution pass over a document tree
///
/// Structural renderers insert elements under any eligible parent,
/// including raw-text and RCDATA elements (`title`, `textarea`, `script`,
/// `style`). Markup written there re-parses as literal text, so such
/// parents should be opted out with the `no-emoji` class or attributes.
pub struct TreeSubstitutor<'a> {
    pub policy: &'a ExclusionPolicy,
    pub matcher: &'a MatchExpression,
    pub table: &'a AliasTable,
    pub renderer: &'a Renderer,
    pub fetcher: &'a dyn AssetFetcher,
}

impl TreeSubstitutor<'_> {
    /// Substitute tokens below `node`, returning the number of replacements
    ///
    /// # Errors
    ///
    /// Fails with `NestingTooDeep` past the policy's depth limit, and with
    /// the renderer's error when an element cannot be built.
    pub fn substitute(&self, node: &Handle, depth: usize) -> Result<usize, EmojiError> {
        self.policy
            .check_depth(depth)
            .map_err(EmojiError::NestingTooDeep)?;

        if !self.policy.eligible(node) {
            return Ok(0);
        }

        let mut count = 0;
        let mut index = 0;
        loop {
            let Some(child) = node.children.borrow().get(index).cloned() else {
                break;
            };

            match child.data {
                NodeData::Text { .. } if self.renderer.is_structural() => {
                    match self.split_first(node, index, &child)? {
                        Some(inserted) => {
                            count += 1;
                            index += inserted;
                        }
                        None => index += 1,
                    }
                }
                NodeData::Text { .. } => {
                    count += self.replace_text(&child);
                    index += 1;
                }
                _ => {
                    count += self.substitute(&child, depth + 1)?;
                    index += 1;
                }
            }
        }

        Ok(count)
    }

    /// Rewrite every token of a text node in place
    fn replace_text(&self, node: &Handle) -> usize {
        let NodeData::Text { ref contents } = node.data else {
            return 0;
        };

        let mut hits = 0;
        let replaced = {
            let text = contents.borrow();
            let result = self.matcher.replace_all(&text, |token| {
                hits += 1;
                match self.table.get(token) {
                    Some(emoji) => self.renderer.replacement_text(emoji),
                    None => token.to_string(),
                }
            });
            match result {
                Cow::Borrowed(_) => None,
                Cow::Owned(replaced) => Some(replaced),
            }
        };

        if let Some(replaced) = replaced {
            tracing::trace!(replacements = hits, "Replaced tokens in text node");
            *contents.borrow_mut() = StrTendril::from_slice(&replaced);
        }

        hits
    }

    /// Replace the text node at `index` with `[before, element, after]`
    ///
    /// Returns the number of nodes inserted, or `None` when the text holds
    /// no token.
    fn split_first(
        &self,
        parent: &Handle,
        index: usize,
        node: &Handle,
    ) -> Result<Option<usize>, EmojiError> {
        let NodeData::Text { ref contents } = node.data else {
            return Ok(None);
        };

        let (before, token, after) = {
            let text = contents.borrow();
            let Some(found) = self.matcher.find(&text) else {
                return Ok(None);
            };
            (
                text[..found.start()].to_string(),
                found.as_str().to_string(),
                text[found.end()..].to_string(),
            )
        };

        let Some(emoji) = self.table.get(&token) else {
            return Ok(None);
        };
        let element = self.renderer.element(emoji, self.fetcher)?;

        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(text_node(&before));
        }
        replacement.push(element);
        if !after.is_empty() {
            replacement.push(text_node(&after));
        }

        for inserted in &replacement {
            inserted.parent.set(Some(Rc::downgrade(parent)));
        }
        node.parent.set(None);

        tracing::trace!(token = %token, codepoints = %emoji.codepoints, "Inserted emoji element");

        let inserted = replacement.len();
        parent
            .children
            .borrow_mut()
            .splice(index..=index, replacement);

        Ok(Some(inserted))
    }
}
