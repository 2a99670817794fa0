//! Exclusion rules for emoji substitution
//!
//! Some regions of a document must keep their text verbatim: code samples,
//! pre-formatted blocks, and anything an author explicitly opted out. An
//! element is excluded when:
//!
//! - its tag name is a blacklisted element (`code`, `pre`), or
//! - it carries a blacklisted attribute (`data-no-emoji`, `data-no-emojis`),
//!   whatever the attribute value, or
//! - one of its `class` tokens is blacklisted (`no-emoji`, `no-emojis`,
//!   `no_emoji`, `no_emojis`).
//!
//! Exclusion applies to the whole subtree: the substitutor never descends
//! into an excluded element.

use html5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData};

/// Maximum allowed nesting depth for traversal
/// Prevents stack overflow from deeply nested structures
const MAX_NESTING_DEPTH: usize = 1000;

/// Elements whose content is never converted
pub const BLACKLIST_ELEMENTS: &[&str] = &["code", "pre"];

/// Attributes that opt an element out of conversion
pub const BLACKLIST_ATTRIBUTES: &[&str] = &["data-no-emoji", "data-no-emojis"];

/// Class tokens that opt an element out of conversion
pub const BLACKLIST_CLASSES: &[&str] = &["no-emoji", "no-emojis", "no_emoji", "no_emojis"];

/// Decides which nodes may have their descendants converted
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    /// Maximum allowed nesting depth
    max_depth: usize,
}

impl ExclusionPolicy {
    /// Create a policy with default settings
    pub fn new() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Create a policy with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Whether descendants of `node` are eligible for substitution
    ///
    /// Documents are always eligible. Elements are tested against the
    /// blacklists; every other node kind is eligible (and has no children to
    /// visit anyway).
    pub fn eligible(&self, node: &Handle) -> bool {
        match node.data {
            NodeData::Document => true,
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => self.element_eligible(name.local.as_ref(), &attrs.borrow()),
            _ => true,
        }
    }

    /// Test an element by tag name and attributes
    ///
    /// # Examples
    ///
    /// ```
    /// use emoji_converter::exclusion::ExclusionPolicy;
    ///
    /// let policy = ExclusionPolicy::new();
    /// assert!(!policy.element_eligible("code", &[]));
    /// assert!(policy.element_eligible("span", &[]));
    /// ```
    pub fn element_eligible(&self, tag_name: &str, attrs: &[Attribute]) -> bool {
        if self.is_blacklisted_element(tag_name) {
            return false;
        }

        for attr in attrs {
            let attr_name = attr.name.local.as_ref();
            if self.is_blacklisted_attribute(attr_name) {
                return false;
            }
            if attr_name == "class" && self.has_blacklisted_class(&attr.value) {
                return false;
            }
        }

        true
    }

    /// Check if a tag name is excluded
    pub fn is_blacklisted_element(&self, tag_name: &str) -> bool {
        BLACKLIST_ELEMENTS.contains(&tag_name)
    }

    /// Check if an attribute name opts its element out
    pub fn is_blacklisted_attribute(&self, attr_name: &str) -> bool {
        BLACKLIST_ATTRIBUTES.contains(&attr_name)
    }

    /// Check a `class` attribute value token by token
    ///
    /// Tokens must match exactly; `no-emojiz` or `my-no-emoji` do not opt out.
    pub fn has_blacklisted_class(&self, class_value: &str) -> bool {
        class_value
            .split_ascii_whitespace()
            .any(|token| BLACKLIST_CLASSES.contains(&token))
    }

    /// Validate traversal depth
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if depth is acceptable, or the depth that exceeded
    /// the limit.
    pub fn check_depth(&self, depth: usize) -> Result<(), usize> {
        if depth > self.max_depth {
            Err(depth)
        } else {
            Ok(())
        }
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
