//! HTML parsing and serialization using html5ever
//!
//! Conversion works on a `markup5ever_rcdom` tree. Parsing follows the WHATWG
//! HTML5 algorithm, so malformed markup is recovered the same way a browser
//! would recover it, and serialization writes the (possibly mutated) tree
//! back to HTML text.
//!
//! # Documents and fragments
//!
//! Most input to the converter is a fragment (rendered Markdown, a template
//! snippet). Fragments are parsed with the fragment algorithm in a `<body>`
//! context, so comments, leading whitespace and stray head elements stay
//! where the author put them and no implicit wrapper is added. Input is
//! classified by its first non-whitespace characters (comments in front of
//! a doctype or `<html>` tag are skipped):
//!
//! | Input starts with       | Parsed as | Serialized                        |
//! |-------------------------|-----------|-----------------------------------|
//! | `<!doctype`, `<html`    | document  | whole tree                        |
//! | `<body`                 | document  | the `body` element itself         |
//! | anything else           | fragment  | children of the fragment root     |
//!
//! Leading whitespace dropped by the document algorithm is written back in
//! front of the serialized output.
//!
//! # Examples
//!
//! ```rust
//! use emoji_converter::document::parse_html;
//!
//! let document = parse_html("<!-- note -->\n<p>Hello <em>world</em></p>");
//! assert_eq!(document.serialize().unwrap(), "<!-- note -->\n<p>Hello <em>world</em></p>");
//!
//! let full = parse_html("<!DOCTYPE html><html><body><p>Hi</p></body></html>");
//! assert!(full.serialize().unwrap().starts_with("<!DOCTYPE html>"));
//! ```

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{QualName, local_name, ns, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::EmojiError;

/// HTML whitespace as defined by the tokenizer
const HTML_WHITESPACE: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// How the input was parsed and which part of the tree is written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Document,
    Body,
    Fragment,
}

/// Parsed HTML tree owned by the caller of a conversion
pub struct HtmlDocument {
    dom: RcDom,
    scope: Scope,
    leading: String,
}

/// Parse HTML text into a document tree
///
/// Parsing never fails: html5ever recovers from any malformed markup.
pub fn parse_html(input: &str) -> HtmlDocument {
    let content = input.trim_start_matches(HTML_WHITESPACE);
    let leading = input[..input.len() - content.len()].to_string();

    match classify(content) {
        Scope::Fragment => {
            let context = QualName::new(None, ns!(html), local_name!("body"));
            let dom = parse_fragment(RcDom::default(), Default::default(), context, vec![], false)
                .one(input);
            HtmlDocument {
                dom,
                scope: Scope::Fragment,
                leading: String::new(),
            }
        }
        scope => HtmlDocument {
            dom: parse_document(RcDom::default(), Default::default()).one(input),
            scope,
            leading,
        },
    }
}

/// Parse an HTML or SVG asset and detach its first element named `tag`
///
/// The returned node has no parent and can be inserted into another tree.
pub fn parse_detached_element(input: &str, tag: &str) -> Option<Handle> {
    let dom = parse_document(RcDom::default(), Default::default()).one(input);
    let element = find_element(&dom.document, tag)?;
    detach(&element);
    Some(element)
}

fn classify(content: &str) -> Scope {
    // Comments may precede the doctype of a full document
    let mut rest = content;
    while let Some(comment) = rest.strip_prefix("<!--") {
        let Some(end) = comment.find("-->") else {
            break;
        };
        rest = comment[end + 3..].trim_start_matches(HTML_WHITESPACE);
    }

    let prefix = rest
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();

    if prefix.starts_with("<!doctype") || starts_with_tag(&prefix, "html") {
        Scope::Document
    } else if rest.len() == content.len() && starts_with_tag(&prefix, "body") {
        Scope::Body
    } else {
        Scope::Fragment
    }
}

/// Whether `prefix` opens a `<name>` tag (not `<names>` or `<name-x>`)
fn starts_with_tag(prefix: &str, name: &str) -> bool {
    let Some(rest) = prefix
        .strip_prefix('<')
        .and_then(|rest| rest.strip_prefix(name))
    else {
        return false;
    };
    match rest.chars().next() {
        None => true,
        Some(c) => c == '>' || c == '/' || HTML_WHITESPACE.contains(&c),
    }
}

/// Depth-first search for the first element with local name `tag`
pub(crate) fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = node.data {
        if name.local.as_ref() == tag {
            return Some(node.clone());
        }
    }

    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Remove `node` from its parent's children
fn detach(node: &Handle) {
    let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) else {
        return;
    };
    parent
        .children
        .borrow_mut()
        .retain(|child| !std::rc::Rc::ptr_eq(child, node));
}

impl HtmlDocument {
    /// Root node of the tree (the document node)
    pub fn root(&self) -> Handle {
        self.dom.document.clone()
    }

    /// Whether the output omits the document wrapper
    pub fn is_fragment(&self) -> bool {
        self.scope != Scope::Document
    }

    /// Serialize the tree back to HTML text
    ///
    /// # Errors
    ///
    /// Returns `EmojiError::Serialize` if the html5ever serializer fails.
    pub fn serialize(&self) -> Result<String, EmojiError> {
        let mut output = self.leading.clone().into_bytes();

        match self.scope {
            Scope::Document => {
                write_node(&mut output, self.dom.document.clone(), TraversalScope::ChildrenOnly(None))?
            }
            Scope::Body => {
                if let Some(body) = find_element(&self.dom.document, "body") {
                    write_node(&mut output, body, TraversalScope::IncludeNode)?;
                }
            }
            Scope::Fragment => {
                // The fragment algorithm hangs every parsed node below a
                // synthetic `html` root.
                if let Some(root) = find_element(&self.dom.document, "html") {
                    write_node(&mut output, root, TraversalScope::ChildrenOnly(None))?;
                }
            }
        }

        String::from_utf8(output).map_err(|e| {
            EmojiError::Serialize(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

fn write_node(output: &mut Vec<u8>, node: Handle, scope: TraversalScope) -> Result<(), EmojiError> {
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    serialize(output, &SerializableHandle::from(node), opts).map_err(EmojiError::Serialize)
}
