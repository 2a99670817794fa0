//! Output strategies for matched tokens
//!
//! Every output format shares one match pass; what differs is what a match
//! turns into:
//!
//! | Format               | Renderer               | Effect on the text node        |
//! |----------------------|------------------------|--------------------------------|
//! | `unicode`            | `Unicode`              | token replaced by the emoji    |
//! | `html`               | `HtmlEntities`         | as `unicode`, then entity pass |
//! | `emojione-png`/`-svg`| `Image`                | node split around an `<img>`   |
//! | `emojione-svg-embed` | `InlineSvg`            | node split around an `<svg>`   |
//!
//! Text renderers replace every token in place. Structural renderers build
//! one element per text node; see [`crate::substitutor`] for how the node is
//! split.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};

use crate::alias_table::Emoji;
use crate::assets::AssetFetcher;
use crate::config::{EmojiConfig, Format};
use crate::document::parse_detached_element;
use crate::error::EmojiError;

/// Asset root used when no `src` is configured
pub const DEFAULT_CDN_ROOT: &str = "https://cdn.jsdelivr.net/emojione/assets";

/// Class set on generated `img` and inlined `svg` elements
pub const EMOJI_CLASS: &str = "emojione";

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Image file type for linked assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// PNG raster image
    Png,
    /// SVG vector image
    Svg,
}

impl ImageKind {
    /// File extension (and CDN directory name)
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Svg => "svg",
        }
    }
}

/// Substitution strategy selected by the output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    /// Replace tokens with the Unicode emoji
    Unicode,
    /// Replace tokens with the Unicode emoji; the converter encodes them
    /// as numeric character references after serialization
    HtmlEntities,
    /// Replace the first token with an `<img>` element
    Image {
        /// Linked file type
        kind: ImageKind,
        /// Asset root override
        src: Option<String>,
    },
    /// Replace the first token with the fetched SVG document
    InlineSvg {
        /// Asset root override
        src: Option<String>,
    },
}

impl Renderer {
    /// Strategy for a configuration
    pub fn for_config(config: &EmojiConfig) -> Self {
        let src = config.src.clone();
        match config.format {
            Format::Html => Renderer::HtmlEntities,
            Format::Unicode => Renderer::Unicode,
            Format::ImagePng => Renderer::Image {
                kind: ImageKind::Png,
                src,
            },
            Format::ImageSvg => Renderer::Image {
                kind: ImageKind::Svg,
                src,
            },
            Format::InlineSvg => Renderer::InlineSvg { src },
        }
    }

    /// Whether matches become elements rather than replacement text
    pub fn is_structural(&self) -> bool {
        matches!(self, Renderer::Image { .. } | Renderer::InlineSvg { .. })
    }

    /// Replacement text for a match (text renderers)
    pub fn replacement_text(&self, emoji: &Emoji) -> String {
        emoji.unicode.clone()
    }

    /// Element standing in for a match (structural renderers)
    ///
    /// # Errors
    ///
    /// `InlineSvg` fails with `AssetUnavailable` when the fetcher fails and
    /// with `InvalidAsset` when the bytes hold no usable `svg` element.
    /// Text renderers fail with `InvalidInput`.
    pub fn element(&self, emoji: &Emoji, fetcher: &dyn AssetFetcher) -> Result<Handle, EmojiError> {
        match self {
            Renderer::Image { kind, src } => {
                let location = asset_location(src.as_deref(), kind.extension(), emoji);
                Ok(image_element(emoji, &location))
            }
            Renderer::InlineSvg { src } => {
                let location = asset_location(src.as_deref(), ImageKind::Svg.extension(), emoji);
                inline_svg_element(emoji, &location, fetcher)
            }
            Renderer::Unicode | Renderer::HtmlEntities => Err(EmojiError::InvalidInput(
                "text renderers do not build elements".to_string(),
            )),
        }
    }
}

/// Location of the asset for `emoji`
///
/// With `src` configured: `<src>/<codepoints>.<ext>`. Otherwise the default
/// CDN layout `https://cdn.jsdelivr.net/emojione/assets/<ext>/<codepoints>.<ext>`.
///
/// # Examples
///
/// ```
/// use emoji_converter::alias_table::Emoji;
/// use emoji_converter::renderer::asset_location;
///
/// let emoji = Emoji { codepoints: "0033-20e3".parse().unwrap(), unicode: "3\u{20e3}".into() };
/// assert_eq!(
///     asset_location(None, "svg", &emoji),
///     "https://cdn.jsdelivr.net/emojione/assets/svg/0033-20e3.svg"
/// );
/// assert_eq!(asset_location(Some("/emoji/"), "png", &emoji), "/emoji/0033-20e3.png");
/// ```
pub fn asset_location(src: Option<&str>, extension: &str, emoji: &Emoji) -> String {
    let hex = emoji.codepoints.to_hex();
    match src {
        Some(root) => format!("{}/{hex}.{extension}", root.trim_end_matches('/')),
        None => format!("{DEFAULT_CDN_ROOT}/{extension}/{hex}.{extension}"),
    }
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from_slice(value),
    }
}

/// Set `name` on an element, replacing an existing value
pub(crate) fn set_attribute(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|attr| attr.name.local.as_ref() == name) {
            Some(attr) => attr.value = StrTendril::from_slice(value),
            None => attrs.push(attribute(name, value)),
        }
    }
}

fn image_element(emoji: &Emoji, location: &str) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("img")),
        attrs: RefCell::new(vec![
            attribute("class", EMOJI_CLASS),
            attribute("alt", &emoji.unicode),
            attribute("src", location),
        ]),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

fn inline_svg_element(
    emoji: &Emoji,
    location: &str,
    fetcher: &dyn AssetFetcher,
) -> Result<Handle, EmojiError> {
    let bytes = fetcher.fetch(location)?;
    let source = String::from_utf8(bytes).map_err(|e| EmojiError::InvalidAsset {
        location: location.to_string(),
        reason: e.to_string(),
    })?;

    let svg = parse_detached_element(&source, "svg").ok_or_else(|| EmojiError::InvalidAsset {
        location: location.to_string(),
        reason: "no svg element found".to_string(),
    })?;

    set_attribute(&svg, "class", EMOJI_CLASS);
    set_attribute(&svg, "alt", &emoji.unicode);
    Ok(svg)
}

/// New text node holding `text`
pub(crate) fn text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    })
}
