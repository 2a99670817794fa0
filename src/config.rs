//! Converter configuration
//!
//! The effective configuration ([`EmojiConfig`]) is always derived from a
//! baseline plus a set of optional overrides ([`ConfigOverrides`]). Unset
//! override fields fall back to the baseline, so applying the same overrides
//! twice yields the same configuration as applying them once.
//!
//! Site configuration is read from the `emoji` section of a YAML document:
//!
//! ```yaml
//! emoji:
//!   format: emojione-svg
//!   ascii: true
//!   shortname: true
//!   src: /assets/emoji
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EmojiError;
use crate::pattern::TokenClasses;

/// Format names accepted in configuration
pub const SUPPORTED_FORMATS: &[&str] = &[
    "html",
    "unicode",
    "emojione-png",
    "emojione-svg",
    "emojione-svg-embed",
];

/// Output representation for matched tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Numeric character references (`&#x1f609;`)
    #[default]
    Html,
    /// Raw Unicode characters
    Unicode,
    /// `<img>` tag pointing at a PNG asset
    ImagePng,
    /// `<img>` tag pointing at an SVG asset
    ImageSvg,
    /// SVG document inlined into the page
    InlineSvg,
}

impl Format {
    /// Configuration name of this format
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Unicode => "unicode",
            Format::ImagePng => "emojione-png",
            Format::ImageSvg => "emojione-svg",
            Format::InlineSvg => "emojione-svg-embed",
        }
    }
}

impl FromStr for Format {
    type Err = EmojiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Format::Html),
            "unicode" => Ok(Format::Unicode),
            "emojione-png" => Ok(Format::ImagePng),
            "emojione-svg" => Ok(Format::ImageSvg),
            "emojione-svg-embed" => Ok(Format::InlineSvg),
            other => Err(EmojiError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective converter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiConfig {
    /// Output format
    pub format: Format,
    /// Match ASCII glyphs such as `;)`
    pub ascii: bool,
    /// Match shortnames such as `:wink:`
    pub shortname: bool,
    /// Asset root overriding the default CDN for image and SVG formats
    pub src: Option<String>,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            format: Format::Html,
            ascii: false,
            shortname: true,
            src: None,
        }
    }
}

impl EmojiConfig {
    /// Token classes this configuration enables
    pub fn token_classes(&self) -> TokenClasses {
        TokenClasses {
            ascii: self.ascii,
            shortname: self.shortname,
        }
    }
}

/// Partial configuration; `None` fields keep the baseline value
///
/// The format is kept as a string until applied, so an unknown format is
/// reported as [`EmojiError::UnsupportedFormat`] at configuration time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    /// Output format name
    pub format: Option<String>,
    /// Match ASCII glyphs
    pub ascii: Option<bool>,
    /// Match shortnames
    pub shortname: Option<bool>,
    /// Asset root
    pub src: Option<String>,
}

impl ConfigOverrides {
    /// Empty overrides (keep everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the output format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Override ASCII glyph matching
    pub fn ascii(mut self, ascii: bool) -> Self {
        self.ascii = Some(ascii);
        self
    }

    /// Override shortname matching
    pub fn shortname(mut self, shortname: bool) -> Self {
        self.shortname = Some(shortname);
        self
    }

    /// Override the asset root
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Merge onto `base`, validating the format
    ///
    /// # Examples
    ///
    /// ```
    /// use emoji_converter::config::{ConfigOverrides, EmojiConfig, Format};
    ///
    /// let config = ConfigOverrides::new()
    ///     .format("unicode")
    ///     .apply_to(&EmojiConfig::default())
    ///     .unwrap();
    /// assert_eq!(config.format, Format::Unicode);
    /// assert!(config.shortname);
    ///
    /// assert!(ConfigOverrides::new().format("gif").apply_to(&config).is_err());
    /// ```
    pub fn apply_to(&self, base: &EmojiConfig) -> Result<EmojiConfig, EmojiError> {
        let format = match &self.format {
            Some(name) => name.parse()?,
            None => base.format,
        };

        Ok(EmojiConfig {
            format,
            ascii: self.ascii.unwrap_or(base.ascii),
            shortname: self.shortname.unwrap_or(base.shortname),
            src: self.src.clone().or_else(|| base.src.clone()),
        })
    }
}

/// Site configuration document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Emoji section; absent means defaults
    pub emoji: Option<ConfigOverrides>,
}

impl SiteConfig {
    /// Parse a YAML site configuration
    ///
    /// Keys other than `emoji` are ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self, EmojiError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Overrides carried by the `emoji` section
    pub fn overrides(&self) -> ConfigOverrides {
        self.emoji.clone().unwrap_or_default()
    }
}
