//! Emoji converter - configuration lifecycle and conversion entry points
//!
//! A [`Converter`] owns everything a conversion needs: the alias table built
//! from reference data, the compiled match and encoding expressions, the
//! exclusion policy, the renderer for the current format and the asset
//! fetcher used by embedded SVG output.
//!
//! # Configuration lifecycle
//!
//! Construction merges the site overrides onto the defaults and validates the
//! result; that configuration becomes the *baseline*. Every later
//! [`Converter::reconfigure`] is computed against the baseline, never against
//! the previous effective configuration, so per-call overrides cannot leak
//! into the next call. [`Converter::with_overrides`] scopes overrides to a
//! closure and always restores the baseline afterwards.
//!
//! The match expression depends only on the `ascii` and `shortname` flags.
//! Changing the format or asset root never recompiles it.
//!
//! # Conversion pipeline
//!
//! 1. Parse the input into an [`HtmlDocument`]
//! 2. Walk the tree with a [`TreeSubstitutor`], skipping excluded subtrees
//! 3. Serialize the tree
//! 4. For the `html` format, replace literal emoji in the serialized text
//!    with numeric character references
//!
//! # Examples
//!
//! ```rust
//! use emoji_converter::config::ConfigOverrides;
//! use emoji_converter::converter::Converter;
//! use emoji_converter::data::EmojiRecord;
//!
//! let records = vec![EmojiRecord::new("1f609", ":wink:", &[], &[";)"]).unwrap()];
//! let mut converter = Converter::new(&records, &ConfigOverrides::new()).unwrap();
//!
//! assert_eq!(converter.convert("<p>:wink:</p>").unwrap(), "<p>&#x1f609;</p>");
//! assert_eq!(
//!     converter.emojify(";)", Some("unicode"), Some(true), None).unwrap(),
//!     "\u{1f609}"
//! );
//! // The one-shot overrides are gone again
//! assert_eq!(converter.convert(";)").unwrap(), ";)");
//! ```

use crate::alias_table::AliasTable;
use crate::assets::{AssetFetcher, DefaultAssetFetcher};
use crate::config::{ConfigOverrides, EmojiConfig};
use crate::data::{EmojiRecord, load_reference_json};
use crate::document::{HtmlDocument, parse_html};
use crate::error::EmojiError;
use crate::exclusion::ExclusionPolicy;
use crate::pattern::{EncodingExpression, MatchExpression};
use crate::renderer::Renderer;
use crate::substitutor::TreeSubstitutor;

/// Extension of converted output files
pub const OUTPUT_EXTENSION: &str = ".html";

/// Source extensions handled as convertible content
const SOURCE_EXTENSIONS: &[&str] = &[".md", ".markdown"];

/// Configured emoji converter
pub struct Converter {
    table: AliasTable,
    matcher: MatchExpression,
    encoder: EncodingExpression,
    policy: ExclusionPolicy,
    renderer: Renderer,
    baseline: EmojiConfig,
    config: EmojiConfig,
    fetcher: Box<dyn AssetFetcher>,
    rebuilds: usize,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("table", &self.table)
            .field("matcher", &self.matcher)
            .field("encoder", &self.encoder)
            .field("policy", &self.policy)
            .field("renderer", &self.renderer)
            .field("baseline", &self.baseline)
            .field("config", &self.config)
            .field("rebuilds", &self.rebuilds)
            .finish_non_exhaustive()
    }
}

impl Converter {
    /// Build a converter from reference records and site overrides
    ///
    /// # Errors
    ///
    /// - `UnsupportedFormat` when the overrides name an unknown format
    /// - `MalformedRecord` when a record carries an empty token
    /// - `Pattern` when the token alternation cannot be compiled
    pub fn new(records: &[EmojiRecord], site: &ConfigOverrides) -> Result<Self, EmojiError> {
        let baseline = site.apply_to(&EmojiConfig::default())?;
        let table = AliasTable::build(records)?;
        let matcher = MatchExpression::build(&table, baseline.token_classes())?;
        let encoder = EncodingExpression::build(&table)?;

        tracing::debug!(
            format = %baseline.format,
            ascii = baseline.ascii,
            shortname = baseline.shortname,
            tokens = table.len(),
            "Configured emoji converter"
        );

        Ok(Self {
            table,
            matcher,
            encoder,
            policy: ExclusionPolicy::new(),
            renderer: Renderer::for_config(&baseline),
            config: baseline.clone(),
            baseline,
            fetcher: Box::new(DefaultAssetFetcher::new()),
            rebuilds: 0,
        })
    }

    /// Build a converter from an emoji reference JSON document
    ///
    /// # Errors
    ///
    /// Fails with `ReferenceData` or `MalformedRecord` on unusable data, and
    /// otherwise as [`Converter::new`].
    pub fn from_reference_json(json: &str, site: &ConfigOverrides) -> Result<Self, EmojiError> {
        let records = load_reference_json(json)?;
        Self::new(&records, site)
    }

    /// Replace the asset fetcher used by embedded SVG output
    pub fn with_fetcher<F>(mut self, fetcher: F) -> Self
    where
        F: AssetFetcher + 'static,
    {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Replace the exclusion policy
    pub fn with_policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Effective configuration
    pub fn config(&self) -> &EmojiConfig {
        &self.config
    }

    /// Configuration established at construction
    pub fn baseline(&self) -> &EmojiConfig {
        &self.baseline
    }

    /// Number of match expression recompilations since construction
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Alias table backing this converter
    pub fn table(&self) -> &AliasTable {
        &self.table
    }

    /// Apply overrides on top of the baseline
    ///
    /// Unset fields take the baseline value. The format is validated before
    /// anything changes, so a failed call leaves the converter as it was.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for an unknown format name.
    pub fn reconfigure(&mut self, overrides: &ConfigOverrides) -> Result<&EmojiConfig, EmojiError> {
        let config = overrides.apply_to(&self.baseline)?;
        self.activate(config)?;
        Ok(&self.config)
    }

    fn activate(&mut self, config: EmojiConfig) -> Result<(), EmojiError> {
        let classes = config.token_classes();
        if classes != self.matcher.classes() {
            self.matcher = MatchExpression::build(&self.table, classes)?;
            self.rebuilds += 1;
            tracing::debug!(
                ascii = classes.ascii,
                shortname = classes.shortname,
                rebuilds = self.rebuilds,
                "Rebuilt emoji match expression"
            );
        }

        self.renderer = Renderer::for_config(&config);
        self.config = config;
        Ok(())
    }

    /// Run `f` with `overrides` applied, then restore the baseline
    ///
    /// The baseline is restored whether `f` succeeds or fails. An error from
    /// `f` takes precedence over an error while restoring.
    pub fn with_overrides<T, F>(&mut self, overrides: &ConfigOverrides, f: F) -> Result<T, EmojiError>
    where
        F: FnOnce(&mut Self) -> Result<T, EmojiError>,
    {
        self.reconfigure(overrides)?;
        let result = f(self);
        let restored = self.activate(self.baseline.clone());
        let value = result?;
        restored?;
        Ok(value)
    }

    /// One-shot conversion with optional per-call settings
    ///
    /// `None` arguments keep the baseline value. The converter is back at its
    /// baseline when this returns, also on error.
    pub fn emojify(
        &mut self,
        input: &str,
        format: Option<&str>,
        ascii: Option<bool>,
        shortname: Option<bool>,
    ) -> Result<String, EmojiError> {
        let overrides = ConfigOverrides {
            format: format.map(str::to_string),
            ascii,
            shortname,
            src: None,
        };
        self.with_overrides(&overrides, |converter| converter.convert(input))
    }

    /// Convert HTML text with the effective configuration
    pub fn convert(&self, input: &str) -> Result<String, EmojiError> {
        let mut document = parse_html(input);
        self.convert_document(&mut document)
    }

    /// Substitute tokens in a parsed document and serialize it
    ///
    /// # Errors
    ///
    /// - `AssetUnavailable`/`InvalidAsset` from embedded SVG output
    /// - `NestingTooDeep` for trees past the policy's depth limit
    /// - `Serialize` if the tree cannot be written back
    pub fn convert_document(&self, document: &mut HtmlDocument) -> Result<String, EmojiError> {
        let substitutor = TreeSubstitutor {
            policy: &self.policy,
            matcher: &self.matcher,
            table: &self.table,
            renderer: &self.renderer,
            fetcher: self.fetcher.as_ref(),
        };
        let substitutions = substitutor.substitute(&document.root(), 0)?;
        let output = document.serialize()?;

        tracing::debug!(
            format = %self.config.format,
            substitutions,
            fragment = document.is_fragment(),
            "Converted document"
        );

        if self.renderer == Renderer::HtmlEntities {
            return Ok(self.encoder.encode(&self.table, &output).into_owned());
        }
        Ok(output)
    }

    /// Whether a source file extension is handled (`.md`, `.markdown`)
    pub fn matches_extension(extension: &str) -> bool {
        SOURCE_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    }

    /// Extension of converted output
    pub fn output_extension(&self) -> &'static str {
        OUTPUT_EXTENSION
    }
}
