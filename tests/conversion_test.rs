//! Conversion integration tests
//!
//! These tests drive the public converter API against a small reference
//! data set covering every token kind.

use emoji_converter::config::{ConfigOverrides, Format, SiteConfig};
use emoji_converter::converter::Converter;
use emoji_converter::error::EmojiError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const REFERENCE: &str = include_str!("fixtures/emoji.json");

fn converter() -> Converter {
    let site = ConfigOverrides::new().format("html").ascii(true).shortname(true);
    Converter::from_reference_json(REFERENCE, &site).expect("Fixture should load")
}

#[test]
fn test_html() {
    let converter = converter();
    assert_eq!(converter.convert("\u{1f609}").unwrap(), "&#x1f609;");
    assert_eq!(converter.convert(":wink:").unwrap(), "&#x1f609;");
    assert_eq!(converter.convert(";)").unwrap(), "&#x1f609;");
}

#[test]
fn test_unicode() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().format("unicode"))
        .unwrap();
    assert_eq!(converter.convert("\u{1f609}").unwrap(), "\u{1f609}");
    assert_eq!(converter.convert(":wink:").unwrap(), "\u{1f609}");
    assert_eq!(converter.convert(";)").unwrap(), "\u{1f609}");
}

#[test]
fn test_svg() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().format("emojione-svg"))
        .unwrap();

    let img = "the number <img class=\"emojione\" alt=\"3\u{20e3}\" \
               src=\"https://cdn.jsdelivr.net/emojione/assets/svg/0033-20e3.svg\"> \
               is smaller than 4";
    assert_eq!(
        converter.convert("the number \u{0033}\u{20e3} is smaller than 4").unwrap(),
        img
    );
    assert_eq!(converter.convert("the number :three: is smaller than 4").unwrap(), img);
    assert_eq!(
        converter.convert("the number 3 is smaller than 4").unwrap(),
        "the number 3 is smaller than 4"
    );
}

#[test]
fn test_png_with_custom_src() {
    let mut converter = converter();
    converter
        .reconfigure(
            &ConfigOverrides::new()
                .format("emojione-png")
                .src("https://assets.example.com/emoji/"),
        )
        .unwrap();

    assert_eq!(
        converter.convert("<p>:+1:</p>").unwrap(),
        "<p><img class=\"emojione\" alt=\"\u{1f44d}\" \
         src=\"https://assets.example.com/emoji/1f44d.png\"></p>"
    );
}

#[test]
fn test_only_first_token_per_text_node_becomes_an_element() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().format("emojione-png"))
        .unwrap();

    assert_eq!(
        converter.convert("<p>a :wink: b :smile: c</p>").unwrap(),
        "<p>a <img class=\"emojione\" alt=\"\u{1f609}\" \
         src=\"https://cdn.jsdelivr.net/emojione/assets/png/1f609.png\"> b :smile: c</p>"
    );

    // Separate text nodes are each handled
    assert_eq!(
        converter.convert("<p>:wink:</p><p>:smile:</p>").unwrap(),
        "<p><img class=\"emojione\" alt=\"\u{1f609}\" \
         src=\"https://cdn.jsdelivr.net/emojione/assets/png/1f609.png\"></p>\
         <p><img class=\"emojione\" alt=\"\u{1f604}\" \
         src=\"https://cdn.jsdelivr.net/emojione/assets/png/1f604.png\"></p>"
    );
}

#[test]
fn test_reconfiguring_aliases() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().ascii(false))
        .unwrap();
    assert_eq!(converter.convert(":)").unwrap(), ":)");

    converter.reconfigure(&ConfigOverrides::new()).unwrap();
    assert_eq!(converter.convert(":)").unwrap(), "&#x1f604;");
}

#[test]
fn test_disabled_shortnames_still_match_literals() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().shortname(false).ascii(false))
        .unwrap();
    assert_eq!(
        converter.convert(":wink: \u{1f609} ;)").unwrap(),
        ":wink: &#x1f609; ;)"
    );
}

#[test]
fn test_class_blacklists() {
    let converter = converter();
    assert_eq!(
        converter
            .convert(r#"<span class="very-serious-text no-emojis">:)</span>"#)
            .unwrap(),
        r#"<span class="very-serious-text no-emojis">:)</span>"#
    );
    assert_eq!(
        converter
            .convert(r#"<span class="very-serious-text no-emojiz">:)</span>"#)
            .unwrap(),
        r#"<span class="very-serious-text no-emojiz">&#x1f604;</span>"#
    );
}

#[test]
fn test_attr_blacklists() {
    let converter = converter();
    assert_eq!(
        converter.convert("<span data-no-emojis>:)</span>").unwrap(),
        r#"<span data-no-emojis="">:)</span>"#
    );
    assert_eq!(
        converter.convert("<span data-no-emojiz>:)</span>").unwrap(),
        r#"<span data-no-emojiz="">&#x1f604;</span>"#
    );
}

#[test]
fn test_node_blacklists() {
    let converter = converter();
    assert_eq!(converter.convert("<code>:)</code>").unwrap(), "<code>:)</code>");
    assert_eq!(converter.convert("<span>:)</span>").unwrap(), "<span>&#x1f604;</span>");
    assert_eq!(
        converter.convert("<pre><em>:wink:</em></pre>").unwrap(),
        "<pre><em>:wink:</em></pre>"
    );
}

#[test]
fn test_literal_emoji_inside_code_is_left_as_text() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().format("unicode"))
        .unwrap();
    assert_eq!(
        converter.convert("<code>:wink:</code> :wink:").unwrap(),
        "<code>:wink:</code> \u{1f609}"
    );
}

#[test]
fn test_longest_token_wins() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().format("unicode"))
        .unwrap();
    assert_eq!(converter.convert(";-)").unwrap(), "\u{1f609}");
    assert_eq!(converter.convert(":'-)").unwrap(), "\u{1f602}");
    assert_eq!(converter.convert(":us:").unwrap(), "\u{1f1fa}\u{1f1f8}");
}

#[test]
fn test_escaped_markup_glyph() {
    let converter = converter();
    assert_eq!(converter.convert("<p>I &lt;3 you</p>").unwrap(), "<p>I &#x2764; you</p>");
}

#[test]
fn test_full_document_keeps_structure() {
    let converter = converter();
    let input = "<!DOCTYPE html><html><head><title>:wink:</title></head>\
                 <body><p>:grinning:</p></body></html>";
    assert_eq!(
        converter.convert(input).unwrap(),
        "<!DOCTYPE html><html><head><title>&#x1f609;</title></head>\
         <body><p>&#x1f600;</p></body></html>"
    );
}

fn unicode_converter() -> Converter {
    let site = ConfigOverrides::new().format("unicode").ascii(true).shortname(true);
    Converter::from_reference_json(REFERENCE, &site).expect("Fixture should load")
}

#[test]
fn test_fragment_comments_and_whitespace_are_kept() {
    let converter = unicode_converter();
    assert_eq!(
        converter.convert("<!-- keep me --><p>:wink:</p>").unwrap(),
        "<!-- keep me --><p>\u{1f609}</p>"
    );
    assert_eq!(converter.convert("\n  :wink: hi").unwrap(), "\n  \u{1f609} hi");
    assert_eq!(
        converter.convert("<p>a</p>\n<!-- end -->\n").unwrap(),
        "<p>a</p>\n<!-- end -->\n"
    );
}

#[test]
fn test_body_wrapper_is_kept() {
    let converter = unicode_converter();
    assert_eq!(
        converter.convert(r#"<body class="no-emoji">:wink:</body>"#).unwrap(),
        r#"<body class="no-emoji">:wink:</body>"#
    );
    assert_eq!(
        converter.convert(r#"<body id="main">:wink:</body>"#).unwrap(),
        "<body id=\"main\">\u{1f609}</body>"
    );
}

#[test]
fn test_format_only_reconfigure_does_not_rebuild() {
    let mut converter = converter();
    for format in ["unicode", "emojione-png", "emojione-svg", "html"] {
        converter
            .reconfigure(&ConfigOverrides::new().format(format))
            .unwrap();
    }
    assert_eq!(converter.rebuild_count(), 0);

    converter
        .reconfigure(&ConfigOverrides::new().shortname(false))
        .unwrap();
    assert_eq!(converter.rebuild_count(), 1);
}

#[test]
fn test_reconfigure_is_idempotent() {
    let mut converter = converter();
    let overrides = ConfigOverrides::new().format("unicode").ascii(false);

    let first = converter.reconfigure(&overrides).unwrap().clone();
    let first_output = converter.convert(":wink: ;)").unwrap();
    let second = converter.reconfigure(&overrides).unwrap().clone();
    let second_output = converter.convert(":wink: ;)").unwrap();

    assert_eq!(first, second);
    assert_eq!(first_output, second_output);
    assert_eq!(converter.rebuild_count(), 1);
}

#[test]
fn test_unsupported_format_leaves_state_intact() {
    let mut converter = converter();
    converter
        .reconfigure(&ConfigOverrides::new().format("unicode"))
        .unwrap();

    match converter.reconfigure(&ConfigOverrides::new().format("emojione-gif").ascii(false)) {
        Err(EmojiError::UnsupportedFormat(name)) => assert_eq!(name, "emojione-gif"),
        other => panic!("Expected UnsupportedFormat, got: {other:?}"),
    }
    assert_eq!(converter.config().format, Format::Unicode);
    assert!(converter.config().ascii);
    assert_eq!(converter.convert(";)").unwrap(), "\u{1f609}");
}

#[test]
fn test_emojify_one_shot() {
    let mut converter = converter();
    assert_eq!(
        converter
            .emojify("<p>:heart: ;)</p>", Some("unicode"), Some(false), None)
            .unwrap(),
        "<p>\u{2764} ;)</p>"
    );
    assert_eq!(converter.config(), converter.baseline());
    assert_eq!(converter.convert(";)").unwrap(), "&#x1f609;");
}

#[test]
fn test_site_config_baseline() {
    let site = SiteConfig::from_yaml("emoji:\n  format: unicode\n  ascii: true\n").unwrap();
    let converter = Converter::from_reference_json(REFERENCE, &site.overrides()).unwrap();
    assert_eq!(converter.baseline().format, Format::Unicode);
    assert_eq!(converter.convert("=)").unwrap(), "\u{1f604}");
}

#[test]
fn test_malformed_reference_data() {
    let missing_field = r#"{"wink": {"unicode": "1f609", "shortname": ":wink:", "aliases": []}}"#;
    let result = Converter::from_reference_json(missing_field, &ConfigOverrides::new());
    assert!(matches!(result, Err(EmojiError::MalformedRecord(_))));

    let bad_codepoint =
        r#"[{"unicode": "zz", "shortname": ":x:", "aliases": [], "aliases_ascii": []}]"#;
    let result = Converter::from_reference_json(bad_codepoint, &ConfigOverrides::new());
    assert!(matches!(result, Err(EmojiError::MalformedRecord(_))));

    let list_missing_field = r#"[{"unicode": "1f609", "shortname": ":wink:", "aliases": []}]"#;
    match Converter::from_reference_json(list_missing_field, &ConfigOverrides::new()) {
        Err(EmojiError::MalformedRecord(message)) => assert!(message.contains("record 0")),
        other => panic!("Expected MalformedRecord, got: {other:?}"),
    }
}

#[test]
fn test_extensions() {
    assert!(Converter::matches_extension(".md"));
    assert!(Converter::matches_extension(".MARKDOWN"));
    assert!(!Converter::matches_extension(".txt"));
}

proptest! {
    #[test]
    fn prop_text_without_tokens_is_unchanged(
        text in "[a-zA-Z0-9][a-zA-Z0-9 ,.]{0,60}",
        format in prop::sample::select(vec!["html", "unicode", "emojione-png", "emojione-svg"]),
    ) {
        let mut converter = converter();
        converter.reconfigure(&ConfigOverrides::new().format(format)).unwrap();
        let html = format!("<p>{text}</p>");
        prop_assert_eq!(converter.convert(&html).unwrap(), html);
    }

    #[test]
    fn prop_commented_fragment_is_unchanged(
        html in "[ \n]{0,3}<!--[a-z ]{0,10}--><p>[a-z ]{0,20}</p>",
    ) {
        let converter = unicode_converter();
        prop_assert_eq!(converter.convert(&html).unwrap(), html);
    }

    #[test]
    fn prop_shortname_in_code_is_never_converted(
        name in prop::sample::select(vec![":wink:", ":smile:", ":heart:", ":us:", ":+1:"]),
    ) {
        let converter = converter();
        let html = format!("<pre><code>{name}</code></pre>");
        prop_assert_eq!(converter.convert(&html).unwrap(), html);
    }
}
