//! Emojify example demonstrating each output format
//!
//! Run with `RUST_LOG=emoji_converter=debug` to see rebuild and conversion
//! logs.

use emoji_converter::config::ConfigOverrides;
use emoji_converter::converter::Converter;
use tracing_subscriber::EnvFilter;

const REFERENCE: &str = include_str!("../tests/fixtures/emoji.json");

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Emoji Converter - Output Formats ===\n");

    let site = ConfigOverrides::new().ascii(true);
    let mut converter =
        Converter::from_reference_json(REFERENCE, &site).expect("Reference data should load");

    let input = r#"<p>Shipped it :+1: ;) <code>:wink:</code></p>"#;
    println!("Input HTML:");
    println!("{input}\n");

    for format in ["html", "unicode", "emojione-png", "emojione-svg"] {
        let output = converter
            .emojify(input, Some(format), None, None)
            .expect("Conversion failed");
        println!("Output ({format}):");
        println!("{output}");
        println!("---\n");
    }

    println!("Opted-out span:");
    let output = converter
        .convert(r#"<span class="no-emoji">:heart: <3</span> :heart: <3"#)
        .expect("Conversion failed");
    println!("{output}");
    println!("---\n");

    println!("Match expression rebuilds: {}", converter.rebuild_count());
}
