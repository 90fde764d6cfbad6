//! Terminal output: highlighted source, activity log and toasts

use owo_colors::OwoColorize;
use unchained_highlight::{Grammar, Span};
use unchained_orchestrator::AppStore;

/// Parse `#rrggbb`. Anything else renders white.
fn rgb(hex: &str) -> (u8, u8, u8) {
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range).and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match (hex.len(), parse(1..3), parse(3..5), parse(5..7)) {
        (7, Some(r), Some(g), Some(b)) => (r, g, b),
        _ => (255, 255, 255),
    }
}

pub fn paint(grammar: Grammar, spans: &[Span<'_>]) -> String {
    spans
        .iter()
        .map(|span| {
            let (r, g, b) = rgb(grammar.color(span.tag));
            span.text.truecolor(r, g, b).to_string()
        })
        .collect()
}

pub fn print_highlighted(grammar: Grammar, source: &str) {
    let spans = grammar.highlight(source);
    print!("{}", paint(grammar, &spans));
    if !source.ends_with('\n') {
        println!();
    }
}

/// Activity log, newest first, then whatever toasts are still showing.
pub fn print_activity(store: &AppStore) {
    for entry in store.logs_recent_first() {
        println!(
            "{} {}",
            entry.timestamp.format("%H:%M:%S").dimmed(),
            entry.message
        );
    }
    for toast in store.notifications() {
        if toast.is_error {
            eprintln!("{} {}", "✗".red(), toast.message.red());
        } else {
            println!("{} {}", "✓".green(), toast.message.green());
        }
    }
}

pub fn print_security_warning() {
    eprintln!("{}", "Security Warning - Demo Environment".yellow().bold());
    eprintln!(
        "This is a demonstration application operating on Liquid Testnet and Bitcoin Testnet4."
    );
    eprintln!(
        "{} use your actual secret keys. Keys used here are {}.",
        "NEVER".bold(),
        "NOT SECURE".bold()
    );
    eprintln!(
        "It's better to get UTXOs from faucets and never, under any condition, use your real secret keys."
    );
    eprintln!();
}
