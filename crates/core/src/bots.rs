//! Crawler traffic detection.
//!
//! Best-effort heuristic over the raw client signature string. This is not a
//! security boundary; it only keeps obvious automated traffic out of the
//! visit statistics. The gate runs before any session or event write, so
//! excluded traffic leaves no trace.

use std::sync::LazyLock;

use regex::RegexSet;

/// Known crawler signature patterns, matched case-insensitively.
const BOT_PATTERNS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "googlebot",
    "bingbot",
    "yahoo",
    "baidu",
    "yandex",
    "duckduckbot",
];

static BOT_MATCHER: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(BOT_PATTERNS.iter().map(|p| format!("(?i){p}")))
        .expect("bot patterns are valid regexes")
});

/// Returns true when the client signature looks like automated traffic.
pub fn is_bot(signature: &str) -> bool {
    BOT_MATCHER.is_match(signature)
}
