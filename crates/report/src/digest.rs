//! HTML digest rendering for the scheduled email report.

use std::collections::HashMap;

use analytics_core::{ContactMessage, Report};

/// Maximum unread-message excerpts included in a digest.
pub const DIGEST_MESSAGE_LIMIT: usize = 5;

/// Excerpt length for message bodies, in characters.
const EXCERPT_CHARS: usize = 120;

/// A rendered digest, ready for the sender.
#[derive(Debug, Clone)]
pub struct Digest {
    pub subject: String,
    pub html: String,
}

/// Renders the fixed-structure HTML digest: overview counts, per-page list,
/// per-country list, and up to [`DIGEST_MESSAGE_LIMIT`] unread-message
/// excerpts. Pure formatting; the caller fetches the inputs.
pub fn render_digest(report: &Report, unread: &[ContactMessage]) -> Digest {
    let subject = format!(
        "Rapport de visites du {}",
        report.window_start.format("%d/%m/%Y")
    );

    let mut html = String::new();
    html.push_str("<html><body>");
    html.push_str("<h1>Statistiques de visites</h1>");

    html.push_str("<h2>Vue d'ensemble</h2><ul>");
    html.push_str(&format!(
        "<li>Visites totales : {}</li>",
        report.total_visits
    ));
    html.push_str(&format!(
        "<li>Dur\u{e9}e moyenne de session : {} s</li>",
        report.average_session_duration_secs.round() as i64
    ));
    html.push_str(&format!(
        "<li>Mobile : {} / Desktop : {}</li>",
        report.device_stats.mobile, report.device_stats.desktop
    ));
    html.push_str("</ul>");

    html.push_str("<h2>Pages</h2><ul>");
    for page in &report.page_views {
        html.push_str(&format!(
            "<li>{} : {}</li>",
            escape_html(&page.page),
            page.views
        ));
    }
    html.push_str("</ul>");

    html.push_str("<h2>Pays</h2><ul>");
    for (country, views) in country_counts(report) {
        html.push_str(&format!("<li>{} : {}</li>", escape_html(&country), views));
    }
    html.push_str("</ul>");

    html.push_str(&format!(
        "<h2>Messages non lus ({})</h2><ul>",
        unread.len()
    ));
    for message in unread.iter().take(DIGEST_MESSAGE_LIMIT) {
        html.push_str(&format!(
            "<li><strong>{}</strong> &lt;{}&gt; : {}</li>",
            escape_html(&message.name),
            escape_html(&message.email),
            escape_html(&excerpt(&message.body))
        ));
    }
    html.push_str("</ul>");

    html.push_str("</body></html>");

    Digest { subject, html }
}

/// Per-country view counts, descending, derived from the location entries.
fn country_counts(report: &Report) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for location in &report.locations {
        let country = location
            .country
            .clone()
            .unwrap_or_else(|| "Inconnu".to_string());
        *counts.entry(country).or_insert(0) += location.views;
    }

    let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= EXCERPT_CHARS {
        return body.to_string();
    }
    let cut: String = body.chars().take(EXCERPT_CHARS).collect();
    format!("{cut}\u{2026}")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
