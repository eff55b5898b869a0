//! Share-card endpoint: composes a title/subtitle over a branded
//! background and serves it as SVG (1200x630, the standard OG card size).

use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::Result;
use crate::extractors::Query;

const CARD_WIDTH: u32 = 1200;
const CARD_HEIGHT: u32 = 630;
const MAX_TITLE_CHARS: usize = 80;
const MAX_SUBTITLE_CHARS: usize = 120;

#[derive(Debug, Default, Deserialize)]
pub struct CardQuery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_chars(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        input.to_string()
    } else {
        let cut: String = input.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    }
}

pub async fn share_card(Query(query): Query<CardQuery>) -> Result<impl IntoResponse> {
    let title = escape_xml(&truncate_chars(
        query.title.as_deref().unwrap_or("Greenroom"),
        MAX_TITLE_CHARS,
    ));
    let subtitle = escape_xml(&truncate_chars(
        query.subtitle.as_deref().unwrap_or(""),
        MAX_SUBTITLE_CHARS,
    ));

    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <defs>
    <linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="#0b2818"/>
      <stop offset="100%" stop-color="#1f5c38"/>
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="url(#bg)"/>
  <rect x="40" y="40" width="{inner_w}" height="{inner_h}" fill="none" stroke="#8fd3a9" stroke-width="2" opacity="0.5"/>
  <text x="80" y="300" font-family="Georgia, serif" font-size="64" font-weight="bold" fill="#f2fbf5">{title}</text>
  <text x="80" y="380" font-family="Georgia, serif" font-size="32" fill="#b8e3c6">{subtitle}</text>
  <text x="80" y="{footer_y}" font-family="Georgia, serif" font-size="24" fill="#8fd3a9" letter-spacing="4">GREENROOM</text>
</svg>"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        inner_w = CARD_WIDTH - 80,
        inner_h = CARD_HEIGHT - 80,
        footer_y = CARD_HEIGHT - 80,
        title = title,
        subtitle = subtitle,
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        svg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_xml(r#"<b>"A & B"</b>"#),
            "&lt;b&gt;&quot;A &amp; B&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn truncates_long_titles() {
        let long = "x".repeat(200);
        let out = truncate_chars(&long, MAX_TITLE_CHARS);
        assert_eq!(out.chars().count(), MAX_TITLE_CHARS);
        assert!(out.ends_with('\u{2026}'));
    }

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }
}
