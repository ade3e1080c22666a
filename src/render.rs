//! HTML rendering for article cards and the dashboard page.
//!
//! [`render_cards`] is the card renderer proper: a pure function from an
//! article list to markup, one `<article class="card">` per entry, in order.
//! [`render_page`] wraps those cards in a standalone document with the section
//! controls and status line around them.

use crate::models::{Article, DEFAULT_OUTLET};
use crate::sections::SECTIONS;
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use std::fmt::Write;

const OUTLET_ICON: &str = "📰";
const DATE_ICON: &str = "📅";

/// Render one card.
///
/// The date line is left out entirely when `published_at` is empty.
pub fn render_card(article: &Article) -> String {
    let outlet = if article.outlet.is_empty() {
        DEFAULT_OUTLET
    } else {
        article.outlet.as_str()
    };

    let mut card = String::new();
    card.push_str("<article class=\"card\">\n");
    let _ = writeln!(card, "  <h3>{}</h3>", encode_text(&article.title));
    card.push_str("  <div class=\"meta\">\n");
    let _ = writeln!(card, "    <span>{OUTLET_ICON} {}</span>", encode_text(outlet));
    if !article.published_at.is_empty() {
        let _ = writeln!(
            card,
            "    <span>{DATE_ICON} {}</span>",
            encode_text(&article.published_at)
        );
    }
    card.push_str("  </div>\n");
    let _ = writeln!(card, "  <p>{}</p>", encode_text(&article.content));
    card.push_str("</article>\n");
    card
}

/// Render a list of articles as cards. An empty list renders as nothing.
pub fn render_cards(articles: &[Article]) -> String {
    articles.iter().map(render_card).join("")
}

/// Everything the page template needs.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    /// Section whose control is marked active, if any.
    pub active: Option<&'a str>,
    /// Status line text.
    pub status: &'a str,
    /// Already rendered cards (see [`render_cards`]).
    pub cards: &'a str,
    /// Footer timestamp.
    pub generated_at: &'a str,
}

fn render_controls(active: Option<&str>) -> String {
    SECTIONS
        .iter()
        .map(|section| {
            let class = if Some(section.id) == active {
                " class=\"active\""
            } else {
                ""
            };
            format!(
                "    <a{class} data-cat=\"{id}\" href=\"{id}.html\">{label}</a>\n",
                id = encode_double_quoted_attribute(section.id),
                label = encode_text(section.label),
            )
        })
        .join("")
}

/// Render a complete HTML document around a set of cards.
pub fn render_page(page: &Page<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <title>Section Digest</title>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str("  <nav class=\"controls\">\n");
    html.push_str(&render_controls(page.active));
    html.push_str("  </nav>\n");
    let _ = writeln!(html, "  <p id=\"status\">{}</p>", encode_text(page.status));
    html.push_str("  <section id=\"articles\">\n");
    html.push_str(page.cards);
    html.push_str("  </section>\n");
    let _ = writeln!(
        html,
        "  <footer>Generated {}</footer>",
        encode_text(page.generated_at)
    );
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, published_at: &str) -> Article {
        Article {
            title: title.to_string(),
            outlet: "NEWS".to_string(),
            views: 10,
            comments: 1,
            published_at: published_at.to_string(),
            content: "Body text".to_string(),
            url: "https://example.com/a".to_string(),
        }
    }

    #[test]
    fn test_card_with_date() {
        let card = render_card(&article("Budget passes", "2024-01-01"));
        assert!(card.starts_with("<article class=\"card\">"));
        assert!(card.contains("<h3>Budget passes</h3>"));
        assert!(card.contains("<span>📰 NEWS</span>"));
        assert!(card.contains("<span>📅 2024-01-01</span>"));
        assert!(card.contains("<p>Body text</p>"));
    }

    #[test]
    fn test_card_without_date_omits_element() {
        let card = render_card(&article("No date", ""));
        assert!(!card.contains("📅"));
        assert_eq!(card.matches("<span>").count(), 1);
    }

    #[test]
    fn test_card_escapes_text() {
        let mut a = article("<script>alert(1)</script>", "");
        a.content = "Tom & Jerry".to_string();
        let card = render_card(&a);
        assert!(card.contains("<h3>&lt;script&gt;alert(1)&lt;/script&gt;</h3>"));
        assert!(card.contains("<p>Tom &amp; Jerry</p>"));
    }

    #[test]
    fn test_card_empty_outlet_uses_default() {
        let mut a = article("Title", "");
        a.outlet.clear();
        assert!(render_card(&a).contains("<span>📰 Naver</span>"));
    }

    #[test]
    fn test_url_is_not_rendered() {
        let card = render_card(&article("Title", ""));
        assert!(!card.contains("example.com"));
    }

    #[test]
    fn test_cards_keep_input_order() {
        let cards = render_cards(&[article("First", ""), article("Second", ""), article("Third", "")]);
        let first = cards.find("First").unwrap();
        let second = cards.find("Second").unwrap();
        let third = cards.find("Third").unwrap();
        assert!(first < second && second < third);
        assert_eq!(cards.matches("<article class=\"card\">").count(), 3);
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        assert_eq!(render_cards(&[]), "");
    }

    #[test]
    fn test_render_is_idempotent() {
        let list = vec![article("A", "2024-01-01"), article("B", "")];
        assert_eq!(render_cards(&list), render_cards(&list));
    }

    #[test]
    fn test_page_marks_only_active_control() {
        let cards = render_cards(&[article("A", "")]);
        let html = render_page(&Page {
            active: Some("economy"),
            status: "loaded from live source",
            cards: &cards,
            generated_at: "2025-05-06T08:00:00+09:00",
        });

        assert_eq!(html.matches("class=\"active\"").count(), 1);
        assert!(html.contains("<a class=\"active\" data-cat=\"economy\" href=\"economy.html\">Economy</a>"));
        assert!(html.contains("<a data-cat=\"politics\" href=\"politics.html\">Politics</a>"));
        assert!(html.contains("<p id=\"status\">loaded from live source</p>"));
        assert!(html.contains(&cards));
    }

    #[test]
    fn test_page_without_selection_has_no_active_control() {
        let html = render_page(&Page {
            active: Some("sports"),
            status: "no data found — showing sample data",
            cards: "",
            generated_at: "now",
        });
        assert!(!html.contains("class=\"active\""));
        assert!(html.contains("<section id=\"articles\">\n  </section>"));
    }
}
