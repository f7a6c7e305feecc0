//! Interactive card rendering
//!
//! Turns a slice of leaderboard entries into a Feishu schema 2.0 card. The
//! formatter is pure: the same entries always produce the same card.

use crate::config::CardSettings;
use crate::trending::{FetchRequest, LeaderboardEntry};
use serde::Serialize;

/// Public trending page linked from every card
pub const TRENDING_PAGE_URL: &str = "https://github.com/trending";

/// Contributors listed per entry before the rest are elided
const MAX_CONTRIBUTORS: usize = 5;

/// Rendered card content, ready for the webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPayload {
    /// Header title, e.g. "📈 GitHub Trending · Daily"
    pub title: String,

    /// Header colour template
    pub template: String,

    /// Language, period and source block
    pub summary: String,

    /// "Top N Repositories" line above the list
    pub heading: String,

    /// One markdown block per entry, in rank order
    pub lines: Vec<String>,
}

/// Webhook body wrapping an interactive card
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    msg_type: &'static str,
    card: Card,
}

#[derive(Debug, Clone, Serialize)]
struct Card {
    schema: &'static str,
    header: CardHeader,
    body: CardBody,
}

#[derive(Debug, Clone, Serialize)]
struct CardHeader {
    title: PlainText,
    template: String,
}

#[derive(Debug, Clone, Serialize)]
struct CardBody {
    elements: Vec<CardElement>,
}

#[derive(Debug, Clone, Serialize)]
struct PlainText {
    tag: &'static str,
    content: String,
}

impl PlainText {
    fn new(content: impl Into<String>) -> Self {
        Self {
            tag: "plain_text",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
enum CardElement {
    Markdown {
        content: String,
    },
    Hr,
    Button {
        text: PlainText,
        #[serde(rename = "type")]
        kind: &'static str,
        url: String,
    },
}

impl CardPayload {
    /// Wraps the card in the `interactive` webhook message
    pub fn to_message(&self) -> WebhookMessage {
        let mut elements = vec![
            CardElement::Markdown {
                content: self.summary.clone(),
            },
            CardElement::Hr,
            CardElement::Markdown {
                content: self.heading.clone(),
            },
        ];

        elements.extend(self.lines.iter().map(|line| CardElement::Markdown {
            content: line.clone(),
        }));

        elements.push(CardElement::Hr);
        elements.push(CardElement::Button {
            text: PlainText::new("🔍 Open GitHub Trending"),
            kind: "primary",
            url: TRENDING_PAGE_URL.to_string(),
        });

        WebhookMessage {
            msg_type: "interactive",
            card: Card {
                schema: "2.0",
                header: CardHeader {
                    title: PlainText::new(self.title.clone()),
                    template: self.template.clone(),
                },
                body: CardBody { elements },
            },
        }
    }
}

/// Renders the card for entries already truncated to the request limit
///
/// # Example
///
/// ```
/// use trending_relay::config::CardSettings;
/// use trending_relay::feishu::format_card;
/// use trending_relay::trending::{FetchRequest, Period};
///
/// let request = FetchRequest::new(None, Period::Daily, 10);
/// let card = format_card(&request, &[], &CardSettings::default());
/// assert_eq!(card.title, "📈 GitHub Trending · Daily");
/// assert!(card.lines.is_empty());
/// ```
pub fn format_card(
    request: &FetchRequest,
    entries: &[LeaderboardEntry],
    settings: &CardSettings,
) -> CardPayload {
    let period = request.period;

    let summary = format!(
        "**Language**: {}  \n**Period**: {}  \n**Source**: {}",
        request.language_label(),
        period.label(),
        TRENDING_PAGE_URL
    );

    let lines = entries
        .iter()
        .map(|entry| format_entry(entry, request, settings.description_width))
        .collect();

    CardPayload {
        title: format!("📈 GitHub Trending · {}", period.label()),
        template: settings.template.clone(),
        summary,
        heading: format!("**Top {} Repositories**", entries.len()),
        lines,
    }
}

fn format_entry(entry: &LeaderboardEntry, request: &FetchRequest, width: usize) -> String {
    let description = entry
        .description
        .as_deref()
        .map(|d| shorten(d, width))
        .unwrap_or_else(|| "(no description)".to_string());

    let mut parts = vec![
        format!("{}. **[{}]({})**", entry.rank, entry.full_name(), entry.url()),
        format!(
            "⭐ {} · +{} {} · {}",
            entry.total_stars,
            entry.period_stars,
            request.period.delta_phrase(),
            entry.language.as_deref().unwrap_or("Unknown")
        ),
        description,
    ];

    if !entry.contributors.is_empty() {
        let logins: Vec<String> = entry
            .contributors
            .iter()
            .take(MAX_CONTRIBUTORS)
            .map(|c| format!("@{}", c.login))
            .collect();
        parts.push(format!("Built by {}", logins.join(" ")));
    }

    parts.join("  \n")
}

/// Collapses whitespace and shortens to `width` characters at a word boundary
///
/// Text that fits is returned unchanged. Otherwise the kept words plus a
/// trailing `…` stay within `width`. A single word longer than the width is
/// cut mid-word.
pub fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;

    for word in &words {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed > budget {
            break;
        }
        if used > 0 {
            out.push(' ');
        }
        out.push_str(word);
        used = needed;
    }

    if used == 0 {
        out = collapsed.chars().take(budget).collect();
    }

    out.push('…');
    out
}
