//! Article body extraction.
//!
//! Article templates vary, so the body is located by an ordered list of
//! strategies. Each strategy is a plain function from a parsed document to an
//! optional body; the first one to return `Some` wins.
//!
//! 1. `article` element
//! 2. `div` whose class contains `caas-body`
//! 3. `div[role=main]`
//! 4. every paragraph in the document, capped at [`FALLBACK_PARAGRAPH_CAP`]
//!
//! Paragraphs of [`MIN_PARAGRAPH_CHARS`] or fewer characters are captions,
//! bylines and ads. A candidate body must be longer than
//! [`MIN_CONTENT_CHARS`] to be accepted. A page where nothing clears the
//! threshold has no body; that is not an error.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Paragraphs must be strictly longer than this (in characters) to count.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// A joined body must be strictly longer than this (in characters).
pub const MIN_CONTENT_CHARS: usize = 200;

/// Paragraphs kept by the document-wide fallback.
pub const FALLBACK_PARAGRAPH_CAP: usize = 20;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Elements whose contents are never article text.
const NOISE_ELEMENTS: [&str; 3] = ["script", "style", "nav"];

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Container selectors, highest priority first.
static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article", "div[class*='caas-body']", "div[role='main']"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

type Strategy = fn(&Html) -> Option<String>;

const STRATEGIES: [Strategy; 4] = [
    article_element,
    caas_body,
    main_role,
    from_all_paragraphs,
];

/// Extract the article body from a parsed document.
pub fn extract_from(document: &Html) -> Option<String> {
    STRATEGIES.iter().find_map(|strategy| strategy(document))
}

fn article_element(document: &Html) -> Option<String> {
    from_container(document, 0)
}

fn caas_body(document: &Html) -> Option<String> {
    from_container(document, 1)
}

fn main_role(document: &Html) -> Option<String> {
    from_container(document, 2)
}

fn from_container(document: &Html, index: usize) -> Option<String> {
    let container = document.select(&CONTAINERS[index]).next()?;
    let paragraphs = container
        .select(&PARAGRAPH)
        .filter(|p| !inside_noise(p, Some(&container)))
        .filter_map(qualifying_text);
    accept(paragraphs)
}

fn from_all_paragraphs(document: &Html) -> Option<String> {
    let paragraphs = document
        .select(&PARAGRAPH)
        .filter(|p| !inside_noise(p, None))
        .filter_map(qualifying_text)
        .take(FALLBACK_PARAGRAPH_CAP);
    accept(paragraphs)
}

fn accept(paragraphs: impl Iterator<Item = String>) -> Option<String> {
    let body = paragraphs.collect::<Vec<_>>().join(PARAGRAPH_SEPARATOR);
    (body.chars().count() > MIN_CONTENT_CHARS).then_some(body)
}

fn qualifying_text(paragraph: ElementRef) -> Option<String> {
    let text = visible_text(paragraph);
    (text.chars().count() > MIN_PARAGRAPH_CHARS).then_some(text)
}

/// Whether `element` sits inside a noise element, looking no further up than
/// `boundary`.
fn inside_noise(element: &ElementRef, boundary: Option<&ElementRef>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| boundary.is_none_or(|b| a != b))
        .any(|a| NOISE_ELEMENTS.contains(&a.value().name()))
}

/// Whitespace-normalised text of `element`, skipping script and style content.
pub(crate) fn visible_text(element: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|a| *a != element)
            .any(|a| NOISE_ELEMENTS.contains(&a.value().name()));
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.concat().split_whitespace().collect::<Vec<_>>().join(" ")
}
