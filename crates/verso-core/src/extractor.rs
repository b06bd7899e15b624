//! Content-element extraction built on `scraper`.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::error::{ExtractError, TransformError};
use crate::types::{ContentElement, CustomRanking};

/// Significant elements indexed by default.
pub const DEFAULT_SELECTORS: &str = "p,pre,td,li";

/// Markup above this size is refused rather than parsed.
pub const DEFAULT_MAX_HTML_BYTES: usize = 5 * 1024 * 1024;

/// Heading weight for content that precedes every heading.
const TOP_WEIGHT: u32 = 100;

/// Parsed set of "significant" element selectors.
#[derive(Debug, Clone)]
pub struct ElementSelectors {
    source: String,
    selector: Selector,
}

impl ElementSelectors {
    /// Parse a comma-separated CSS selector list.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidSelector`] if the list does not parse.
    pub fn parse(list: &str) -> Result<Self, TransformError> {
        let selector =
            Selector::parse(list).map_err(|_| TransformError::InvalidSelector(list.to_owned()))?;
        Ok(Self {
            source: list.to_owned(),
            selector,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.selector.matches(element)
    }
}

impl Default for ElementSelectors {
    fn default() -> Self {
        Self {
            source: DEFAULT_SELECTORS.to_owned(),
            selector: Selector::parse(DEFAULT_SELECTORS).expect("default selector list"),
        }
    }
}

/// Decomposes markup into an ordered sequence of content elements.
///
/// Implementations must preserve document order and tag each element with the
/// id of the nearest preceding heading (empty when there is none).
pub trait ElementExtractor: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the markup cannot be decomposed.
    fn extract(
        &self,
        html: &str,
        selectors: &ElementSelectors,
    ) -> Result<Vec<ContentElement>, ExtractError>;
}

/// Default extractor: parses the body as an HTML fragment and walks it in order.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    max_html_bytes: usize,
}

impl HtmlExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_html_bytes(mut self, limit: usize) -> Self {
        self.max_html_bytes = limit;
        self
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementExtractor for HtmlExtractor {
    fn extract(
        &self,
        html: &str,
        selectors: &ElementSelectors,
    ) -> Result<Vec<ContentElement>, ExtractError> {
        if html.len() > self.max_html_bytes {
            return Err(ExtractError::TooLarge {
                size: html.len(),
                limit: self.max_html_bytes,
            });
        }

        let document = Html::parse_fragment(html);
        let mut elements = Vec::new();
        let mut heading_path: Vec<(u8, String)> = Vec::new();
        let mut anchor = String::new();
        let mut emitted = HashSet::new();

        for element in document.root_element().descendent_elements() {
            let tag = element.value().name();

            if let Some(level) = heading_level(tag) {
                let title = element_text(&element);
                while heading_path.last().is_some_and(|(l, _)| *l >= level) {
                    heading_path.pop();
                }
                heading_path.push((level, title));
                heading_anchor(&element).clone_into(&mut anchor);
                continue;
            }

            if !selectors.matches(&element) {
                continue;
            }
            // A significant element nested in another one is already covered
            // by its ancestor's markup and text.
            if element.ancestors().any(|node| emitted.contains(&node.id())) {
                continue;
            }

            let content = element_text(&element);
            if content.is_empty() {
                continue;
            }
            emitted.insert(element.id());

            let position = u32::try_from(elements.len()).unwrap_or(u32::MAX);
            elements.push(ContentElement {
                tag: tag.to_owned(),
                anchor: anchor.clone(),
                html: element.html(),
                content,
                headings: heading_path.iter().map(|(_, t)| t.clone()).collect(),
                custom_ranking: CustomRanking {
                    heading: heading_weight(heading_path.last().map(|(l, _)| *l)),
                    position,
                },
            });
        }

        Ok(elements)
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// The heading's own `id` or `name`, else the first one found on a descendant
/// such as `<h2><a name="x"></a>Title</h2>`.
fn heading_anchor<'a>(heading: &ElementRef<'a>) -> &'a str {
    heading
        .descendent_elements()
        .find_map(|el| {
            let value = el.value();
            [value.attr("id"), value.attr("name")]
                .into_iter()
                .flatten()
                .find(|a| !a.is_empty())
        })
        .unwrap_or_default()
}

/// Shallower headings weigh more: h1 = 100 down to h6 = 50.
fn heading_weight(level: Option<u8>) -> u32 {
    level.map_or(TOP_WEIGHT, |l| TOP_WEIGHT - 10 * u32::from(l.saturating_sub(1)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    collapse_whitespace(&raw)
}

fn collapse_whitespace(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    buf.trim_end().to_owned()
}
