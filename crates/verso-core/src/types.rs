use serde::{Deserialize, Serialize};

/// A `{name, slug}` pair, used for both tags and authors.
///
/// Upstream tag and author objects carry many more fields; deserializing
/// into this type keeps only the two the index needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl Taxonomy {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// A published article as delivered by the content platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Taxonomy>,
    #[serde(default)]
    pub authors: Vec<Taxonomy>,
}

/// Normalized projection of a [`SourceDocument`], created once by the selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub slug: String,
    pub url: String,
    pub html: String,
    pub image: Option<String>,
    pub title: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub tags: Vec<Taxonomy>,
    pub authors: Vec<Taxonomy>,
}

/// Ranking hints attached to every element: heading weight and document position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRanking {
    pub heading: u32,
    pub position: u32,
}

/// One significant markup element and the heading it sits under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentElement {
    /// Lower-case tag name (`p`, `pre`, `td`, `li`, ...).
    pub tag: String,
    /// Id of the nearest preceding heading; empty before the first heading.
    pub anchor: String,
    /// Outer markup of the element.
    pub html: String,
    /// Whitespace-collapsed text of the element.
    pub content: String,
    /// Titles of the enclosing heading path, outermost first.
    pub headings: Vec<String>,
    pub custom_ranking: CustomRanking,
}

impl ContentElement {
    #[must_use]
    pub fn is_preformatted(&self) -> bool {
        self.tag == "pre"
    }
}

/// Content merged under one anchor.
///
/// `content` is scratch space for merging and never reaches the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup {
    pub anchor: String,
    pub html: String,
    pub content: String,
    pub headings: Vec<String>,
    pub custom_ranking: CustomRanking,
}

impl FragmentGroup {
    /// Seed a group from the first element seen for an anchor.
    #[must_use]
    pub fn seed(element: ContentElement) -> Self {
        Self {
            anchor: element.anchor,
            html: element.html,
            content: element.content,
            headings: element.headings,
            custom_ranking: element.custom_ranking,
        }
    }

    /// Merge a later element carrying the same anchor.
    ///
    /// Preformatted blocks contribute only their text, space-separated, to
    /// both the markup and the text buffers.
    pub fn absorb(&mut self, element: &ContentElement) {
        if element.is_preformatted() {
            self.html.push(' ');
            self.html.push_str(&element.content);
        } else {
            self.html.push_str(&element.html);
        }
        self.content.push(' ');
        self.content.push_str(&element.content);
    }
}

/// Final search record: one per fragment group per canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFragment {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub slug: String,
    pub url: String,
    pub html: String,
    pub image: Option<String>,
    pub title: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub tags: Vec<Taxonomy>,
    pub authors: Vec<Taxonomy>,
    pub anchor: String,
    pub headings: Vec<String>,
    pub custom_ranking: CustomRanking,
}
