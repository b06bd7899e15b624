use serde::{Deserialize, Serialize};

/// Index configuration pushed before fragments are written.
///
/// The defaults make the index return at most one hit per article, rank
/// shallower headings first and earlier content next, and allow filtering by
/// slug so an article's fragments can be deleted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    #[serde(default = "default_distinct")]
    pub distinct: bool,
    #[serde(default = "default_attribute_for_distinct")]
    pub attribute_for_distinct: String,
    #[serde(default = "default_custom_ranking")]
    pub custom_ranking: Vec<String>,
    #[serde(default = "default_searchable_attributes")]
    pub searchable_attributes: Vec<String>,
    #[serde(default = "default_attributes_for_faceting")]
    pub attributes_for_faceting: Vec<String>,
}

fn default_distinct() -> bool {
    true
}

fn default_attribute_for_distinct() -> String {
    "slug".into()
}

fn default_custom_ranking() -> Vec<String> {
    to_strings(&["desc(customRanking.heading)", "asc(customRanking.position)"])
}

fn default_searchable_attributes() -> Vec<String> {
    to_strings(&[
        "title",
        "headings",
        "html",
        "url",
        "tags.name",
        "tags",
        "authors.name",
        "authors",
    ])
}

fn default_attributes_for_faceting() -> Vec<String> {
    to_strings(&["filterOnly(slug)"])
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            distinct: default_distinct(),
            attribute_for_distinct: default_attribute_for_distinct(),
            custom_ranking: default_custom_ranking(),
            searchable_attributes: default_searchable_attributes(),
            attributes_for_faceting: default_attributes_for_faceting(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_serializes_to_service_names() {
        let json = serde_json::to_value(IndexSettings::default()).unwrap();
        assert_eq!(json["distinct"], true);
        assert_eq!(json["attributeForDistinct"], "slug");
        assert_eq!(
            json["customRanking"],
            serde_json::json!(["desc(customRanking.heading)", "asc(customRanking.position)"])
        );
        assert_eq!(json["searchableAttributes"][0], "title");
        assert_eq!(json["searchableAttributes"].as_array().unwrap().len(), 8);
        assert_eq!(json["attributesForFaceting"], serde_json::json!(["filterOnly(slug)"]));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let settings: IndexSettings =
            serde_json::from_str(r#"{"searchableAttributes":["title"]}"#).unwrap();
        assert_eq!(settings.searchable_attributes, ["title"]);
        assert!(settings.distinct);
        assert_eq!(settings.attribute_for_distinct, "slug");
    }
}
