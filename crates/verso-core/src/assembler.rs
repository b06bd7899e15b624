//! Combines a canonical record with its fragment groups into index fragments.

use crate::types::{CanonicalRecord, FragmentGroup, IndexFragment};

/// Build one fragment per group, in group order.
///
/// Fragment ids are `{record.object_id}_{i}` for the group's zero-based
/// position; the url gains `#{anchor}` when the group has an anchor. The
/// group's text buffer is dropped.
#[must_use]
pub fn assemble(record: &CanonicalRecord, groups: Vec<FragmentGroup>) -> Vec<IndexFragment> {
    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let url = if group.anchor.is_empty() {
                record.url.clone()
            } else {
                format!("{}#{}", record.url, group.anchor)
            };
            IndexFragment {
                object_id: format!("{}_{i}", record.object_id),
                slug: record.slug.clone(),
                url,
                html: group.html,
                image: record.image.clone(),
                title: record.title.clone(),
                created_at: record.created_at.clone(),
                updated_at: record.updated_at.clone(),
                tags: record.tags.clone(),
                authors: record.authors.clone(),
                anchor: group.anchor,
                headings: group.headings,
                custom_ranking: group.custom_ranking,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomRanking, Taxonomy};

    fn record() -> CanonicalRecord {
        CanonicalRecord {
            object_id: "rec".into(),
            slug: "post".into(),
            url: "https://blog.example/post/".into(),
            html: "<p>ignored</p>".into(),
            image: Some("https://blog.example/cover.png".into()),
            title: "Post".into(),
            created_at: Some("2024-03-01".into()),
            updated_at: Some("2024-03-02".into()),
            tags: vec![Taxonomy::new("Rust", "rust")],
            authors: vec![Taxonomy::new("Ada", "ada")],
        }
    }

    fn group(anchor: &str, html: &str) -> FragmentGroup {
        FragmentGroup {
            anchor: anchor.into(),
            html: html.into(),
            content: "scratch".into(),
            headings: Vec::new(),
            custom_ranking: CustomRanking::default(),
        }
    }

    #[test]
    fn ids_are_sequential_per_record() {
        let fragments = assemble(
            &record(),
            vec![group("", "<p>a</p>"), group("x", "<p>b</p>"), group("y", "<p>c</p>")],
        );
        let ids: Vec<_> = fragments.iter().map(|f| f.object_id.as_str()).collect();
        assert_eq!(ids, ["rec_0", "rec_1", "rec_2"]);
    }

    #[test]
    fn anchor_becomes_deep_link() {
        let fragments = assemble(&record(), vec![group("", "<p>a</p>"), group("setup", "<p>b</p>")]);
        assert_eq!(fragments[0].url, "https://blog.example/post/");
        assert_eq!(fragments[1].url, "https://blog.example/post/#setup");
    }

    #[test]
    fn group_html_replaces_record_html() {
        let fragments = assemble(&record(), vec![group("a", "<p>only this</p>")]);
        let f = &fragments[0];
        assert_eq!(f.html, "<p>only this</p>");
        assert_eq!(f.title, "Post");
        assert_eq!(f.slug, "post");
        assert_eq!(f.tags, vec![Taxonomy::new("Rust", "rust")]);
        assert_eq!(f.image.as_deref(), Some("https://blog.example/cover.png"));
    }

    #[test]
    fn no_groups_no_fragments() {
        assert!(assemble(&record(), Vec::new()).is_empty());
    }
}
