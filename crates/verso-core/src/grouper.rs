//! Merges content elements sharing an anchor into fragment groups.

use std::collections::HashMap;

use crate::types::{ContentElement, FragmentGroup};

/// Incremental grouper: groups stay in first-seen-anchor order, one per anchor.
#[derive(Debug, Default)]
pub struct FragmentGrouper {
    groups: Vec<FragmentGroup>,
    by_anchor: HashMap<String, usize>,
}

impl FragmentGrouper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: ContentElement) {
        if let Some(&idx) = self.by_anchor.get(&element.anchor) {
            self.groups[idx].absorb(&element);
        } else {
            self.by_anchor
                .insert(element.anchor.clone(), self.groups.len());
            self.groups.push(FragmentGroup::seed(element));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<FragmentGroup> {
        self.groups
    }
}

impl Extend<ContentElement> for FragmentGrouper {
    fn extend<I: IntoIterator<Item = ContentElement>>(&mut self, iter: I) {
        for element in iter {
            self.push(element);
        }
    }
}

/// Group one record's elements, in document order.
#[must_use]
pub fn group_elements(elements: impl IntoIterator<Item = ContentElement>) -> Vec<FragmentGroup> {
    let mut grouper = FragmentGrouper::new();
    grouper.extend(elements);
    grouper.finish()
}
