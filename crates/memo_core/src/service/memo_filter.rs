//! Local filter and statistics derivations over a memo snapshot.
//!
//! # Invariants
//! - Category filter runs first, text filter second, combined with AND.
//! - A blank (whitespace-only) query disables the text filter.
//! - Text matching is case-insensitive over title, content and every tag.

use crate::model::memo::{CategoryFilter, Memo, MemoCategory};
use std::collections::BTreeMap;

/// Counts derived from a memo snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Number of memos in the snapshot.
    pub total: usize,
    /// Number of memos per category; only categories present in the snapshot.
    pub by_category: BTreeMap<MemoCategory, usize>,
    /// Number of memos in the current filtered view.
    pub filtered: usize,
}

/// Returns whether `memo` passes both the category filter and text query.
pub fn memo_matches(memo: &Memo, category: CategoryFilter, query: &str) -> bool {
    if !category.matches(memo.category) {
        return false;
    }
    if query.trim().is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    memo.title.to_lowercase().contains(&needle)
        || memo.content.to_lowercase().contains(&needle)
        || memo
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Returns indices of memos passing the filters, in snapshot order.
pub fn filter_indices(memos: &[Memo], category: CategoryFilter, query: &str) -> Vec<usize> {
    memos
        .iter()
        .enumerate()
        .filter(|(_, memo)| memo_matches(memo, category, query))
        .map(|(index, _)| index)
        .collect()
}

/// Builds statistics for a snapshot and the size of its filtered view.
pub fn compute_stats(memos: &[Memo], filtered: usize) -> MemoStats {
    let mut by_category = BTreeMap::new();
    for memo in memos {
        *by_category.entry(memo.category).or_insert(0) += 1;
    }

    MemoStats {
        total: memos.len(),
        by_category,
        filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_stats, filter_indices, memo_matches};
    use crate::model::memo::{CategoryFilter, Memo, MemoCategory};
    use uuid::Uuid;

    fn memo(title: &str, content: &str, category: MemoCategory, tags: &[&str]) -> Memo {
        Memo {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            category,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn query_matches_title_content_or_tag_ignoring_case() {
        let by_title = memo("Project PLAN", "", MemoCategory::Work, &[]);
        let by_content = memo("x", "we plan to ship", MemoCategory::Work, &[]);
        let by_tag = memo("x", "y", MemoCategory::Work, &["Planning"]);
        let miss = memo("x", "y", MemoCategory::Work, &["z"]);

        let all = CategoryFilter::All;
        assert!(memo_matches(&by_title, all, "plan"));
        assert!(memo_matches(&by_content, all, "PLAN"));
        assert!(memo_matches(&by_tag, all, "plan"));
        assert!(!memo_matches(&miss, all, "plan"));
    }

    #[test]
    fn category_and_query_are_combined_with_and() {
        let memos = vec![
            memo("plan", "", MemoCategory::Work, &[]),
            memo("plan", "", MemoCategory::Personal, &[]),
            memo("other", "", MemoCategory::Work, &[]),
        ];

        let indices = filter_indices(&memos, CategoryFilter::Only(MemoCategory::Work), "plan");
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn blank_query_disables_text_filter() {
        let memos = vec![memo("a", "", MemoCategory::Idea, &[])];
        assert_eq!(filter_indices(&memos, CategoryFilter::All, "   "), vec![0]);
    }

    #[test]
    fn stats_count_only_present_categories() {
        let memos = vec![
            memo("a", "", MemoCategory::Idea, &[]),
            memo("b", "", MemoCategory::Idea, &[]),
            memo("c", "", MemoCategory::Study, &[]),
        ];
        let stats = compute_stats(&memos, 2);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.filtered, 2);
        assert_eq!(stats.by_category.get(&MemoCategory::Idea), Some(&2));
        assert_eq!(stats.by_category.get(&MemoCategory::Study), Some(&1));
        assert!(!stats.by_category.contains_key(&MemoCategory::Work));
    }
}
