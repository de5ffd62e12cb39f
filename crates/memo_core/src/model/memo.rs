//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record and its writable subset.
//! - Own the closed category set and the "all categories" filter.
//!
//! # Invariants
//! - `id` is stable and never reused for another memo.
//! - `created_at <= updated_at`; equality means the memo was never edited.
//! - Decoding persisted category text is total: unknown text maps to
//!   `MemoCategory::Other`.
//! - Parsing user text (`FromStr`) is strict: unknown names are rejected.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for every memo.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemoId = Uuid;

/// Closed category set for memos.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MemoCategory {
    Personal,
    Work,
    Study,
    Idea,
    /// Catch-all for absent or unrecognized categories.
    #[default]
    Other,
}

impl MemoCategory {
    /// All categories in display order.
    pub const ALL: [MemoCategory; 5] = [
        MemoCategory::Personal,
        MemoCategory::Work,
        MemoCategory::Study,
        MemoCategory::Idea,
        MemoCategory::Other,
    ];

    /// Returns the persisted column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Study => "study",
            Self::Idea => "idea",
            Self::Other => "other",
        }
    }

    /// Maps persisted or user text to a category, falling back to `Other`.
    pub fn from_db_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Self::Personal,
            "work" => Self::Work,
            "study" => Self::Study,
            "idea" => Self::Idea,
            _ => Self::Other,
        }
    }
}

/// Text that names no category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`; expected personal|work|study|idea|other")]
pub struct ParseCategoryError(pub String);

impl FromStr for MemoCategory {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ParseCategoryError(normalized.to_string()))
    }
}

impl From<String> for MemoCategory {
    fn from(value: String) -> Self {
        Self::from_db_lossy(&value)
    }
}

impl Display for MemoCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection used by list filters.
///
/// Replaces the textual `"all"` sentinel with an explicit variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Exact category match.
    Only(MemoCategory),
}

impl CategoryFilter {
    /// Returns whether `category` passes this filter.
    pub fn matches(self, category: MemoCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    /// `all` (any case) is `All`; otherwise the text must name a category.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Canonical memo record as persisted in the `memos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Stable id assigned at creation.
    pub id: MemoId,
    pub title: String,
    /// Markdown source.
    pub content: String,
    pub category: MemoCategory,
    /// Ordered tags; duplicates are kept as given.
    pub tags: Vec<String>,
    /// Unix epoch milliseconds, set once at insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped on every mutation.
    pub updated_at: i64,
}

impl Memo {
    /// Returns whether the memo was updated after its creation.
    pub fn is_edited(&self) -> bool {
        self.created_at != self.updated_at
    }

    /// Returns the writable subset of this memo.
    pub fn form_data(&self) -> MemoFormData {
        MemoFormData {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category,
            tags: self.tags.clone(),
        }
    }
}

/// Writable memo fields used by both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoFormData {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: MemoCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MemoFormData {
    /// Creates form data with default category and no tags.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: MemoCategory::default(),
            tags: Vec::new(),
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: MemoCategory) -> Self {
        self.category = category;
        self
    }

    /// Replaces the tag list.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryFilter, MemoCategory, MemoFormData, ParseCategoryError};

    #[test]
    fn unknown_category_falls_back_to_other() {
        assert_eq!(MemoCategory::from_db_lossy("WORK"), MemoCategory::Work);
        assert_eq!(MemoCategory::from_db_lossy("groceries"), MemoCategory::Other);
        assert_eq!(MemoCategory::from_db_lossy(""), MemoCategory::Other);
    }

    #[test]
    fn all_is_a_filter_not_a_category() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "study".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(MemoCategory::Study)
        );
        assert_eq!(" ALL ".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert!(CategoryFilter::All.matches(MemoCategory::Idea));
        assert!(!CategoryFilter::Only(MemoCategory::Work).matches(MemoCategory::Idea));
    }

    #[test]
    fn parsing_user_text_rejects_unknown_categories() {
        assert_eq!("Work".parse::<MemoCategory>().unwrap(), MemoCategory::Work);
        assert_eq!(
            "shopping".parse::<MemoCategory>().unwrap_err(),
            ParseCategoryError("shopping".to_string())
        );
        assert!("shopping".parse::<CategoryFilter>().is_err());
        assert!("".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn form_data_deserializes_with_defaults() {
        let form: MemoFormData =
            serde_json::from_str(r#"{"title":"t","content":"c"}"#).unwrap();
        assert_eq!(form.category, MemoCategory::Other);
        assert!(form.tags.is_empty());

        let form: MemoFormData =
            serde_json::from_str(r#"{"title":"t","content":"c","category":"shopping"}"#)
                .unwrap();
        assert_eq!(form.category, MemoCategory::Other);
    }
}
