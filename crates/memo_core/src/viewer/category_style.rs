//! Per-category badge affordances.

use crate::model::locale::Locale;
use crate::model::memo::MemoCategory;

/// Badge palette. Front-ends map these to their own color system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Blue,
    Green,
    Purple,
    Yellow,
    Gray,
}

/// Label and color shown next to a memo title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryBadge {
    pub label: &'static str,
    pub color: BadgeColor,
}

/// Returns the badge for `category`.
pub fn category_badge(category: MemoCategory, locale: Locale) -> CategoryBadge {
    CategoryBadge {
        label: category_label(category, locale),
        color: category_color(category),
    }
}

pub fn category_color(category: MemoCategory) -> BadgeColor {
    match category {
        MemoCategory::Personal => BadgeColor::Blue,
        MemoCategory::Work => BadgeColor::Green,
        MemoCategory::Study => BadgeColor::Purple,
        MemoCategory::Idea => BadgeColor::Yellow,
        MemoCategory::Other => BadgeColor::Gray,
    }
}

pub fn category_label(category: MemoCategory, locale: Locale) -> &'static str {
    match (locale, category) {
        (Locale::Ko, MemoCategory::Personal) => "개인",
        (Locale::Ko, MemoCategory::Work) => "업무",
        (Locale::Ko, MemoCategory::Study) => "학습",
        (Locale::Ko, MemoCategory::Idea) => "아이디어",
        (Locale::Ko, MemoCategory::Other) => "기타",
        (Locale::En, MemoCategory::Personal) => "Personal",
        (Locale::En, MemoCategory::Work) => "Work",
        (Locale::En, MemoCategory::Study) => "Study",
        (Locale::En, MemoCategory::Idea) => "Idea",
        (Locale::En, MemoCategory::Other) => "Other",
    }
}
