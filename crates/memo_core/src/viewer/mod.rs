//! Memo viewer interaction logic.
//!
//! # Responsibility
//! - Model modal semantics (dismissal, confirmation) without a UI toolkit.
//! - Own per-category affordances and the markdown rendering seam.

pub mod category_style;
pub mod markdown;
pub mod memo_viewer;
