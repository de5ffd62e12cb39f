//! Domain model for memos.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep presentation-only concerns (labels, locale) next to the model they
//!   describe.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - Deletion is a hard delete; there is no tombstone or history.

pub mod locale;
pub mod memo;
