//! Core domain logic for the memo app.
//! This crate is the single source of truth for memo invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod summary;
pub mod viewer;

pub use config::{ConfigError, MemoConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::locale::Locale;
pub use model::memo::{
    CategoryFilter, Memo, MemoCategory, MemoFormData, MemoId, ParseCategoryError,
};
pub use repo::memo_repo::{
    MemoListQuery, MemoRepository, RepoError, RepoResult, SqliteMemoRepository,
};
pub use service::memo_filter::MemoStats;
pub use service::memo_gateway::{
    MemoGateway, MemoOperation, PersistenceError, PersistenceResult,
};
pub use service::memo_store::{ClearAllCompletion, ClearAllTicket, MemoStore};
pub use summary::client::{HttpSummarizer, SummarizationError, Summarizer};
pub use viewer::category_style::{category_badge, BadgeColor, CategoryBadge};
pub use viewer::markdown::{preview_text, MarkdownRenderer, PlainTextRenderer};
pub use viewer::memo_viewer::{
    MemoViewer, SummaryCompletion, SummaryOutcome, SummaryTicket, ViewerActions, ViewerDisplay,
    ViewerKey,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
