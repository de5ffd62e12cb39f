//! Storage gateway over memo repositories.
//!
//! # Responsibility
//! - Expose the memo CRUD contract used by the session store and front-ends.
//! - Log technical failure detail and hand callers a sanitized error.
//!
//! # Invariants
//! - Single-record read misses are `Ok(None)`, never errors.
//! - Deleting a missing id succeeds.
//! - Updating a missing id fails with `PersistenceError`.
//! - Log lines carry ids and counts only, never memo text.

use crate::model::locale::Locale;
use crate::model::memo::{CategoryFilter, Memo, MemoFormData, MemoId};
use crate::repo::memo_repo::{MemoListQuery, MemoRepository, RepoError, RepoResult};
use log::{debug, error};
use std::time::Instant;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Gateway operation, used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoOperation {
    ListAll,
    GetById,
    Create,
    Update,
    Delete,
    ListByCategory,
    Search,
    ClearAll,
}

impl MemoOperation {
    /// Localized failure message for this operation.
    pub fn user_message(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (
                Locale::Ko,
                MemoOperation::ListAll | MemoOperation::GetById | MemoOperation::ListByCategory,
            ) => "메모를 불러오는데 실패했습니다.",
            (Locale::Ko, MemoOperation::Create) => "메모 생성에 실패했습니다.",
            (Locale::Ko, MemoOperation::Update) => "메모 수정에 실패했습니다.",
            (Locale::Ko, MemoOperation::Delete | MemoOperation::ClearAll) => {
                "메모 삭제에 실패했습니다."
            }
            (Locale::Ko, MemoOperation::Search) => "메모 검색에 실패했습니다.",
            (
                Locale::En,
                MemoOperation::ListAll | MemoOperation::GetById | MemoOperation::ListByCategory,
            ) => "Failed to load memos.",
            (Locale::En, MemoOperation::Create) => "Failed to create the memo.",
            (Locale::En, MemoOperation::Update) => "Failed to update the memo.",
            (Locale::En, MemoOperation::Delete | MemoOperation::ClearAll) => {
                "Failed to delete memos."
            }
            (Locale::En, MemoOperation::Search) => "Failed to search memos.",
        }
    }

    fn event_name(self) -> &'static str {
        match self {
            Self::ListAll => "memo_list",
            Self::GetById => "memo_get",
            Self::Create => "memo_create",
            Self::Update => "memo_update",
            Self::Delete => "memo_delete",
            Self::ListByCategory => "memo_list_by_category",
            Self::Search => "memo_search",
            Self::ClearAll => "memo_clear_all",
        }
    }
}

/// Remote-store failure surfaced to callers.
///
/// `Display` renders the English user message; the technical cause stays
/// reachable through `source()` and the gateway's error log.
#[derive(Debug, thiserror::Error)]
#[error("{}", .operation.user_message(Locale::En))]
pub struct PersistenceError {
    operation: MemoOperation,
    #[source]
    source: RepoError,
}

impl PersistenceError {
    pub fn new(operation: MemoOperation, source: RepoError) -> Self {
        Self { operation, source }
    }

    /// Operation that failed.
    pub fn operation(&self) -> MemoOperation {
        self.operation
    }

    /// Underlying repository failure.
    pub fn cause(&self) -> &RepoError {
        &self.source
    }

    /// Localized, sanitized message suitable for display.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        self.operation.user_message(locale)
    }
}

/// Memo storage gateway.
pub struct MemoGateway<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoGateway<R> {
    /// Creates a gateway over the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all memos, newest first.
    pub fn list_all(&self) -> PersistenceResult<Vec<Memo>> {
        self.run(MemoOperation::ListAll, None, || {
            self.repo.list_memos(&MemoListQuery::all())
        })
    }

    /// Gets one memo, or `None` when no row matches.
    pub fn get_by_id(&self, id: MemoId) -> PersistenceResult<Option<Memo>> {
        self.run(MemoOperation::GetById, Some(id), || {
            match self.repo.get_memo(id) {
                Err(RepoError::NotFound(_)) => Ok(None),
                other => other,
            }
        })
    }

    /// Inserts a memo and returns the fully populated entity.
    pub fn create(&self, form: &MemoFormData) -> PersistenceResult<Memo> {
        self.run(MemoOperation::Create, None, || self.repo.insert_memo(form))
    }

    /// Overwrites title, content, category and tags of one memo.
    pub fn update(&self, id: MemoId, form: &MemoFormData) -> PersistenceResult<Memo> {
        self.run(MemoOperation::Update, Some(id), || {
            self.repo.update_memo(id, form)
        })
    }

    /// Deletes one memo. Missing ids are not an error.
    pub fn delete(&self, id: MemoId) -> PersistenceResult<()> {
        self.run(MemoOperation::Delete, Some(id), || {
            self.repo.delete_memo(id).map(|_| ())
        })
    }

    /// Lists memos for one category, or all memos for `CategoryFilter::All`.
    pub fn list_by_category(&self, filter: CategoryFilter) -> PersistenceResult<Vec<Memo>> {
        self.run(MemoOperation::ListByCategory, None, || {
            self.repo.list_memos(&MemoListQuery::by_category(filter))
        })
    }

    /// Lists memos whose title or content contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> PersistenceResult<Vec<Memo>> {
        self.run(MemoOperation::Search, None, || {
            self.repo.list_memos(&MemoListQuery::search(query))
        })
    }

    /// Deletes every memo and returns how many rows were removed.
    pub fn clear_all(&self) -> PersistenceResult<usize> {
        self.run(MemoOperation::ClearAll, None, || self.repo.delete_all())
    }

    fn run<T>(
        &self,
        operation: MemoOperation,
        id: Option<MemoId>,
        call: impl FnOnce() -> RepoResult<T>,
    ) -> PersistenceResult<T> {
        let started_at = Instant::now();
        let id_text = id.map_or_else(|| "-".to_string(), |id| id.to_string());
        match call() {
            Ok(value) => {
                debug!(
                    "event={} module=gateway status=ok memo_id={} duration_ms={}",
                    operation.event_name(),
                    id_text,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event={} module=gateway status=error memo_id={} duration_ms={} error={}",
                    operation.event_name(),
                    id_text,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(PersistenceError::new(operation, err))
            }
        }
    }
}
