//! Session-owned memo snapshot.
//!
//! # Responsibility
//! - Hold the authoritative in-memory memo list for one session.
//! - Route every mutation through the storage gateway before touching the list.
//! - Keep the filtered view and statistics in sync with list, query and filter.
//!
//! # Invariants
//! - Only `MemoStore` mutates its list; readers get shared references.
//! - The derived view is recomputed after every list, query or filter change.
//! - Load/refresh failures are logged and never surface to callers.
//! - Create/update/delete/clear failures propagate and leave the list untouched.
//! - `is_loading()` stays true between `begin_clear_all` and `finish_clear_all`.

use crate::model::memo::{CategoryFilter, Memo, MemoFormData, MemoId};
use crate::repo::memo_repo::MemoRepository;
use crate::service::memo_filter::{compute_stats, filter_indices, MemoStats};
use crate::service::memo_gateway::{MemoGateway, PersistenceResult};
use log::{info, warn};

/// Work item for one bulk delete, issued by [`MemoStore::begin_clear_all`].
#[derive(Debug)]
#[must_use = "a pending bulk delete stays pending until its completion is applied"]
pub struct ClearAllTicket {
    _private: (),
}

impl ClearAllTicket {
    /// Performs the bulk delete through `gateway`.
    ///
    /// Only needs shared access, so it can run while the store is read.
    pub fn run<R: MemoRepository>(self, gateway: &MemoGateway<R>) -> ClearAllCompletion {
        ClearAllCompletion {
            result: gateway.clear_all(),
        }
    }
}

/// Result of a finished [`ClearAllTicket`].
#[derive(Debug)]
pub struct ClearAllCompletion {
    result: PersistenceResult<usize>,
}

/// In-memory memo cache with local filtering.
pub struct MemoStore<R: MemoRepository> {
    gateway: MemoGateway<R>,
    memos: Vec<Memo>,
    loading: bool,
    pending: bool,
    search_query: String,
    category_filter: CategoryFilter,
    filtered: Vec<usize>,
    stats: MemoStats,
}

impl<R: MemoRepository> MemoStore<R> {
    /// Creates an empty store in loading state. Call [`MemoStore::load`] next.
    pub fn new(gateway: MemoGateway<R>) -> Self {
        Self {
            gateway,
            memos: Vec::new(),
            loading: true,
            pending: false,
            search_query: String::new(),
            category_filter: CategoryFilter::All,
            filtered: Vec::new(),
            stats: MemoStats::default(),
        }
    }

    /// Creates a store and performs the initial load.
    pub fn open(gateway: MemoGateway<R>) -> Self {
        let mut store = Self::new(gateway);
        store.load();
        store
    }

    /// Fetches all memos once. Failures leave the list empty.
    pub fn load(&mut self) {
        self.loading = true;
        match self.gateway.list_all() {
            Ok(memos) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    memos.len()
                );
                self.memos = memos;
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error={}",
                    err.cause()
                );
                self.memos.clear();
            }
        }
        self.loading = false;
        self.recompute();
    }

    /// Re-fetches all memos. Failures leave the current list unchanged.
    pub fn refresh(&mut self) {
        self.loading = true;
        match self.gateway.list_all() {
            Ok(memos) => {
                info!(
                    "event=store_refresh module=store status=ok count={}",
                    memos.len()
                );
                self.memos = memos;
                self.recompute();
            }
            Err(err) => {
                warn!(
                    "event=store_refresh module=store status=error error={}",
                    err.cause()
                );
            }
        }
        self.loading = false;
    }

    /// Creates a memo and prepends it to the list.
    pub fn create(&mut self, form: &MemoFormData) -> PersistenceResult<Memo> {
        let memo = self.gateway.create(form)?;
        self.memos.insert(0, memo.clone());
        self.recompute();
        Ok(memo)
    }

    /// Updates a memo and replaces it in place.
    pub fn update(&mut self, id: MemoId, form: &MemoFormData) -> PersistenceResult<Memo> {
        let updated = self.gateway.update(id, form)?;
        if let Some(slot) = self.memos.iter_mut().find(|memo| memo.id == id) {
            *slot = updated.clone();
        }
        self.recompute();
        Ok(updated)
    }

    /// Deletes a memo and removes it from the list.
    pub fn delete(&mut self, id: MemoId) -> PersistenceResult<()> {
        self.gateway.delete(id)?;
        self.memos.retain(|memo| memo.id != id);
        self.recompute();
        Ok(())
    }

    /// Sets the local text query. Does not contact storage.
    pub fn search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.recompute();
    }

    /// Sets the local category filter. Does not contact storage.
    pub fn filter_by_category(&mut self, filter: CategoryFilter) {
        self.category_filter = filter;
        self.recompute();
    }

    /// Deletes every memo, then resets list, query and filter to defaults.
    ///
    /// Runs [`MemoStore::begin_clear_all`], the ticket and
    /// [`MemoStore::finish_clear_all`] back to back.
    pub fn clear_all(&mut self) -> PersistenceResult<usize> {
        let ticket = self.begin_clear_all();
        let completion = ticket.run(&self.gateway);
        self.finish_clear_all(completion)
    }

    /// Marks a bulk delete as pending and hands out the work item.
    ///
    /// `is_loading()` reports true until the completion is applied.
    pub fn begin_clear_all(&mut self) -> ClearAllTicket {
        self.pending = true;
        info!("event=store_clear_all module=store status=start");
        ClearAllTicket { _private: () }
    }

    /// Applies a finished bulk delete.
    ///
    /// On success list, query and filter are reset. On failure they are left
    /// unchanged. `pending` is cleared either way.
    pub fn finish_clear_all(&mut self, completion: ClearAllCompletion) -> PersistenceResult<usize> {
        self.pending = false;
        let removed = completion.result?;
        self.memos.clear();
        self.search_query.clear();
        self.category_filter = CategoryFilter::All;
        self.recompute();
        info!("event=store_clear_all module=store status=ok removed={removed}");
        Ok(removed)
    }

    /// Memos passing the current filters, in list order.
    pub fn memos(&self) -> Vec<&Memo> {
        self.filtered
            .iter()
            .filter_map(|index| self.memos.get(*index))
            .collect()
    }

    /// Every memo in the snapshot, newest first.
    pub fn all_memos(&self) -> &[Memo] {
        &self.memos
    }

    /// Looks up a memo in the snapshot without contacting storage.
    pub fn memo(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    /// True while an initial load, refresh or bulk operation is running.
    pub fn is_loading(&self) -> bool {
        self.loading || self.pending
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn category_filter(&self) -> CategoryFilter {
        self.category_filter
    }

    pub fn stats(&self) -> &MemoStats {
        &self.stats
    }

    /// Storage gateway, for server-side queries that bypass the snapshot.
    pub fn gateway(&self) -> &MemoGateway<R> {
        &self.gateway
    }

    fn recompute(&mut self) {
        self.filtered = filter_indices(&self.memos, self.category_filter, &self.search_query);
        self.stats = compute_stats(&self.memos, self.filtered.len());
    }
}
