//! Interaction state for one open memo.
//!
//! # Responsibility
//! - Track the active memo, its generated summary and the summary guard.
//! - Translate dismissal, edit and delete gestures into caller callbacks.
//! - Build the display model handed to the rendering layer.
//!
//! # Invariants
//! - At most one summary request is in flight per viewer.
//! - Changing the active memo identity clears the summary and makes any
//!   outstanding summary ticket stale.
//! - The escape-key listener exists only while a memo is active.
//! - Delete never reaches the callback without a positive confirmation.

use crate::model::locale::Locale;
use crate::model::memo::{Memo, MemoId};
use crate::summary::client::{SummarizationError, Summarizer};
use crate::viewer::category_style::{category_badge, CategoryBadge};
use crate::viewer::markdown::MarkdownRenderer;
use chrono::{DateTime, Local};
use log::{error, info};

/// Callbacks supplied by the viewer's owner.
pub trait ViewerActions {
    /// The viewer was dismissed.
    fn on_close(&mut self);
    /// The user asked to edit `memo`.
    fn on_edit(&mut self, memo: &Memo);
    /// The user confirmed deletion of `id`.
    fn on_delete(&mut self, id: MemoId);
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    Other,
}

/// Work item for one summary request.
///
/// `run` is `Send`-safe so the request can execute off the UI thread.
#[derive(Debug, Clone)]
pub struct SummaryTicket {
    memo_id: MemoId,
    content: String,
    generation: u64,
}

impl SummaryTicket {
    pub fn memo_id(&self) -> MemoId {
        self.memo_id
    }

    /// Performs the summary request.
    pub fn run(self, summarizer: &dyn Summarizer) -> SummaryCompletion {
        let result = summarizer.summarize(&self.content);
        SummaryCompletion {
            memo_id: self.memo_id,
            generation: self.generation,
            result,
        }
    }
}

/// Result of a finished summary ticket.
#[derive(Debug)]
pub struct SummaryCompletion {
    memo_id: MemoId,
    generation: u64,
    result: Result<String, SummarizationError>,
}

/// What `finish_summary` did with a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The summary is stored and visible.
    Ready,
    /// The request failed; show `alert` to the user.
    Failed { alert: &'static str },
    /// The active memo changed since the ticket was issued; nothing stored.
    Stale,
}

/// Summarize button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeButton {
    pub disabled: bool,
    pub label: &'static str,
}

/// Display model for the active memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerDisplay {
    pub title: String,
    pub badge: CategoryBadge,
    pub created_label: String,
    /// Present only when the memo was edited after creation.
    pub updated_label: Option<String>,
    pub content: String,
    pub summary: Option<String>,
    /// Tags prefixed with `#`, in memo order.
    pub tags: Vec<String>,
    pub summarize_button: SummarizeButton,
}

/// Viewer for a single active memo.
#[derive(Debug, Default)]
pub struct MemoViewer {
    locale: Locale,
    memo: Option<Memo>,
    summary: Option<String>,
    summarizing: bool,
    generation: u64,
}

impl MemoViewer {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Sets the active memo. A different identity resets summary state.
    pub fn show(&mut self, memo: Option<Memo>) {
        let previous_id = self.memo.as_ref().map(|memo| memo.id);
        let next_id = memo.as_ref().map(|memo| memo.id);
        if previous_id != next_id {
            self.summary = None;
            self.summarizing = false;
            self.generation = self.generation.wrapping_add(1);
        }
        self.memo = memo;
    }

    pub fn memo(&self) -> Option<&Memo> {
        self.memo.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.memo.is_some()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn is_summarizing(&self) -> bool {
        self.summarizing
    }

    /// Whether the escape-key listener is currently registered.
    pub fn key_listener_active(&self) -> bool {
        self.memo.is_some()
    }

    /// Dismisses the viewer through the close control.
    pub fn close(&mut self, actions: &mut dyn ViewerActions) {
        if self.memo.is_none() {
            return;
        }
        actions.on_close();
        self.show(None);
    }

    /// Handles a click on the backdrop layer.
    ///
    /// Clicks that bubbled up from the dialog itself do not dismiss.
    pub fn click_backdrop(&mut self, target_is_backdrop: bool, actions: &mut dyn ViewerActions) {
        if target_is_backdrop {
            self.close(actions);
        }
    }

    /// Handles a key press. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: ViewerKey, actions: &mut dyn ViewerActions) -> bool {
        if !self.key_listener_active() || key != ViewerKey::Escape {
            return false;
        }
        self.close(actions);
        true
    }

    /// Forwards the active memo to the edit callback, then closes.
    pub fn edit(&mut self, actions: &mut dyn ViewerActions) {
        let Some(memo) = self.memo.as_ref() else {
            return;
        };
        actions.on_edit(memo);
        self.close(actions);
    }

    /// Asks `confirm` and, when accepted, deletes the active memo and closes.
    ///
    /// Returns whether the delete callback fired.
    pub fn delete(
        &mut self,
        actions: &mut dyn ViewerActions,
        confirm: impl FnOnce(&Memo) -> bool,
    ) -> bool {
        let Some(memo) = self.memo.as_ref() else {
            return false;
        };
        if !confirm(memo) {
            return false;
        }
        let id = memo.id;
        actions.on_delete(id);
        self.close(actions);
        true
    }

    /// Starts a summary request for the active memo.
    ///
    /// Returns `None` when no memo is active or a request is already running.
    pub fn begin_summary(&mut self) -> Option<SummaryTicket> {
        if self.summarizing {
            return None;
        }
        let memo = self.memo.as_ref()?;
        self.summarizing = true;
        self.summary = None;
        Some(SummaryTicket {
            memo_id: memo.id,
            content: memo.content.clone(),
            generation: self.generation,
        })
    }

    /// Applies a finished summary request.
    pub fn finish_summary(&mut self, completion: SummaryCompletion) -> SummaryOutcome {
        if completion.generation != self.generation {
            info!(
                "event=summary_finish module=viewer status=stale memo_id={}",
                completion.memo_id
            );
            return SummaryOutcome::Stale;
        }

        self.summarizing = false;
        match completion.result {
            Ok(summary) => {
                self.summary = Some(summary);
                SummaryOutcome::Ready
            }
            Err(err) => {
                error!(
                    "event=summary_finish module=viewer status=error memo_id={} error={}",
                    completion.memo_id, err
                );
                SummaryOutcome::Failed {
                    alert: summary_alert(self.locale),
                }
            }
        }
    }

    /// Runs a summary request inline. Returns `None` when the guard blocks it.
    pub fn summarize(&mut self, summarizer: &dyn Summarizer) -> Option<SummaryOutcome> {
        let ticket = self.begin_summary()?;
        let completion = ticket.run(summarizer);
        Some(self.finish_summary(completion))
    }

    /// Builds the display model, or `None` when no memo is active.
    pub fn display(&self, renderer: &dyn MarkdownRenderer) -> Option<ViewerDisplay> {
        let memo = self.memo.as_ref()?;
        let (created_prefix, updated_prefix) = match self.locale {
            Locale::Ko => ("작성", "수정"),
            Locale::En => ("Created", "Updated"),
        };

        Some(ViewerDisplay {
            title: memo.title.clone(),
            badge: category_badge(memo.category, self.locale),
            created_label: format!(
                "{created_prefix}: {}",
                format_timestamp(memo.created_at, self.locale)
            ),
            updated_label: memo.is_edited().then(|| {
                format!(
                    "{updated_prefix}: {}",
                    format_timestamp(memo.updated_at, self.locale)
                )
            }),
            content: renderer.render(&memo.content),
            summary: self
                .summary
                .as_deref()
                .map(|summary| renderer.render(summary)),
            tags: memo.tags.iter().map(|tag| format!("#{tag}")).collect(),
            summarize_button: summarize_button(self.summarizing, self.locale),
        })
    }
}

/// Formats epoch milliseconds in local time; out-of-range values print raw.
pub fn format_timestamp(epoch_ms: i64, locale: Locale) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(epoch_ms) else {
        return epoch_ms.to_string();
    };
    let local = utc.with_timezone(&Local);
    match locale {
        Locale::Ko => local.format("%Y년 %-m월 %-d일 %H:%M").to_string(),
        Locale::En => local.format("%B %-d, %Y %H:%M").to_string(),
    }
}

fn summarize_button(summarizing: bool, locale: Locale) -> SummarizeButton {
    let label = match (locale, summarizing) {
        (Locale::Ko, true) => "요약 중...",
        (Locale::Ko, false) => "AI 요약",
        (Locale::En, true) => "Summarizing...",
        (Locale::En, false) => "AI Summary",
    };
    SummarizeButton {
        disabled: summarizing,
        label,
    }
}

fn summary_alert(locale: Locale) -> &'static str {
    match locale {
        Locale::Ko => "메모 요약 중 오류가 발생했습니다.",
        Locale::En => "Something went wrong while summarizing the memo.",
    }
}
