//! File list feature - copying download links for the files of a bundle.
//!
//! This module contains the list state and the copy actions. Rendering lives
//! in [`ui`].

pub mod ui;

use std::time::Instant;

use ratatui::layout::Rect;

use crate::clipboard::ClipboardWriter;
use crate::config::{Config, COPIED_FEEDBACK};
use crate::files::FileEntry;
use crate::links::{format_links_text, LinkGenerator};
use crate::timer::{TimerHandle, Timers};

/// Banner shown when a single link could not be copied.
pub const COPY_LINK_FAILED: &str = "Failed to copy link, please copy it manually";

/// Banner shown when the bulk copy failed.
pub const COPY_ALL_FAILED: &str = "Failed to copy all links";

/// Which item currently shows "copied" feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Copied {
    /// A single file, by key.
    File(String),
    /// The whole list.
    All,
}

/// Result of a copy action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text reached the clipboard.
    Copied,
    /// The action failed; carries the cause for the status bar.
    Failed(String),
    /// The action was not available (disabled control, no such row).
    Skipped,
}

/// Collaborators a copy action needs.
#[derive(Debug)]
pub struct CopyContext<'a> {
    /// Bundle configuration.
    pub config: &'a Config,
    /// Link generator.
    pub links: &'a dyn LinkGenerator,
    /// Clipboard writer.
    pub clipboard: &'a mut ClipboardWriter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feedback {
    ClearCopied,
    ReleaseBulk,
}

/// File list state.
#[derive(Debug)]
pub struct FileListState {
    /// Files in display order.
    pub files: Vec<FileEntry>,
    /// Cursor position.
    pub cursor: usize,
    /// Scroll offset.
    pub scroll: usize,
    copied: Option<Copied>,
    error_message: Option<String>,
    bulk_copying: bool,
    timers: Timers<Feedback>,
    clear_copied: Option<TimerHandle>,
    release_bulk: Option<TimerHandle>,
    /// Screen area of the rows, set while drawing.
    pub(crate) rows_area: Rect,
    /// Screen area of the "copy all" control, set while drawing.
    pub(crate) copy_all_area: Rect,
}

impl FileListState {
    /// Create a list state for `files`.
    pub fn new(files: Vec<FileEntry>) -> Self {
        Self {
            files,
            cursor: 0,
            scroll: 0,
            copied: None,
            error_message: None,
            bulk_copying: false,
            timers: Timers::new(),
            clear_copied: None,
            release_bulk: None,
            rows_area: Rect::default(),
            copy_all_area: Rect::default(),
        }
    }

    /// Current copied marker.
    pub fn copied(&self) -> Option<&Copied> {
        self.copied.as_ref()
    }

    /// Whether the row with `key` shows "copied".
    pub fn is_copied(&self, key: &str) -> bool {
        matches!(&self.copied, Some(Copied::File(k)) if k == key)
    }

    /// Whether the whole list shows "copied".
    pub fn copied_all(&self) -> bool {
        self.copied == Some(Copied::All)
    }

    /// Error banner text.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether a bulk copy is in progress.
    pub fn bulk_copying(&self) -> bool {
        self.bulk_copying
    }

    /// Whether the "copy all" control is enabled.
    pub fn bulk_copy_enabled(&self) -> bool {
        !self.bulk_copying && !self.files.is_empty()
    }

    /// Copy the download link of the file at `index`.
    pub fn copy_link(&mut self, index: usize, mut ctx: CopyContext<'_>, now: Instant) -> CopyOutcome {
        let Some(file) = self.files.get(index).cloned() else {
            return CopyOutcome::Skipped;
        };

        self.error_message = None;

        let api_base = match ctx.config.api_base() {
            Ok(base) => base,
            Err(e) => {
                tracing::error!("Copying link for {} failed: {}", file.key, e);
                self.error_message = Some(COPY_LINK_FAILED.to_string());
                return CopyOutcome::Failed(e.to_string());
            },
        };

        let url = ctx
            .links
            .download_link(api_base, &ctx.config.xtlink, &file.key, &ctx.config.password);

        if !ctx.clipboard.copy(&url) {
            tracing::error!("Copying link for {} failed: clipboard write failed", file.key);
            self.error_message = Some(COPY_LINK_FAILED.to_string());
            return CopyOutcome::Failed("clipboard write failed".to_string());
        }

        tracing::info!("Copied download link for {}", file.key);
        self.copied = Some(Copied::File(file.key));
        self.restart_clear_timer(now);
        CopyOutcome::Copied
    }

    /// Copy the download links of every file as `name: url` pairs.
    pub fn copy_all_links(&mut self, mut ctx: CopyContext<'_>, now: Instant) -> CopyOutcome {
        if !self.bulk_copy_enabled() {
            return CopyOutcome::Skipped;
        }

        self.error_message = None;
        self.bulk_copying = true;

        let api_base = match ctx.config.api_base() {
            Ok(base) => base,
            Err(e) => {
                tracing::error!("Copying all links failed: {}", e);
                self.fail_bulk();
                return CopyOutcome::Failed(e.to_string());
            },
        };

        let links =
            ctx.links
                .download_links(api_base, &ctx.config.xtlink, &self.files, &ctx.config.password);
        let text = format_links_text(&links);

        if !ctx.clipboard.copy(&text) {
            tracing::error!("Copying all links failed: clipboard write failed");
            self.fail_bulk();
            return CopyOutcome::Failed("clipboard write failed".to_string());
        }

        tracing::info!("Copied {} download links", links.len());
        self.copied = Some(Copied::All);
        self.restart_clear_timer(now);
        if let Some(handle) = self.release_bulk.take() {
            self.timers.cancel(handle);
        }
        self.release_bulk = Some(self.timers.schedule(now, COPIED_FEEDBACK, Feedback::ReleaseBulk));
        CopyOutcome::Copied
    }

    /// Apply feedback timers that are due.
    pub fn tick(&mut self, now: Instant) {
        for action in self.timers.take_due(now) {
            match action {
                Feedback::ClearCopied => {
                    self.copied = None;
                    self.clear_copied = None;
                },
                Feedback::ReleaseBulk => {
                    self.bulk_copying = false;
                    self.release_bulk = None;
                },
            }
        }
    }

    /// Cancel pending feedback timers.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.clear_copied = None;
        self.release_bulk = None;
    }

    fn restart_clear_timer(&mut self, now: Instant) {
        if let Some(handle) = self.clear_copied.take() {
            self.timers.cancel(handle);
        }
        self.clear_copied = Some(self.timers.schedule(now, COPIED_FEEDBACK, Feedback::ClearCopied));
    }

    fn fail_bulk(&mut self) {
        self.error_message = Some(COPY_ALL_FAILED.to_string());
        self.bulk_copying = false;
    }

    /// Move cursor up.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor down.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.files.len() {
            self.cursor += 1;
        }
    }

    /// Jump to the first row.
    pub fn goto_first(&mut self) {
        self.cursor = 0;
    }

    /// Jump to the last row.
    pub fn goto_last(&mut self) {
        self.cursor = self.files.len().saturating_sub(1);
    }

    /// Get the file under the cursor.
    pub fn current_file(&self) -> Option<&FileEntry> {
        self.files.get(self.cursor)
    }

    /// Adjust scroll to keep cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }

        if self.cursor >= self.scroll + viewport_height {
            self.scroll = self.cursor.saturating_sub(viewport_height - 1);
        }
    }

    /// Map a screen position to a row index.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        if !contains(self.rows_area, column, row) {
            return None;
        }
        let index = self.scroll + usize::from(row - self.rows_area.y);
        (index < self.files.len()).then_some(index)
    }

    /// Whether a screen position is on the "copy all" control.
    pub fn on_copy_all(&self, column: u16, row: u16) -> bool {
        contains(self.copy_all_area, column, row)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

impl Default for FileListState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
