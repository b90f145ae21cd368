//! Application state and logic.

use std::time::Instant;

use crate::clipboard::ClipboardWriter;
use crate::config::Config;
use crate::file_list::{CopyContext, CopyOutcome, FileListState};
use crate::files::FileEntry;
use crate::links::LinkGenerator;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// File list component.
    pub file_list: FileListState,
    /// Bundle configuration.
    pub config: Config,
    /// Link generator.
    pub links: Box<dyn LinkGenerator>,
    /// Clipboard writer.
    pub clipboard: ClipboardWriter,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
}

impl App {
    /// Create a new application instance.
    pub fn new(
        files: Vec<FileEntry>,
        config: Config,
        links: Box<dyn LinkGenerator>,
        clipboard: ClipboardWriter,
    ) -> Self {
        let status = match files.len() {
            0 => "No files in bundle".to_string(),
            1 => "1 file".to_string(),
            n => format!("{} files", n),
        };

        Self {
            file_list: FileListState::new(files),
            config,
            links,
            clipboard,
            status,
            theme: Theme::GruvboxDark,
        }
    }

    fn context(&mut self) -> (&mut FileListState, CopyContext<'_>) {
        (
            &mut self.file_list,
            CopyContext {
                config: &self.config,
                links: &*self.links,
                clipboard: &mut self.clipboard,
            },
        )
    }

    /// Copy the link of the row at `index`.
    pub fn copy_row(&mut self, index: usize, now: Instant) {
        let name = match self.file_list.files.get(index) {
            Some(file) => file.name.clone(),
            None => return,
        };
        self.file_list.cursor = index;

        let (list, ctx) = self.context();
        match list.copy_link(index, ctx, now) {
            CopyOutcome::Copied => self.status = format!("Copied link for {}", name),
            CopyOutcome::Failed(cause) => self.status = format!("Copy failed: {}", cause),
            CopyOutcome::Skipped => {},
        }
    }

    /// Copy the link of the row under the cursor.
    pub fn copy_selected(&mut self, now: Instant) {
        self.copy_row(self.file_list.cursor, now);
    }

    /// Copy links for every file.
    pub fn copy_all(&mut self, now: Instant) {
        let count = self.file_list.files.len();
        let (list, ctx) = self.context();
        match list.copy_all_links(ctx, now) {
            CopyOutcome::Copied => self.status = format!("Copied {} links", count),
            CopyOutcome::Failed(cause) => self.status = format!("Copy failed: {}", cause),
            CopyOutcome::Skipped => {},
        }
    }

    /// Handle a left click at a screen position.
    pub fn click(&mut self, column: u16, row: u16, now: Instant) {
        if self.file_list.on_copy_all(column, row) {
            self.copy_all(now);
        } else if let Some(index) = self.file_list.row_at(column, row) {
            self.copy_row(index, now);
        }
    }

    /// Advance feedback timers.
    pub fn tick(&mut self, now: Instant) {
        self.file_list.tick(now);
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Show key help in the status bar.
    pub fn show_help(&mut self) {
        self.status =
            "Help: q=quit, j/k=nav, Enter/y=copy link, a=copy all, click row=copy, T=theme"
                .to_string();
    }

    /// Release component resources before exit.
    pub fn teardown(&mut self) {
        self.file_list.teardown();
        tracing::debug!("File list torn down");
    }
}
