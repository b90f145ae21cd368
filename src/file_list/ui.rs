//! File list UI rendering.

use super::FileListState;
use crate::ui::formatters::{pad_to_width, truncate_to_width};
use crate::ui::ThemeColors;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const HINT: &str = "Select a file to copy its download link";
const EMPTY: &str = "No files found";
const COPY_LABEL: &str = "Copy link";
const COPIED_LABEL: &str = "✓ Copied";
const COPY_ALL_LABEL: &str = "[ Copy all ]";
const COPIED_ALL_LABEL: &str = "[ ✓ Copied all ]";

/// Draw the file list.
pub fn draw_file_list(
    f: &mut Frame<'_>,
    state: &mut FileListState,
    area: Rect,
    colors: &ThemeColors,
) {
    let block = Block::default()
        .title(Span::styled(
            " Files ",
            Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let banner_height = if state.error_message().is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(1),
        ])
        .split(inner);

    draw_header(f, state, chunks[0], colors);

    if let Some(message) = state.error_message() {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!("✗ {}", message),
            Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true });
        f.render_widget(banner, chunks[1]);
    }

    draw_rows(f, state, chunks[2], colors);
}

fn draw_header(f: &mut Frame<'_>, state: &mut FileListState, area: Rect, colors: &ThemeColors) {
    let label = if state.copied_all() {
        COPIED_ALL_LABEL
    } else {
        COPY_ALL_LABEL
    };
    let label_width = (label.width() as u16).min(area.width);

    let button_style = if state.copied_all() {
        Style::default()
            .fg(colors.success)
            .bg(colors.button_bg)
            .add_modifier(Modifier::BOLD)
    } else if state.bulk_copy_enabled() {
        Style::default().fg(colors.text).bg(colors.button_bg)
    } else {
        Style::default()
            .fg(colors.muted)
            .bg(colors.button_bg)
            .add_modifier(Modifier::DIM)
    };

    let hint_width = usize::from(area.width.saturating_sub(label_width + 1));
    let hint = Paragraph::new(Span::styled(
        truncate_to_width(HINT, hint_width),
        Style::default().fg(colors.muted),
    ));
    f.render_widget(hint, area);

    let button_area = Rect {
        x: area.x + area.width - label_width,
        y: area.y,
        width: label_width,
        height: area.height.min(1),
    };
    f.render_widget(
        Paragraph::new(Span::styled(label, button_style)),
        button_area,
    );
    state.copy_all_area = button_area;
}

fn draw_rows(f: &mut Frame<'_>, state: &mut FileListState, area: Rect, colors: &ThemeColors) {
    state.rows_area = area;

    if state.files.is_empty() {
        let empty = Paragraph::new(Span::styled(EMPTY, Style::default().fg(colors.muted)))
            .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let viewport_height = area.height as usize;
    state.adjust_scroll(viewport_height);

    let width = area.width as usize;
    let items: Vec<ListItem<'_>> = state
        .files
        .iter()
        .enumerate()
        .skip(state.scroll)
        .take(viewport_height)
        .map(|(idx, file)| {
            let copied = state.is_copied(&file.key);
            let label = if copied { COPIED_LABEL } else { COPY_LABEL };
            let name_width = width.saturating_sub(label.width() + 2);
            let name = pad_to_width(&truncate_to_width(&file.name, name_width), name_width);

            let selected = idx == state.cursor;
            let row_style = if selected {
                Style::default()
                    .fg(colors.cursor_fg)
                    .bg(colors.cursor_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            let label_style = match (selected, copied) {
                (true, _) => row_style,
                (false, true) => Style::default().fg(colors.success),
                (false, false) => Style::default().fg(colors.muted),
            };

            ListItem::new(Line::from(vec![
                Span::raw(name),
                Span::raw("  "),
                Span::styled(label, label_style),
            ]))
            .style(row_style)
        })
        .collect();

    f.render_widget(List::new(items), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Theme;
    use crate::clipboard::testing::{writer, Recorder};
    use crate::config::Config;
    use crate::file_list::CopyContext;
    use crate::files::FileEntry;
    use crate::links::QueryLinkGenerator;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn render(state: &mut FileListState) -> String {
        let colors = ThemeColors::from_theme(&Theme::GruvboxDark);
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_file_list(f, state, area, &colors);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let mut state = FileListState::new(Vec::new());
        let screen = render(&mut state);
        assert!(screen.contains(EMPTY));
        assert!(screen.contains(COPY_ALL_LABEL));
    }

    #[test]
    fn rows_show_copied_feedback_and_banner() {
        let ok = Recorder::new(true);
        let mut good = writer(&ok);
        let bad_rec = Recorder::new(false);
        let mut bad = writer(&bad_rec);
        let config = Config::new(Some("http://h".into()), "x", "");
        let mut state = FileListState::new(vec![
            FileEntry::new("a", "alpha.txt"),
            FileEntry::new("b", "beta.txt"),
        ]);
        let now = Instant::now();

        state.copy_link(
            1,
            CopyContext {
                config: &config,
                links: &QueryLinkGenerator,
                clipboard: &mut good,
            },
            now,
        );
        let screen = render(&mut state);
        assert!(screen.contains("alpha.txt"));
        assert!(screen.contains(COPY_LABEL));
        assert!(screen.contains(COPIED_LABEL));
        assert!(!screen.contains(EMPTY));

        state.copy_link(
            0,
            CopyContext {
                config: &config,
                links: &QueryLinkGenerator,
                clipboard: &mut bad,
            },
            now,
        );
        let screen = render(&mut state);
        assert!(screen.contains(crate::file_list::COPY_LINK_FAILED));
    }

    #[test]
    fn drawing_records_click_targets() {
        let mut state = FileListState::new(vec![FileEntry::new("a", "alpha.txt")]);
        render(&mut state);

        // border at row 0, header at row 1, first file at row 2
        assert_eq!(state.row_at(5, 2), Some(0));
        assert_eq!(state.row_at(5, 3), None);
        assert!(state.on_copy_all(58 - 2, 1));
        assert!(!state.on_copy_all(5, 1));
    }
}
