//! 摘要屏幕渲染

use crate::scan::Category;
use crate::tui::components::{render_hint, render_title_block, three_panel_layout};
use crate::tui::state::AppState;
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
};
use rust_i18n::t;

/// 渲染摘要屏幕
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let [header, body, footer] = three_panel_layout(area);
    let summary = &state.summary_state;

    let title = if summary.error.is_some() {
        t!("scan_failed_title")
    } else {
        t!("scan_complete_title")
    };
    render_title_block(&title, frame, header);

    let mut lines = Vec::new();

    if let Some(ref result) = summary.result {
        lines.push(Line::from(t!("statistics")).style(theme().title()));
        let rows = [
            (t!("stat_screenshots"), Category::Screenshot),
            (t!("stat_compressed"), Category::Compressed),
            (t!("stat_other"), Category::Other),
            (t!("stat_duplicates"), Category::Duplicate),
            (t!("stat_sorted"), Category::Sorted),
        ];
        for (label, category) in rows {
            lines.push(Line::from(vec![
                Span::from(label),
                Span::raw(": "),
                Span::from(result.count(category).to_string()).style(theme().category(category)),
            ]));
        }
        lines.push(Line::from(vec![
            Span::from(t!("stat_failed")),
            Span::raw(": "),
            Span::from(result.failed.to_string()).style(theme().error()),
        ]));
    }

    if let Some(ref error) = summary.error {
        lines.push(Line::from(""));
        lines.push(Line::from(error.as_str()).style(theme().error().add_modifier(Modifier::BOLD)));
    }

    if let Some(ref log_path) = summary.log_path {
        lines.push(Line::from(""));
        lines.push(
            Line::from(vec![
                Span::from(t!("log_saved_to")),
                Span::raw(" "),
                Span::from(log_path.display().to_string()).style(theme().accent()),
            ])
            .style(theme().hint()),
        );
    }

    let para = Paragraph::new(lines)
        .block(Block::bordered().border_type(BorderType::Rounded))
        .style(theme().normal())
        .wrap(Wrap { trim: true });
    frame.render_widget(para, body);

    render_hint(&t!("summary_hint"), frame, footer);
}
