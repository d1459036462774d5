//! 进度屏幕渲染

use crate::tui::components::{render_hint, truncate_value};
use crate::tui::state::AppState;
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, BorderType, Gauge, Paragraph},
};
use rust_i18n::t;

/// 渲染进度屏幕
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let [progress_area, log_area, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(area);

    let progress = &state.progress_state;
    let gauge = Gauge::default()
        .block(
            Block::bordered()
                .title(t!("scan_progress"))
                .border_type(BorderType::Rounded)
                .border_style(theme().border()),
        )
        .gauge_style(theme().accent())
        .ratio(progress.ratio())
        .label(format!("{}%", progress.percent));
    frame.render_widget(gauge, progress_area);

    // 只显示能放下的最新几行
    let visible = log_area.height.saturating_sub(2) as usize;
    let width = log_area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = progress
        .tail(visible)
        .map(|line| Line::from(truncate_value(line, width)).style(theme().log_line(line)))
        .collect();

    let log = Paragraph::new(lines).block(
        Block::bordered()
            .title(t!("scan_log"))
            .border_type(BorderType::Rounded)
            .border_style(theme().border()),
    );
    frame.render_widget(log, log_area);

    render_hint(&t!("progress_hint"), frame, footer);
}
