//! 表单屏幕渲染

use crate::tui::components::{render_hint, render_title_block, three_panel_layout, truncate_path};
use crate::tui::state::{AppState, FormField};
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use rust_i18n::t;

/// 标签列宽度
const LABEL_WIDTH: u16 = 18;

/// 渲染表单屏幕
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let [header, body, footer] = three_panel_layout(area);

    render_title_block(&t!("app_title"), frame, header);

    let [fields_area, error_area] =
        Layout::vertical([Constraint::Length(3 * FormField::ALL.len() as u16), Constraint::Min(1)])
            .areas(body);
    let rows = Layout::vertical(FormField::ALL.map(|_| Constraint::Length(3))).split(fields_area);

    let form = &state.form;
    for (field, row) in FormField::ALL.iter().zip(rows.iter()) {
        let focused = *field == form.focus;
        let [label_area, value_area] =
            Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)]).areas(*row);

        let label_style = if focused { theme().title() } else { theme().hint() };
        let label = Paragraph::new(Line::from(field.label()).style(label_style))
            .block(Block::new().padding(ratatui::widgets::Padding::top(1)));
        frame.render_widget(label, label_area);

        if *field == FormField::Start {
            let style = if focused { theme().selected() } else { theme().normal() };
            let button = Paragraph::new(Line::from(format!(" {} ", t!("start_scan"))).centered())
                .style(style)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(theme().border()),
                );
            frame.render_widget(button, value_area);
            continue;
        }

        let inner_width = value_area.width.saturating_sub(2) as usize;
        let value = form.value_of(*field);
        let shown = if field.is_input_field() && !focused {
            truncate_path(&value, inner_width)
        } else {
            value
        };

        let border_style = if focused { theme().title() } else { theme().border() };
        let widget = Paragraph::new(Span::from(shown))
            .style(theme().normal())
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(border_style),
            );
        frame.render_widget(widget, value_area);

        // 光标位置
        if focused && field.is_input_field() {
            let input = match field {
                FormField::Staging => &form.staging,
                _ => &form.archive,
            };
            let cursor_x = value_area.x + 1 + input.visual_cursor_position() as u16;
            if cursor_x < value_area.x + value_area.width.saturating_sub(1) {
                frame.set_cursor_position(Position {
                    x: cursor_x,
                    y: value_area.y + 1,
                });
            }
        }
    }

    if let Some(ref error) = form.error_message {
        let error_line = Paragraph::new(Line::from(error.as_str()).style(theme().error()))
            .wrap(ratatui::widgets::Wrap { trim: true });
        frame.render_widget(error_line, error_area);
    }

    render_hint(&t!("form_hint"), frame, footer);
}
