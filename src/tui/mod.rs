//! Ratatui 终端 UI 模块
//!
//! 提供基于 ratatui 的交互界面：参数表单、扫描进度和结果摘要。

pub mod app;
pub mod components;
pub mod event;
pub mod screens;
pub mod state;
pub mod theme;
pub mod ui;

pub use app::TuiApp;
pub use event::{EventPoll, TuiEvent};
pub use state::{AppState, FormField, FormState, InputState, ProgressState, Screen, SummaryState};
pub use theme::{Theme, theme};
pub use ui::render;

/// 是否运行交互模式（无参数时启用）
pub fn should_run_interactive() -> bool {
    std::env::args_os().len() == 1
}
