//! TUI 状态模块

pub mod app;
pub mod form;
pub mod input;
pub mod progress;
pub mod selection;
pub mod summary;

pub use app::{AppState, Screen};
pub use form::{FormField, FormState, mode_label};
pub use input::InputState;
pub use progress::{ProgressState, ScanOutcome};
pub use selection::{ModeSelection, Selectable};
pub use summary::SummaryState;
