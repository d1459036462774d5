//! 各屏幕渲染

pub mod form;
pub mod progress;
pub mod summary;
