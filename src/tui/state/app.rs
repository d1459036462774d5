//! 应用状态

use crate::tui::state::{FormState, ProgressState, SummaryState};

/// 屏幕枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// 参数表单
    #[default]
    Form,
    /// 扫描进度
    Progress,
    /// 结果摘要
    Summary,
}

/// 应用状态（包含 UI 状态）
#[derive(Debug, Default)]
pub struct AppState {
    /// 当前屏幕
    pub current_screen: Screen,
    /// 表单状态
    pub form: FormState,
    /// 进度状态
    pub progress_state: ProgressState,
    /// 摘要状态
    pub summary_state: SummaryState,
    /// 是否退出
    pub should_exit: bool,
}

impl AppState {
    /// 使用预填表单创建
    pub fn with_form(form: FormState) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// 回到表单，保留已填写内容
    pub fn back_to_form(&mut self) {
        self.current_screen = Screen::Form;
        self.progress_state = ProgressState::new();
        self.summary_state = SummaryState::default();
        self.form.error_message = None;
    }
}
