//! 扫描表单状态

use super::input::InputState;
use super::selection::{ModeSelection, Selectable};
use crate::config::Config;
use std::path::PathBuf;

/// 表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    /// 暂存目录
    #[default]
    Staging,
    /// 归档目录
    Archive,
    /// 扫描模式
    Mode,
    /// 开始按钮
    Start,
}

impl FormField {
    /// 全部字段（显示顺序）
    pub const ALL: [FormField; 4] = [
        FormField::Staging,
        FormField::Archive,
        FormField::Mode,
        FormField::Start,
    ];

    /// 是否文本输入字段
    pub fn is_input_field(&self) -> bool {
        matches!(self, FormField::Staging | FormField::Archive)
    }

    /// 字段标签
    pub fn label(&self) -> String {
        match self {
            FormField::Staging => rust_i18n::t!("field_staging").to_string(),
            FormField::Archive => rust_i18n::t!("field_archive").to_string(),
            FormField::Mode => rust_i18n::t!("field_mode").to_string(),
            FormField::Start => rust_i18n::t!("field_start").to_string(),
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// 模式显示文本
pub fn mode_label(mode: crate::config::ScanMode) -> String {
    match mode {
        crate::config::ScanMode::Full => rust_i18n::t!("mode_full").to_string(),
        crate::config::ScanMode::Duplicates => rust_i18n::t!("mode_duplicates").to_string(),
        crate::config::ScanMode::Trash => rust_i18n::t!("mode_trash").to_string(),
    }
}

/// 表单状态
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// 暂存目录输入
    pub staging: InputState,
    /// 归档目录输入
    pub archive: InputState,
    /// 模式选择
    pub mode: ModeSelection,
    /// 当前焦点
    pub focus: FormField,
    /// 校验错误
    pub error_message: Option<String>,
    /// 表单未展示的配置项（排除目录等）原样保留
    base: Config,
}

impl FormState {
    /// 从已有配置预填
    pub fn from_config(config: &Config) -> Self {
        Self {
            staging: InputState::with_value(&config.staging_dir.display().to_string()),
            archive: InputState::with_value(&config.archive_dir.display().to_string()),
            mode: ModeSelection::with_mode(config.mode),
            focus: FormField::Staging,
            error_message: None,
            base: config.clone(),
        }
    }

    /// 焦点下移
    pub fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    /// 焦点上移
    pub fn focus_prev(&mut self) {
        let len = FormField::ALL.len();
        let prev = (self.focus.index() + len - 1) % len;
        self.focus = FormField::ALL[prev];
    }

    /// 当前聚焦的输入框
    pub fn focused_input(&mut self) -> Option<&mut InputState> {
        match self.focus {
            FormField::Staging => Some(&mut self.staging),
            FormField::Archive => Some(&mut self.archive),
            _ => None,
        }
    }

    /// 切换模式
    pub fn next_mode(&mut self) {
        self.mode.next();
    }

    /// 反向切换模式
    pub fn prev_mode(&mut self) {
        self.mode.prev();
    }

    /// 字段显示值
    pub fn value_of(&self, field: FormField) -> String {
        match field {
            FormField::Staging => self.staging.value().to_string(),
            FormField::Archive => self.archive.value().to_string(),
            FormField::Mode => format!("◀ {} ▶", mode_label(self.mode.mode())),
            FormField::Start => String::new(),
        }
    }

    /// 构建配置（去除首尾空白和引号）
    pub fn build_config(&self) -> Config {
        Config {
            staging_dir: clean_path(self.staging.value()),
            archive_dir: clean_path(self.archive.value()),
            mode: self.mode.mode(),
            ..self.base.clone()
        }
    }
}

/// 去掉粘贴路径常见的引号和空白
fn clean_path(value: &str) -> PathBuf {
    PathBuf::from(value.trim().trim_matches('"').trim_matches('\'').trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanMode;

    #[test]
    fn test_prefill_and_build() {
        let mut config = Config::new("/photos/temp", "/photos/archive", ScanMode::Trash);
        config.exclude_dirs.push(PathBuf::from("@eaDir"));

        let mut form = FormState::from_config(&config);
        assert_eq!(form.staging.value(), "/photos/temp");
        assert_eq!(form.mode.mode(), ScanMode::Trash);

        form.next_mode();
        let built = form.build_config();
        assert_eq!(built.mode, ScanMode::Full);
        assert_eq!(built.exclude_dirs, vec![PathBuf::from("@eaDir")]);
    }

    #[test]
    fn test_quoted_paths_are_cleaned() {
        let mut form = FormState::default();
        form.staging.insert_str("  \"/photos/temp\" ");
        assert_eq!(form.build_config().staging_dir, PathBuf::from("/photos/temp"));
    }

    #[test]
    fn test_focus_cycles() {
        let mut form = FormState::default();
        assert!(form.focused_input().is_some());
        form.focus_prev();
        assert_eq!(form.focus, FormField::Start);
        assert!(form.focused_input().is_none());
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, FormField::Archive);
    }
}
