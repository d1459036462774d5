//! 通用选择状态

/// 循环选择行为
pub trait Selectable {
    /// 总选项数
    fn count(&self) -> usize;
    /// 当前选中索引
    fn selected(&self) -> usize;
    /// 设置选中索引（不做边界处理）
    fn set_selected(&mut self, index: usize);

    /// 选择下一个
    fn next(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        self.set_selected((self.selected() + 1) % count);
    }

    /// 选择上一个
    fn prev(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        let prev = if self.selected() == 0 {
            count - 1
        } else {
            self.selected() - 1
        };
        self.set_selected(prev);
    }
}

/// 扫描模式选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSelection {
    index: usize,
}

impl ModeSelection {
    /// 以指定模式初始化
    pub fn with_mode(mode: crate::config::ScanMode) -> Self {
        let index = crate::config::ScanMode::all()
            .iter()
            .position(|m| *m == mode)
            .unwrap_or(0);
        Self { index }
    }

    /// 当前模式
    pub fn mode(&self) -> crate::config::ScanMode {
        crate::config::ScanMode::all()[self.index]
    }
}

impl Selectable for ModeSelection {
    fn count(&self) -> usize {
        crate::config::ScanMode::all().len()
    }

    fn selected(&self) -> usize {
        self.index
    }

    fn set_selected(&mut self, index: usize) {
        self.index = index;
    }
}
