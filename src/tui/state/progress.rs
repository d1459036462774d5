//! 进度状态

use crate::event::ScanEvent;
use std::collections::VecDeque;

/// 滚动日志保留行数
pub const LOG_CAPACITY: usize = 200;

/// 进度状态
#[derive(Debug, Default)]
pub struct ProgressState {
    /// 当前百分比
    pub percent: u8,
    /// 最近的消息（最新在末尾）
    pub log: VecDeque<String>,
}

/// 应用事件后的结果
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// 扫描仍在进行
    Running,
    /// 扫描结束
    Finished(crate::scan::ScanResult),
    /// 扫描失败
    Failed(String),
}

impl ProgressState {
    /// 创建进度状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 进度比例
    pub fn ratio(&self) -> f64 {
        f64::from(self.percent.min(100)) / 100.0
    }

    /// 追加一行日志，超出容量时丢弃最旧的
    pub fn push_line(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// 应用扫描事件
    pub fn apply(&mut self, event: ScanEvent) -> ScanOutcome {
        match event {
            ScanEvent::Progress(percent) => {
                self.percent = self.percent.max(percent);
                ScanOutcome::Running
            }
            ScanEvent::Message(line) => {
                self.push_line(line);
                ScanOutcome::Running
            }
            ScanEvent::Finished(result) => ScanOutcome::Finished(result),
            ScanEvent::Failed(error) => ScanOutcome::Failed(error),
        }
    }

    /// 最近 `n` 行
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &String> {
        self.log.iter().skip(self.log.len().saturating_sub(n))
    }
}
