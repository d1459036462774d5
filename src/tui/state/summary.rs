//! 摘要状态

use crate::scan::ScanResult;
use std::path::PathBuf;

/// 结果摘要状态
#[derive(Debug, Default)]
pub struct SummaryState {
    /// 扫描结果（失败时为空）
    pub result: Option<ScanResult>,
    /// 致命错误信息
    pub error: Option<String>,
    /// 日志路径
    pub log_path: Option<PathBuf>,
}

impl SummaryState {
    /// 成功结束
    pub fn finished(result: ScanResult, log_path: Option<PathBuf>) -> Self {
        Self {
            result: Some(result),
            error: None,
            log_path,
        }
    }

    /// 扫描失败
    pub fn failed(error: String, log_path: Option<PathBuf>) -> Self {
        Self {
            result: None,
            error: Some(error),
            log_path,
        }
    }
}
