//! 日志工具模块
//!
//! 提供日志初始化以及格式化输出的辅助函数

use crate::config::Config;
use crate::models::Pagination;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 库存客户端启动");
    info!("🌐 API 地址: {}", config.api_base_url);
    info!("📄 每页条数: {}", config.page_size);
    info!("{}", "=".repeat(60));
}

/// 分页摘要文本，例如 `Showing 26-50 of 73 items`
pub fn page_summary(pagination: &Pagination) -> String {
    let (start, end) = pagination.item_range();
    format!("Showing {}-{} of {} items", start, end, pagination.total)
}

/// 记录分页信息
pub fn log_page_summary(pagination: &Pagination) {
    info!("{}", "─".repeat(60));
    info!(
        "📋 {} (第 {}/{} 页)",
        page_summary(pagination),
        pagination.page,
        pagination.page_count.max(1)
    );
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
