//! 日志初始化

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 安装写到 stderr 的 `fmt` 日志层
///
/// `RUST_LOG` 优先于传入的级别。stderr 不是终端时不输出颜色。重复调用是安全的，
/// 后续调用不生效。
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("langroute={},tower_http=warn", level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!("logging initialized at level {}", level);
    }
}
