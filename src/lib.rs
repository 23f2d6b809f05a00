//! unsafe-native - JVM 的本地桥接库
//!
//! 为 `com.threerings.util.unsafe.Unsafe` 提供 JVM 自身做不到的几个操作：
//! 切换进程的真实/有效用户和组、比 `Thread.sleep` 粒度更细的睡眠，
//! 以及通过 JVMPI 暂停和恢复垃圾回收。

// 导出所有公共模块
pub mod config;
pub mod exports;
pub mod ffi;
pub mod jvmpi;

// 重新导出常用类型，使其可以直接从 crate 根访问
pub use crate::config::BridgeConfig;
pub use crate::ffi::{Gid, Identity, Result, SleepOutcome, SleepStrategy, SystemError, SystemInterface, Uid};
pub use crate::jvmpi::{Profiler, PROFILER};

use env_logger::Target;
use std::sync::Once;

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static LOGGER: Once = Once::new();

/// 初始化日志系统
///
/// 诊断信息写到标准错误。可以重复调用；宿主进程已经安装了 logger 时保留宿主的。
pub fn init() {
    LOGGER.call_once(|| {
        let config = BridgeConfig::global();
        let _ = env_logger::Builder::new()
            .parse_filters(&config.log_filter)
            .target(Target::Stderr)
            .try_init();
        BridgeConfig::report_rejected();
    });
}
