use crate::ffi::types::{SleepStrategy, SystemError};
use log::warn;
use std::env;
use std::sync::OnceLock;

/// 选择睡眠策略的环境变量
pub const SLEEP_ENV: &str = "UNSAFE_NATIVE_SLEEP";
/// 日志过滤规则的环境变量
pub const LOG_ENV: &str = "UNSAFE_NATIVE_LOG";

/// 桥接库的配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// nativeSleep 使用的系统调用
    pub sleep_strategy: SleepStrategy,
    /// env_logger 过滤规则
    ///
    /// 失败诊断走 `error!`，设为 `off`（或宿主进程已经装了自己的 logger）时
    /// 本库的诊断信息不会出现在标准错误上。
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sleep_strategy: SleepStrategy::Select,
            log_filter: "info".to_string(),
        }
    }
}

/// 加载结果：配置和加载时被忽略的无效值
#[derive(Debug)]
struct Loaded {
    config: BridgeConfig,
    rejected: Vec<SystemError>,
}

impl BridgeConfig {
    /// 从环境变量读取配置，缺失或无法识别的值使用默认值
    pub fn from_env() -> Self {
        Self::load_env().config
    }

    fn load_env() -> Loaded {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Loaded
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut rejected = Vec::new();

        if let Some(value) = lookup(SLEEP_ENV) {
            match value.parse() {
                Ok(strategy) => config.sleep_strategy = strategy,
                Err(e) => rejected.push(e),
            }
        }

        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        Loaded { config, rejected }
    }

    fn loaded() -> &'static Loaded {
        static CONFIG: OnceLock<Loaded> = OnceLock::new();
        CONFIG.get_or_init(Self::load_env)
    }

    /// 进程内共享的配置，第一次访问时从环境变量加载
    pub fn global() -> &'static BridgeConfig {
        &Self::loaded().config
    }

    /// 报告加载全局配置时被忽略的值，需要在 logger 安装之后调用
    pub(crate) fn report_rejected() {
        let loaded = Self::loaded();
        for e in &loaded.rejected {
            warn!("{}, using {}", e, loaded.config.sleep_strategy);
        }
    }
}
