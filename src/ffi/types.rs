use std::fmt;
use std::io;
use std::str::FromStr;

/// 用户ID的安全包装
///
/// JNI 传进来的是有符号的 `jint`，这里按位转换为 `uid_t`，
/// 所以 `-1` 会变成全 1 的哨兵值，由内核拒绝。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Uid(pub(crate) libc::uid_t);

impl Uid {
    pub fn from_raw(uid: i32) -> Self {
        Uid(uid as libc::uid_t)
    }

    pub fn as_raw(&self) -> libc::uid_t {
        self.0
    }

    /// 以调用方传入时的有符号形式返回，用于诊断信息
    pub fn as_signed(&self) -> i32 {
        self.0 as i32
    }
}

/// 组ID的安全包装
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Gid(pub(crate) libc::gid_t);

impl Gid {
    pub fn from_raw(gid: i32) -> Self {
        Gid(gid as libc::gid_t)
    }

    pub fn as_raw(&self) -> libc::gid_t {
        self.0
    }

    pub fn as_signed(&self) -> i32 {
        self.0 as i32
    }
}

/// 进程当前的真实/有效身份
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Identity {
    pub uid: Uid,
    pub euid: Uid,
    pub gid: Gid,
    pub egid: Gid,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uid={} euid={} gid={} egid={}",
            self.uid.0, self.euid.0, self.gid.0, self.egid.0
        )
    }
}

/// 睡眠使用的系统调用
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum SleepStrategy {
    /// 空描述符集合 + 超时的 select()，粒度约 10ms
    #[default]
    Select,
    /// nanosleep()，粒度约 20ms
    Nanosleep,
}

impl FromStr for SleepStrategy {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(SleepStrategy::Select),
            "nanosleep" => Ok(SleepStrategy::Nanosleep),
            other => Err(SystemError::InvalidConfig(format!(
                "unknown sleep strategy: {other}"
            ))),
        }
    }
}

impl fmt::Display for SleepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepStrategy::Select => f.write_str("select"),
            SleepStrategy::Nanosleep => f.write_str("nanosleep"),
        }
    }
}

/// 一次睡眠的结果
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SleepOutcome {
    /// 睡满了请求的时长
    Completed,
    /// 被信号打断 (EINTR)，实际睡眠可能偏短
    Interrupted,
}

/// 错误类型
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("{call}({value}) failed: {source}")]
    IdentityChange {
        call: &'static str,
        value: i32,
        #[source]
        source: io::Error,
    },
    #[error("Invalid sleep duration: {0}ms")]
    InvalidDuration(i32),
    #[error("System call failed: {0}")]
    SyscallError(#[from] io::Error),
    #[error("Profiling interface not initialized")]
    ProfilerUninitialized,
    #[error("Failed to get JavaVM from env: {0}")]
    JavaVmUnavailable(String),
    #[error("Failed to get JVMPI from JavaVM (code {0})")]
    ProfilerUnavailable(i32),
    #[error("JVMPI entry point {0} is null")]
    MissingEntryPoint(&'static str),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SystemError {
    /// 身份切换是否因为权限不足而失败
    pub fn is_permission_denied(&self) -> bool {
        match self {
            SystemError::IdentityChange { source, .. } => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SystemError>;
