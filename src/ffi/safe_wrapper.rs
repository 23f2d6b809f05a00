use super::types::{Gid, Identity, Result, SleepOutcome, SleepStrategy, SystemError, Uid};
use log::debug;
use std::io;
use std::mem::MaybeUninit;
use std::ptr;

/// 对身份切换和睡眠系统调用的安全封装
#[derive(Debug, Clone, Default)]
pub struct SystemInterface {
    strategy: SleepStrategy,
}

impl SystemInterface {
    /// 创建新的系统接口实例，睡眠使用默认的 select() 策略
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: SleepStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> SleepStrategy {
        self.strategy
    }

    /// 读取进程当前的真实/有效身份
    pub fn current_identity(&self) -> Identity {
        // 这四个调用总是成功
        unsafe {
            Identity {
                uid: Uid(libc::getuid()),
                euid: Uid(libc::geteuid()),
                gid: Gid(libc::getgid()),
                egid: Gid(libc::getegid()),
            }
        }
    }

    /// 设置进程的真实用户ID
    ///
    /// # 错误
    ///
    /// 内核拒绝时返回 `SystemError::IdentityChange`，进程身份保持不变
    pub fn set_user_id(&self, uid: Uid) -> Result<()> {
        let result = unsafe { libc::setuid(uid.as_raw()) };
        self.check_identity_change("setuid", uid.as_signed(), result)
    }

    /// 设置进程的真实组ID
    pub fn set_group_id(&self, gid: Gid) -> Result<()> {
        let result = unsafe { libc::setgid(gid.as_raw()) };
        self.check_identity_change("setgid", gid.as_signed(), result)
    }

    /// 设置进程的有效用户ID
    pub fn set_effective_user_id(&self, uid: Uid) -> Result<()> {
        let result = unsafe { libc::seteuid(uid.as_raw()) };
        self.check_identity_change("seteuid", uid.as_signed(), result)
    }

    /// 设置进程的有效组ID
    pub fn set_effective_group_id(&self, gid: Gid) -> Result<()> {
        let result = unsafe { libc::setegid(gid.as_raw()) };
        self.check_identity_change("setegid", gid.as_signed(), result)
    }

    fn check_identity_change(&self, call: &'static str, value: i32, result: libc::c_int) -> Result<()> {
        if result == 0 {
            debug!("{}({}) succeeded, now {}", call, value, self.current_identity());
            return Ok(());
        }
        Err(SystemError::IdentityChange {
            call,
            value,
            source: io::Error::last_os_error(),
        })
    }

    /// 阻塞当前线程大约 `millis` 毫秒
    ///
    /// # 返回值
    ///
    /// * `SleepOutcome::Completed` - 睡满了请求的时长
    /// * `SleepOutcome::Interrupted` - 被信号打断，调用方可以决定是否重试
    ///
    /// # 错误
    ///
    /// * `SystemError::InvalidDuration` - `millis` 为负数
    /// * `SystemError::SyscallError` - 其他系统调用失败
    pub fn sleep_millis(&self, millis: i32) -> Result<SleepOutcome> {
        if millis < 0 {
            return Err(SystemError::InvalidDuration(millis));
        }

        let result = match self.strategy {
            SleepStrategy::Select => select_sleep(millis),
            SleepStrategy::Nanosleep => nano_sleep(millis),
        };

        if result == 0 {
            return Ok(SleepOutcome::Completed);
        }

        let err = io::Error::last_os_error();
        match err.kind() {
            io::ErrorKind::Interrupted => Ok(SleepOutcome::Interrupted),
            _ => Err(SystemError::SyscallError(err)),
        }
    }
}

/// select() 不注册任何描述符，只用超时来阻塞
fn select_sleep(millis: i32) -> libc::c_int {
    let mut dummy = MaybeUninit::<libc::fd_set>::uninit();
    let mut timeout = libc::timeval {
        tv_sec: (millis / 1000) as libc::time_t,
        tv_usec: ((millis % 1000) * 1000) as libc::suseconds_t,
    };

    unsafe {
        libc::FD_ZERO(dummy.as_mut_ptr());
        libc::select(
            0,
            dummy.as_mut_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
            &mut timeout,
        )
    }
}

fn nano_sleep(millis: i32) -> libc::c_int {
    let request = libc::timespec {
        tv_sec: (millis / 1000) as libc::time_t,
        tv_nsec: ((millis % 1000) as libc::c_long) * 1_000_000,
    };
    unsafe { libc::nanosleep(&request, ptr::null_mut()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn is_root(sys: &SystemInterface) -> bool {
        let id = sys.current_identity();
        id.uid.as_raw() == 0 || id.euid.as_raw() == 0
    }

    #[test_log::test]
    fn test_select_sleep_duration() {
        let sys = SystemInterface::new();

        // 被信号打断时重新计时再睡一次
        let elapsed = loop {
            let start = Instant::now();
            match sys.sleep_millis(50).expect("select sleep failed") {
                SleepOutcome::Completed => break start.elapsed(),
                SleepOutcome::Interrupted => continue,
            }
        };

        assert!(
            elapsed >= Duration::from_millis(45) && elapsed <= Duration::from_millis(80),
            "slept {:?}",
            elapsed
        );
    }

    #[test_log::test]
    fn test_nanosleep_duration() {
        let sys = SystemInterface::with_strategy(SleepStrategy::Nanosleep);
        let start = Instant::now();

        let outcome = sys.sleep_millis(1020).expect("nanosleep failed");

        if outcome == SleepOutcome::Completed {
            assert!(start.elapsed() >= Duration::from_millis(1015));
        }
    }

    #[test_log::test]
    fn test_zero_sleep() {
        let sys = SystemInterface::new();
        assert_eq!(sys.sleep_millis(0).unwrap(), SleepOutcome::Completed);
    }

    #[test_log::test]
    fn test_negative_sleep_rejected() {
        let sys = SystemInterface::new();
        let start = Instant::now();

        match sys.sleep_millis(-5) {
            Err(SystemError::InvalidDuration(-5)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test_log::test]
    fn test_set_current_identity() {
        let sys = SystemInterface::new();
        let before = sys.current_identity();

        assert!(sys.set_effective_group_id(before.egid).is_ok());
        assert!(sys.set_effective_user_id(before.euid).is_ok());
        assert_eq!(sys.current_identity(), before);
    }

    #[test_log::test]
    fn test_set_real_ids_to_current() {
        let sys = SystemInterface::new();
        let before = sys.current_identity();

        // 非 root 进程只有在 euid == uid 时 setuid(uid) 才不改变身份
        if before.uid != before.euid || before.gid != before.egid {
            return;
        }

        assert!(sys.set_group_id(before.gid).is_ok());
        assert!(sys.set_user_id(before.uid).is_ok());
        assert_eq!(sys.current_identity(), before);
    }

    #[test_log::test]
    fn test_invalid_sentinel_rejected() {
        let sys = SystemInterface::new();
        let before = sys.current_identity();

        let err = sys.set_user_id(Uid::from_raw(-1)).unwrap_err();
        assert!(err.to_string().starts_with("setuid(-1) failed: "));

        assert!(sys.set_group_id(Gid::from_raw(-1)).is_err());
        assert!(sys.set_effective_user_id(Uid::from_raw(-1)).is_err());
        assert!(sys.set_effective_group_id(Gid::from_raw(-1)).is_err());

        assert_eq!(sys.current_identity(), before);
    }

    #[test_log::test]
    fn test_unauthorized_change() {
        let sys = SystemInterface::new();
        if is_root(&sys) {
            return;
        }
        let before = sys.current_identity();

        let err = sys.set_user_id(Uid::from_raw(0)).unwrap_err();
        assert!(err.is_permission_denied());
        assert!(sys.set_effective_user_id(Uid::from_raw(0)).is_err());
        if before.gid.as_raw() != 0 && before.egid.as_raw() != 0 {
            assert!(sys.set_group_id(Gid::from_raw(0)).is_err());
        }

        assert_eq!(sys.current_identity(), before);
    }
}
