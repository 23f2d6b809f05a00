//! `com.threerings.util.unsafe.Unsafe` 的 JNI 入口
//!
//! 每个入口都只是把安全接口的 `Result` 转成 Java 侧期望的返回值，
//! 失败时在标准错误上写一行诊断信息，不抛出 Java 异常。

use crate::config::BridgeConfig;
use crate::ffi::{Gid, Result, SleepOutcome, SystemInterface, Uid};
use crate::jvmpi::{self, PROFILER};
use jni::objects::JClass;
use jni::sys::{jboolean, jint, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use log::{error, warn};
use std::panic::{self, AssertUnwindSafe};

/// 确保日志已初始化，并且 panic 不会越过 FFI 边界
fn guarded<T>(name: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    let run = || {
        crate::init();
        f()
    };
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(value) => value,
        Err(_) => {
            error!("{} panicked", name);
            fallback
        }
    }
}

fn report(result: Result<()>) -> jboolean {
    match result {
        Ok(()) => JNI_TRUE,
        Err(e) if e.is_permission_denied() => {
            error!("{} (caller lacks privilege for this identity)", e);
            JNI_FALSE
        }
        Err(e) => {
            error!("{}", e);
            JNI_FALSE
        }
    }
}

fn system() -> SystemInterface {
    SystemInterface::with_strategy(BridgeConfig::global().sleep_strategy)
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_enableGC(_env: JNIEnv, _class: JClass) {
    guarded("enableGC", (), || {
        if let Err(e) = PROFILER.enable_gc() {
            error!("enableGC failed: {}", e);
        }
    })
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_disableGC(_env: JNIEnv, _class: JClass) {
    guarded("disableGC", (), || {
        if let Err(e) = PROFILER.disable_gc() {
            error!("disableGC failed: {}", e);
        }
    })
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_nativeSleep(
    _env: JNIEnv,
    _class: JClass,
    millis: jint,
) {
    guarded("nativeSleep", (), || {
        let sys = system();
        match sys.sleep_millis(millis) {
            Ok(SleepOutcome::Completed) => {}
            Ok(SleepOutcome::Interrupted) => warn!("{}({}ms) interrupted", sys.strategy(), millis),
            Err(e) => error!("{}({}ms) failed: {}", sys.strategy(), millis, e),
        }
    })
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_nativeSetuid(
    _env: JNIEnv,
    _class: JClass,
    uid: jint,
) -> jboolean {
    guarded("nativeSetuid", JNI_FALSE, || report(system().set_user_id(Uid::from_raw(uid))))
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_nativeSetgid(
    _env: JNIEnv,
    _class: JClass,
    gid: jint,
) -> jboolean {
    guarded("nativeSetgid", JNI_FALSE, || report(system().set_group_id(Gid::from_raw(gid))))
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_nativeSeteuid(
    _env: JNIEnv,
    _class: JClass,
    uid: jint,
) -> jboolean {
    guarded("nativeSeteuid", JNI_FALSE, || {
        report(system().set_effective_user_id(Uid::from_raw(uid)))
    })
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_nativeSetegid(
    _env: JNIEnv,
    _class: JClass,
    gid: jint,
) -> jboolean {
    guarded("nativeSetegid", JNI_FALSE, || {
        report(system().set_effective_group_id(Gid::from_raw(gid)))
    })
}

#[no_mangle]
pub extern "system" fn Java_com_threerings_util_unsafe_Unsafe_init(env: JNIEnv, _class: JClass) -> jboolean {
    guarded("init", JNI_FALSE, || {
        report(PROFILER.initialize_with(|| jvmpi::acquire(&env)))
    })
}
