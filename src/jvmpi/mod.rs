mod interface;
mod profiler;

pub use interface::{JvmpiFn, JvmpiInterface, JVMPI_VERSION_1};
pub use profiler::Profiler;

use crate::ffi::types::{Result, SystemError};
use jni::sys::{JNI_ERR, JNI_OK};
use jni::JNIEnv;
use std::os::raw::c_void;
use std::ptr::{self, NonNull};

/// 进程内唯一的 JVMPI 句柄，由 `Unsafe.init()` 写入
pub static PROFILER: Profiler = Profiler::new();

/// 从当前 JNI 环境取得 JavaVM，再向它请求 JVMPI 函数表
pub fn acquire(env: &JNIEnv) -> Result<NonNull<JvmpiInterface>> {
    let vm = env
        .get_java_vm()
        .map_err(|e| SystemError::JavaVmUnavailable(e.to_string()))?;
    let raw_vm = vm.get_java_vm_pointer();
    if raw_vm.is_null() {
        return Err(SystemError::JavaVmUnavailable("null JavaVM pointer".to_string()));
    }

    let get_env = unsafe { (**raw_vm).GetEnv }.ok_or(SystemError::ProfilerUnavailable(JNI_ERR))?;

    let mut table: *mut c_void = ptr::null_mut();
    let code = unsafe { get_env(raw_vm, &mut table, JVMPI_VERSION_1) };
    if code != JNI_OK {
        return Err(SystemError::ProfilerUnavailable(code));
    }

    NonNull::new(table.cast::<JvmpiInterface>()).ok_or(SystemError::ProfilerUnavailable(code))
}
