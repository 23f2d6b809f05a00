use jni::sys::jint;
use std::os::raw::c_void;

/// GetEnv 请求 JVMPI 函数表时使用的版本号
pub const JVMPI_VERSION_1: jint = 0x1000_0001;

/// 无参数的 JVMPI 入口
pub type JvmpiFn = Option<unsafe extern "system" fn()>;

/// `JVMPI_Interface` 的内存布局镜像
///
/// 字段顺序必须与 jvmpi.h 一致。只有 GC 相关的入口给出了具体类型，
/// 其余槽位只占位，大小与函数指针相同。
#[repr(C)]
pub struct JvmpiInterface {
    pub version: jint,

    pub notify_event: *const c_void,
    pub enable_event: *const c_void,
    pub disable_event: *const c_void,
    pub request_event: *const c_void,

    pub get_call_trace: *const c_void,
    pub profiler_exit: *const c_void,

    pub raw_monitor_create: *const c_void,
    pub raw_monitor_enter: *const c_void,
    pub raw_monitor_exit: *const c_void,
    pub raw_monitor_wait: *const c_void,
    pub raw_monitor_notify_all: *const c_void,
    pub raw_monitor_destroy: *const c_void,

    pub get_current_thread_cpu_time: *const c_void,
    pub suspend_thread: *const c_void,
    pub resume_thread: *const c_void,
    pub get_thread_status: *const c_void,
    pub thread_has_run: *const c_void,
    pub create_system_thread: *const c_void,
    pub set_thread_local_storage: *const c_void,
    pub get_thread_local_storage: *const c_void,

    pub disable_gc: JvmpiFn,
    pub enable_gc: JvmpiFn,
    pub run_gc: JvmpiFn,

    pub get_thread_object: *const c_void,
    pub get_method_class: *const c_void,
    pub jobject_id_to_jobject: *const c_void,
    pub jobject_to_jobject_id: *const c_void,

    pub suspend_thread_list: *const c_void,
    pub resume_thread_list: *const c_void,
}

#[cfg(test)]
impl JvmpiInterface {
    /// 构造一个只填了 GC 入口的函数表，其余槽位为空
    pub(crate) fn with_gc_entries(enable_gc: JvmpiFn, disable_gc: JvmpiFn) -> Self {
        let null = std::ptr::null();
        Self {
            version: JVMPI_VERSION_1,
            notify_event: null,
            enable_event: null,
            disable_event: null,
            request_event: null,
            get_call_trace: null,
            profiler_exit: null,
            raw_monitor_create: null,
            raw_monitor_enter: null,
            raw_monitor_exit: null,
            raw_monitor_wait: null,
            raw_monitor_notify_all: null,
            raw_monitor_destroy: null,
            get_current_thread_cpu_time: null,
            suspend_thread: null,
            resume_thread: null,
            get_thread_status: null,
            thread_has_run: null,
            create_system_thread: null,
            set_thread_local_storage: null,
            get_thread_local_storage: null,
            disable_gc,
            enable_gc,
            run_gc: None,
            get_thread_object: null,
            get_method_class: null,
            jobject_id_to_jobject: null,
            jobject_to_jobject_id: null,
            suspend_thread_list: null,
            resume_thread_list: null,
        }
    }
}
