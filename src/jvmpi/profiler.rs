use super::interface::{JvmpiFn, JvmpiInterface};
use crate::ffi::types::{Result, SystemError};
use log::{debug, info};
use std::ptr::NonNull;
use std::sync::OnceLock;

/// 指向 JVM 持有的 JVMPI 函数表
#[derive(Debug, Clone, Copy)]
struct InterfaceHandle(NonNull<JvmpiInterface>);

// 函数表由 JVM 分配，在 JVM 生命周期内有效且不会被修改
unsafe impl Send for InterfaceHandle {}
unsafe impl Sync for InterfaceHandle {}

/// JVMPI 函数表的一次性持有者
///
/// 状态只有 未初始化 -> 已初始化 两种，没有重置路径。
#[derive(Debug)]
pub struct Profiler {
    interface: OnceLock<InterfaceHandle>,
}

impl Profiler {
    pub const fn new() -> Self {
        Self {
            interface: OnceLock::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.interface.get().is_some()
    }

    /// 获取并保存函数表
    ///
    /// 已经初始化过时直接返回 `Ok(())`，不会重新获取，也不会替换已保存的句柄。
    /// `acquire` 失败时保持未初始化状态。
    pub fn initialize_with<F>(&self, acquire: F) -> Result<()>
    where
        F: FnOnce() -> Result<NonNull<JvmpiInterface>>,
    {
        if self.is_initialized() {
            debug!("JVMPI interface already initialized");
            return Ok(());
        }

        let table = acquire()?;
        if self.interface.set(InterfaceHandle(table)).is_err() {
            // 另一个线程先完成了初始化，保留它的句柄
            debug!("JVMPI interface initialized concurrently");
            return Ok(());
        }

        info!("JVMPI interface acquired");
        Ok(())
    }

    /// 恢复垃圾回收
    pub fn enable_gc(&self) -> Result<()> {
        let entry = self.table()?.enable_gc;
        call_entry("EnableGC", entry)
    }

    /// 暂停垃圾回收
    pub fn disable_gc(&self) -> Result<()> {
        let entry = self.table()?.disable_gc;
        call_entry("DisableGC", entry)
    }

    fn table(&self) -> Result<&JvmpiInterface> {
        let handle = self
            .interface
            .get()
            .ok_or(SystemError::ProfilerUninitialized)?;
        // 只有 initialize_with 能写入，写入的都是非空且由 JVM 持有的指针
        Ok(unsafe { handle.0.as_ref() })
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

fn call_entry(name: &'static str, entry: JvmpiFn) -> Result<()> {
    let f = entry.ok_or(SystemError::MissingEntryPoint(name))?;
    unsafe { f() };
    Ok(())
}
