//! 作用域缓存

use di_abstractions::Instance;
use parking_lot::Mutex;

/// 绑定记录持有的实例缓存槽
///
/// `bind_interfaces_to` 产生的多条记录共享同一个槽，因此缓存作用域下
/// 它们解析到同一个实例。构造期间不持有锁。
#[derive(Debug, Default)]
pub struct ScopeSlot {
    cached: Mutex<Option<Instance>>,
}

impl ScopeSlot {
    /// 创建空槽
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取缓存
    pub fn get(&self) -> Option<Instance> {
        self.cached.lock().clone()
    }

    /// 槽为空时写入并返回 `instance`，否则返回已有的实例
    pub fn get_or_store(&self, instance: Instance) -> Instance {
        self.cached.lock().get_or_insert(instance).clone()
    }
}
