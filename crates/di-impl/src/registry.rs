//! 绑定注册表
//!
//! 每个容器一个：绑定键到有序记录列表的映射。所有操作只作用于本容器。

use crate::record::BindingRecord;
use di_abstractions::BindingKey;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// 绑定注册表
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<BindingKey, Vec<Arc<BindingRecord>>>,
    next_sequence: u64,
}

impl BindingRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加记录到其键的列表末尾
    pub fn add(&mut self, mut record: BindingRecord) -> Arc<BindingRecord> {
        record.sequence = self.next_sequence;
        self.next_sequence += 1;
        let record = Arc::new(record);
        self.bindings
            .entry(record.key.clone())
            .or_default()
            .push(Arc::clone(&record));
        record
    }

    /// 精确匹配键的记录，按登记顺序
    pub fn lookup(&self, key: &BindingKey) -> &[Arc<BindingRecord>] {
        self.bindings.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// 某类型的全部记录（忽略标识符），按登记顺序
    pub fn lookup_type(&self, type_id: TypeId) -> Vec<Arc<BindingRecord>> {
        let mut records: Vec<_> = self
            .bindings
            .iter()
            .filter(|(key, _)| key.type_info.id == type_id)
            .flat_map(|(_, records)| records.iter().cloned())
            .collect();
        records.sort_by_key(|record| record.sequence);
        records
    }

    /// 删除某类型的全部记录（任意标识符），返回删除数量
    pub fn remove_type(&mut self, type_id: TypeId) -> usize {
        let mut removed = 0;
        self.bindings.retain(|key, records| {
            if key.type_info.id == type_id {
                removed += records.len();
                false
            } else {
                true
            }
        });
        removed
    }

    /// 删除精确匹配键的全部记录，返回删除数量
    pub fn remove_key(&mut self, key: &BindingKey) -> usize {
        self.bindings.remove(key).map_or(0, |records| records.len())
    }

    /// 清空本注册表，返回删除数量
    pub fn clear(&mut self) -> usize {
        let removed = self.len();
        self.bindings.clear();
        removed
    }

    /// 记录总数
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
