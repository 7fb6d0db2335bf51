//! 集成测试公共夹具
#![allow(dead_code)]

use di_abstractions::{Arguments, DependencyResult, Injectable};
use std::cell::Cell;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

thread_local! {
    static NEXT_ID: Cell<i32> = const { Cell::new(0) };
}

/// 每次构造分配一个递增 id 的类型
///
/// 计数器按线程独立，测试开始时调用 [`KlassWithId::reset_id_counter`]。
#[derive(Debug)]
pub struct KlassWithId {
    pub id: i32,
}

impl KlassWithId {
    pub fn reset_id_counter() {
        NEXT_ID.with(|counter| counter.set(0));
    }

    pub fn next_id() -> i32 {
        NEXT_ID.with(|counter| {
            let id = counter.get();
            counter.set(id + 1);
            id
        })
    }
}

impl Injectable for KlassWithId {
    fn construct(_args: &mut Arguments) -> DependencyResult<Self> {
        Ok(Self { id: Self::next_id() })
    }
}

/// 准备一个测试：初始化日志并重置 id 计数器
pub fn setup() {
    init_test_logger();
    KlassWithId::reset_id_counter();
}
