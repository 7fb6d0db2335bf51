//! 绑定生命周期策略

use serde::{Deserialize, Serialize};
use std::fmt;

/// 绑定的作用域（实例缓存策略）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 瞬时模式 - 每次解析都创建新实例
    #[default]
    Transient,
    /// 缓存模式 - 每条绑定记录在首次解析时创建实例并缓存
    Cached,
    /// 单一模式 - 同一容器中同一键只允许一条此类绑定
    Single,
}

impl Lifetime {
    /// 是否缓存实例
    pub const fn is_cached(self) -> bool {
        matches!(self, Self::Cached | Self::Single)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transient => "transient",
            Self::Cached => "cached",
            Self::Single => "single",
        };
        f.write_str(name)
    }
}
