//! 容器层级遍历

use crate::container::DiContainer;
use std::collections::HashSet;

/// 祖先容器：对父容器图做广度优先遍历
///
/// 先列出全部直接父容器，再列出它们的父容器，依此类推；每层保持登记顺序。
/// 通过多条路径到达的容器会按到达次数重复出现。
pub fn ancestors(parents: &[DiContainer]) -> Vec<DiContainer> {
    let mut result = Vec::new();
    let mut frontier = parents.to_vec();
    while !frontier.is_empty() {
        let next = frontier
            .iter()
            .flat_map(|container| container.parent_containers().iter().cloned())
            .collect();
        result.append(&mut frontier);
        frontier = next;
    }
    result
}

/// 按深度逐层产出祖先容器，供解析使用
///
/// 同一个容器只在第一次到达的那一层出现，避免菱形层级把一条绑定算成多个候选。
#[derive(Debug)]
pub struct AncestorLevels {
    frontier: Vec<DiContainer>,
    visited: HashSet<u64>,
}

impl AncestorLevels {
    /// 从直接父容器开始
    pub fn new(parents: &[DiContainer]) -> Self {
        Self {
            frontier: parents.to_vec(),
            visited: HashSet::new(),
        }
    }
}

impl Iterator for AncestorLevels {
    type Item = Vec<DiContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.frontier.is_empty() {
            let frontier = std::mem::take(&mut self.frontier);
            let level: Vec<DiContainer> = frontier
                .into_iter()
                .filter(|container| self.visited.insert(container.id()))
                .collect();
            self.frontier = level
                .iter()
                .flat_map(|container| container.parent_containers().iter().cloned())
                .collect();
            if !level.is_empty() {
                return Some(level);
            }
        }
        None
    }
}
