/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 模块：标量自动微分计算图（节点竞技场）
 *
 * 公开 API：
 * - `Graph`: 节点竞技场，负责分配 id、构建节点、反向传播与快照
 * - `Node`: 标量节点（值 + 梯度累加器 + 子节点及其局部偏导）
 * - `NodeId`: 运行期内单调递增且唯一的节点 id
 * - `GraphError`: 错误类型
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、访问器、参数/临时节点的生命周期
 * - ops.rs: 基本运算（add/mul/pow/log/exp/relu）及其派生运算
 * - backward.rs: 迭代式后序拓扑排序 + 反向传播
 * - describe.rs: 计算子图的裁剪快照
 */

mod backward;
mod core;
mod describe;
mod error;
mod ops;

pub use error::GraphError;

use serde::{Deserialize, Serialize};

/// 节点 id（运行期内单调递增，不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 所有基本运算的输入数都不超过 2
const MAX_ARITY: usize = 2;

/// 标量节点
///
/// 子节点即该节点的输入；`local_grad` 是输出对该输入的局部偏导，在构建时按当时的输入值求出。
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    value: f64,
    grad: f64,
    children: [(NodeId, f64); MAX_ARITY],
    arity: u8,
}

impl Node {
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn grad(&self) -> f64 {
        self.grad
    }

    /// (子节点, 局部偏导) 列表
    pub fn children(&self) -> &[(NodeId, f64)] {
        &self.children[..self.arity as usize]
    }

    pub const fn is_leaf(&self) -> bool {
        self.arity == 0
    }
}

/// 计算图（节点竞技场）
///
/// 存储分两段：
/// - 持久段：参数节点，整个运行期存活，id 即槽位下标；
/// - 临时段：一次前向/反向中创建的节点，每步更新后由 `release_transients` 整体丢弃。
///
/// 参数必须在任何临时节点出现之前创建，这样持久段的 id 与槽位一一对应。
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    num_persistent: usize,
    /// 当前临时段第一个节点的 id
    transient_base: u64,
    next_id: u64,
}
