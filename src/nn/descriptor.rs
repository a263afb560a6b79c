/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 计算子图快照（Op-Graph Descriptor）
 *                 step.backward 事件里携带的可视化载荷
 */

use serde::{Deserialize, Serialize};

/// 快照保留的节点数上限（完整的图规模随序列长度 × 深度增长）
pub const OP_GRAPH_MAX_NODES: usize = 160;

/// 裁剪后的计算子图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpGraph {
    /// 后序拓扑序中最靠后的若干节点
    pub nodes: Vec<OpGraphNode>,
    /// 两端都在保留节点中的边
    pub edges: Vec<OpGraphEdge>,
}

/// 节点快照（值和梯度保留 6 位小数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpGraphNode {
    pub id: u64,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub value: f64,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub grad: f64,
}

/// 边：从输入（子节点）指向使用它的节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpGraphEdge {
    pub source: u64,
    pub target: u64,
}

impl OpGraph {
    pub fn node_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
