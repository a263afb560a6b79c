/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 子图快照（供可视化）
 */

use super::{Graph, GraphError, NodeId};
use crate::nn::descriptor::{OpGraph, OpGraphEdge, OpGraphNode};
use crate::utils::round_to;
use std::collections::HashSet;

impl Graph {
    /// 以 `root` 为根的计算子图快照
    ///
    /// 取后序拓扑序的最后 `max_nodes` 个节点，只保留两端都存活的边。
    /// 值与梯度按调用时刻读取，因此需在优化器清零梯度之前调用。
    pub fn snapshot(&self, root: NodeId, max_nodes: usize) -> Result<OpGraph, GraphError> {
        let order = self.topological_slots(self.slot(root)?)?;
        let trimmed = &order[order.len().saturating_sub(max_nodes)..];
        let kept: HashSet<NodeId> = trimmed.iter().map(|&slot| self.nodes[slot].id).collect();

        let nodes = trimmed
            .iter()
            .map(|&slot| {
                let node = &self.nodes[slot];
                OpGraphNode {
                    id: node.id.0,
                    value: round_to(node.value, 6),
                    grad: round_to(node.grad, 6),
                }
            })
            .collect();

        let mut edges = Vec::new();
        for &slot in trimmed {
            let node = &self.nodes[slot];
            for &(child, _) in node.children() {
                if kept.contains(&child) {
                    edges.push(OpGraphEdge {
                        source: child.0,
                        target: node.id.0,
                    });
                }
            }
        }

        Ok(OpGraph { nodes, edges })
    }
}
