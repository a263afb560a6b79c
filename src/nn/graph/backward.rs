/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 反向传播
 *
 * 图深度随序列长度 × 层数增长，拓扑排序用显式栈实现，不走递归。
 */

use super::{Graph, GraphError, NodeId};

impl Graph {
    // ========== 反向传播核心 ==========

    /// 反向传播
    ///
    /// 将 `root` 的梯度置为 1，再按逆拓扑序执行 `child.grad += local * node.grad`。
    ///
    /// 梯度是累加的：重复调用会叠加，调用方需在消费完参数梯度后自行 `zero_parameter_grads`。
    pub fn backward(&mut self, root: NodeId) -> Result<(), GraphError> {
        let root_slot = self.slot(root)?;
        let order = self.topological_slots(root_slot)?;

        self.nodes[root_slot].grad = 1.0;
        for &slot in order.iter().rev() {
            let node = &self.nodes[slot];
            let upstream = node.grad;
            let (children, arity) = (node.children, node.arity as usize);
            for &(child, local) in &children[..arity] {
                let child_slot = self.slot(child)?;
                self.nodes[child_slot].grad += local * upstream;
            }
        }
        Ok(())
    }

    /// 后序拓扑序：节点只在其全部子节点之后出现，`root` 位于末尾
    pub fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let root_slot = self.slot(root)?;
        Ok(self
            .topological_slots(root_slot)?
            .into_iter()
            .map(|slot| self.nodes[slot].id)
            .collect())
    }

    /// 迭代式后序 DFS；访问标记按 id 映射出的槽位记录
    pub(super) fn topological_slots(&self, root_slot: usize) -> Result<Vec<usize>, GraphError> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        // (槽位, 下一个待访问的子节点下标)
        let mut stack: Vec<(usize, usize)> = vec![(root_slot, 0)];
        visited[root_slot] = true;

        while let Some(frame) = stack.last_mut() {
            let (slot, cursor) = *frame;
            let node = &self.nodes[slot];
            if let Some(&(child, _)) = node.children().get(cursor) {
                frame.1 += 1;
                let child_slot = self.slot(child)?;
                if !visited[child_slot] {
                    visited[child_slot] = true;
                    stack.push((child_slot, 0));
                }
            } else {
                order.push(slot);
                stack.pop();
            }
        }
        Ok(order)
    }

    // ========== 梯度清零 ==========

    /// 清零所有参数节点的梯度
    pub fn zero_parameter_grads(&mut self) {
        for node in &mut self.nodes[..self.num_persistent] {
            node.grad = 0.0;
        }
    }

    /// 清零单个参数节点的梯度
    pub fn zero_parameter_grad(&mut self, id: NodeId) -> Result<(), GraphError> {
        let slot = self.parameter_slot(id)?;
        self.nodes[slot].grad = 0.0;
        Ok(())
    }
}
