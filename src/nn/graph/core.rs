/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 核心操作：创建、访问器、节点生命周期
 */

use super::{Graph, GraphError, MAX_ARITY, Node, NodeId};

impl Graph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::default()
    }

    // ========== 基础访问器 ==========

    /// 当前存活的节点数（参数 + 临时节点）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub const fn num_parameters(&self) -> usize {
        self.num_persistent
    }

    pub fn num_transients(&self) -> usize {
        self.nodes.len() - self.num_persistent
    }

    /// 下一个将被分配的 id
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        let slot = self.slot(id)?;
        Ok(&self.nodes[slot])
    }

    pub fn value(&self, id: NodeId) -> Result<f64, GraphError> {
        Ok(self.node(id)?.value)
    }

    pub fn grad(&self, id: NodeId) -> Result<f64, GraphError> {
        Ok(self.node(id)?.grad)
    }

    pub fn values(&self, ids: &[NodeId]) -> Result<Vec<f64>, GraphError> {
        ids.iter().map(|&id| self.value(id)).collect()
    }

    /// 设置参数值（仅允许修改持久段的参数节点）
    pub fn set_parameter_value(&mut self, id: NodeId, value: f64) -> Result<(), GraphError> {
        let slot = self.parameter_slot(id)?;
        self.nodes[slot].value = value;
        Ok(())
    }

    // ========== 节点生命周期 ==========

    /// 创建参数节点（持久叶子节点）
    pub fn new_parameter(&mut self, value: f64) -> Result<NodeId, GraphError> {
        if self.next_id != self.num_persistent as u64 {
            return Err(GraphError::InvalidOperation(format!(
                "参数必须在任何临时节点之前创建（已分配 {} 个 id，其中参数 {} 个）",
                self.next_id, self.num_persistent
            )));
        }
        let id = self.push(value, &[]);
        self.num_persistent += 1;
        self.transient_base = self.next_id;
        Ok(id)
    }

    /// 创建常量节点（临时叶子节点，浮点字面量以此进入计算图）
    pub fn constant(&mut self, value: f64) -> NodeId {
        self.push(value, &[])
    }

    /// 丢弃本步的全部临时节点；参数节点及其梯度不受影响，id 继续单调递增
    pub fn release_transients(&mut self) {
        self.nodes.truncate(self.num_persistent);
        self.transient_base = self.next_id;
    }

    // ========== 内部工具 ==========

    pub(super) fn push(&mut self, value: f64, children: &[(NodeId, f64)]) -> NodeId {
        debug_assert!(children.len() <= MAX_ARITY);
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let mut slots = [(NodeId(0), 0.0); MAX_ARITY];
        slots[..children.len()].copy_from_slice(children);
        self.nodes.push(Node {
            id,
            value,
            grad: 0.0,
            children: slots,
            arity: children.len() as u8,
        });
        id
    }

    /// id -> 存储槽位
    pub(super) fn slot(&self, id: NodeId) -> Result<usize, GraphError> {
        let raw = id.0;
        let slot = if raw < self.num_persistent as u64 {
            raw as usize
        } else {
            let offset = raw
                .checked_sub(self.transient_base)
                .ok_or(GraphError::NodeNotFound(id))?;
            self.num_persistent + offset as usize
        };
        if slot < self.nodes.len() {
            Ok(slot)
        } else {
            Err(GraphError::NodeNotFound(id))
        }
    }

    pub(super) fn parameter_slot(&self, id: NodeId) -> Result<usize, GraphError> {
        let slot = self.slot(id)?;
        if slot < self.num_persistent {
            Ok(slot)
        } else {
            Err(GraphError::InvalidOperation(format!(
                "节点 {id} 不是参数节点"
            )))
        }
    }
}
