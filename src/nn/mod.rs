/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 负责神经网络（neural network）的构建：标量计算图、线性代数原语、模型与优化器
 */

pub mod descriptor;
pub mod functional;
mod graph;
pub mod model;
pub mod model_state;
pub mod optimizer;

pub use descriptor::{OP_GRAPH_MAX_NODES, OpGraph, OpGraphEdge, OpGraphNode};
pub use functional::{linear, rmsnorm, softmax};
pub use graph::{Graph, GraphError, Node, NodeId};
pub use model::{ForwardOutput, KvCache};
pub use model_state::{FlatParameters, GroupNorms, ModelDims, ModelState, ParamGroup, ParameterMatrix};
pub use optimizer::{Adam, LinearDecay, Optimizer};

#[cfg(test)]
mod tests;
