/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 由标量节点组合而成的线性代数原语（无张量、无专用 matmul 节点）
 */

use super::model_state::ParameterMatrix;
use super::{Graph, GraphError, NodeId};

/// RMSNorm 的数值稳定项
pub const RMS_EPS: f64 = 1e-5;

/// 线性投影：输出第 i 项为 `x · W[i]`
pub fn linear(graph: &mut Graph, x: &[NodeId], w: &ParameterMatrix) -> Result<Vec<NodeId>, GraphError> {
    w.iter_rows().map(|row| graph.dot(row, x)).collect()
}

/// softmax：先减去最大值再取指数，最后除以总和
///
/// 最大值按当前数值取得，以常量进入计算图（不对它求导）。
pub fn softmax(graph: &mut Graph, logits: &[NodeId]) -> Result<Vec<NodeId>, GraphError> {
    let max = graph
        .values(logits)?
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    let exps = logits
        .iter()
        .map(|&logit| {
            let shifted = graph.add_scalar(logit, -max)?;
            graph.exp(shifted)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let total = graph.sum(&exps)?;
    exps.iter().map(|&e| graph.div(e, total)).collect()
}

/// RMSNorm：`xᵢ · (mean(x²) + ε)^(-1/2)`
pub fn rmsnorm(graph: &mut Graph, x: &[NodeId]) -> Result<Vec<NodeId>, GraphError> {
    let squares = x
        .iter()
        .map(|&xi| graph.mul(xi, xi))
        .collect::<Result<Vec<_>, _>>()?;
    let sum_sq = graph.sum(&squares)?;
    let mean_sq = graph.mul_scalar(sum_sq, 1.0 / x.len() as f64)?;
    let shifted = graph.add_scalar(mean_sq, RMS_EPS)?;
    let scale = graph.pow(shifted, -0.5)?;
    x.iter().map(|&xi| graph.mul(xi, scale)).collect()
}

/// 逐元素相加（残差连接、词嵌入 + 位置嵌入）
pub fn add_vectors(graph: &mut Graph, a: &[NodeId], b: &[NodeId]) -> Result<Vec<NodeId>, GraphError> {
    if a.len() != b.len() {
        return Err(GraphError::InvalidOperation(format!(
            "逐元素相加两侧长度不一致：{} vs {}",
            a.len(),
            b.len()
        )));
    }
    a.iter().zip(b).map(|(&x, &y)| graph.add(x, y)).collect()
}
