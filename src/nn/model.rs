/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 迷你 Transformer 的单 token 前向传播
 *
 * 每次调用处理一个位置：读取并追加本步的 KV 缓存（只在当前训练步/当前采样序列内有效，
 * 不属于模型状态），返回词表 logits 以及每层每头的注意力权重（用于可视化）。
 */

use super::functional::{add_vectors, linear, rmsnorm, softmax};
use super::model_state::ModelState;
use super::{Graph, GraphError, NodeId};

/// 逐层的 key/value 缓存：`keys[layer][t]` 为位置 t 的 key 向量
#[derive(Debug, Clone, Default)]
pub struct KvCache {
    keys: Vec<Vec<Vec<NodeId>>>,
    values: Vec<Vec<Vec<NodeId>>>,
}

impl KvCache {
    pub fn new(n_layer: usize) -> Self {
        Self {
            keys: vec![Vec::new(); n_layer],
            values: vec![Vec::new(); n_layer],
        }
    }

    /// 第 `layer` 层已缓存的位置数
    pub fn len(&self, layer: usize) -> usize {
        self.keys.get(layer).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.iter().all(Vec::is_empty)
    }
}

/// 单个位置的前向输出
#[derive(Debug, Clone)]
pub struct ForwardOutput {
    pub logits: Vec<NodeId>,
    /// 按 (层, 头) 顺序排列，每个向量覆盖 0..=pos 并且和为 1
    pub attention: Vec<Vec<f64>>,
}

impl ModelState {
    /// 对 `token` 在位置 `pos` 做一次前向
    pub fn forward(
        &self,
        graph: &mut Graph,
        token: usize,
        pos: usize,
        cache: &mut KvCache,
    ) -> Result<ForwardOutput, GraphError> {
        let dims = *self.dims();
        let head_dim = dims.head_dim();
        let scale = 1.0 / (head_dim as f64).sqrt();
        if cache.keys.len() != self.layers.len() {
            return Err(GraphError::InvalidOperation(format!(
                "KV 缓存层数 {} 与模型层数 {} 不一致",
                cache.keys.len(),
                self.layers.len()
            )));
        }

        let tok_emb = self.wte.row(token)?;
        let pos_emb = self.wpe.row(pos)?;
        let x = add_vectors(graph, tok_emb, pos_emb)?;
        let mut x = rmsnorm(graph, &x)?;

        let mut attention = Vec::with_capacity(dims.n_layer * dims.n_head);
        for (li, layer) in self.layers.iter().enumerate() {
            // 1) 多头因果自注意力
            let residual = x.clone();
            let xn = rmsnorm(graph, &x)?;
            let q = linear(graph, &xn, &layer.attn_wq)?;
            let k = linear(graph, &xn, &layer.attn_wk)?;
            let v = linear(graph, &xn, &layer.attn_wv)?;
            cache.keys[li].push(k);
            cache.values[li].push(v);

            let mut x_attn = Vec::with_capacity(dims.n_embd);
            for h in 0..dims.n_head {
                let span = h * head_dim..(h + 1) * head_dim;
                let q_h = &q[span.clone()];

                let scores = cache.keys[li]
                    .iter()
                    .map(|k_t| {
                        let dot = graph.dot(q_h, &k_t[span.clone()])?;
                        graph.mul_scalar(dot, scale)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let weights = softmax(graph, &scores)?;
                attention.push(graph.values(&weights)?);

                for j in span.clone() {
                    let terms = weights
                        .iter()
                        .zip(&cache.values[li])
                        .map(|(&w_t, v_t)| graph.mul(w_t, v_t[j]))
                        .collect::<Result<Vec<_>, _>>()?;
                    x_attn.push(graph.sum(&terms)?);
                }
            }
            let projected = linear(graph, &x_attn, &layer.attn_wo)?;
            x = add_vectors(graph, &projected, &residual)?;

            // 2) MLP
            let residual = x.clone();
            let xn = rmsnorm(graph, &x)?;
            let hidden = linear(graph, &xn, &layer.mlp_fc1)?;
            let hidden = hidden
                .into_iter()
                .map(|h| graph.relu(h))
                .collect::<Result<Vec<_>, _>>()?;
            let out = linear(graph, &hidden, &layer.mlp_fc2)?;
            x = add_vectors(graph, &out, &residual)?;
        }

        let logits = linear(graph, &x, &self.lm_head)?;
        Ok(ForwardOutput { logits, attention })
    }
}
