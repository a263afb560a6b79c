/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 模型参数状态
 *
 * ModelState 持有全部参数矩阵（每个元素都是计算图中的持久参数节点），
 * 在运行开始时用带种子的高斯分布初始化一次，此后只由优化器原地更新，运行期内不会重建。
 *
 * # 参数布局
 *
 * | 名称 | 形状 | 分组 |
 * |------|------|------|
 * | `wte` | vocab_size × n_embd | embeddings |
 * | `wpe` | block_size × n_embd | embeddings |
 * | `lm_head` | vocab_size × n_embd | lm_head |
 * | `layer{i}.attn_wq/wk/wv/wo` | n_embd × n_embd | attention |
 * | `layer{i}.mlp_fc1` | 4·n_embd × n_embd | mlp |
 * | `layer{i}.mlp_fc2` | n_embd × 4·n_embd | mlp |
 */

use super::{Graph, GraphError, NodeId};
use crate::distribution::Gaussian;
use crate::utils::{l2_norm, round_to};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 参数初始化的标准差
pub const INIT_STD: f64 = 0.08;

/// MLP 隐层相对 n_embd 的倍数
pub const MLP_EXPANSION: usize = 4;

// ============================================================================
// 参数分组
// ============================================================================

/// 参数按角色分组（用于梯度/更新范数的汇报）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGroup {
    Embeddings,
    Attention,
    Mlp,
    LmHead,
}

/// 每个分组一个 L2 范数（保留 6 位小数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNorms {
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub embeddings: f64,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub attention: f64,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub mlp: f64,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub lm_head: f64,
}

impl GroupNorms {
    /// 由 (分组, 数值) 序列按组求 L2 范数
    pub fn from_grouped(values: impl IntoIterator<Item = (ParamGroup, f64)>) -> Self {
        let mut buckets: [Vec<f64>; 4] = Default::default();
        for (group, value) in values {
            buckets[group as usize].push(value);
        }
        let [embeddings, attention, mlp, lm_head] =
            buckets.map(|bucket| round_to(l2_norm(bucket), 6));
        Self {
            embeddings,
            attention,
            mlp,
            lm_head,
        }
    }

    pub const fn get(&self, group: ParamGroup) -> f64 {
        match group {
            ParamGroup::Embeddings => self.embeddings,
            ParamGroup::Attention => self.attention,
            ParamGroup::Mlp => self.mlp,
            ParamGroup::LmHead => self.lm_head,
        }
    }
}

// ============================================================================
// ParameterMatrix
// ============================================================================

/// rows × cols 的参数节点矩阵（行优先）
#[derive(Debug, Clone)]
pub struct ParameterMatrix {
    rows: usize,
    cols: usize,
    group: ParamGroup,
    ids: Vec<NodeId>,
}

impl ParameterMatrix {
    /// 逐元素从 `init` 抽样并创建参数节点
    pub fn new<R: Rng + ?Sized>(
        graph: &mut Graph,
        rng: &mut R,
        init: &Gaussian,
        rows: usize,
        cols: usize,
        group: ParamGroup,
    ) -> Result<Self, GraphError> {
        let ids = (0..rows * cols)
            .map(|_| graph.new_parameter(init.sample(rng)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rows,
            cols,
            group,
            ids,
        })
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn group(&self) -> ParamGroup {
        self.group
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// 第 `index` 行；越界时报错而非 panic
    pub fn row(&self, index: usize) -> Result<&[NodeId], GraphError> {
        if index >= self.rows {
            return Err(GraphError::InvalidOperation(format!(
                "行下标 {index} 越界（共 {} 行）",
                self.rows
            )));
        }
        Ok(&self.ids[index * self.cols..(index + 1) * self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[NodeId]> {
        self.ids.chunks(self.cols)
    }
}

// ============================================================================
// ModelState
// ============================================================================

/// 单层 Transformer block 的参数
#[derive(Debug, Clone)]
pub struct LayerParams {
    pub attn_wq: ParameterMatrix,
    pub attn_wk: ParameterMatrix,
    pub attn_wv: ParameterMatrix,
    pub attn_wo: ParameterMatrix,
    pub mlp_fc1: ParameterMatrix,
    pub mlp_fc2: ParameterMatrix,
}

/// 模型维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDims {
    pub vocab_size: usize,
    pub n_embd: usize,
    pub n_head: usize,
    pub n_layer: usize,
    pub block_size: usize,
}

impl ModelDims {
    pub const fn head_dim(&self) -> usize {
        self.n_embd / self.n_head
    }
}

/// 全部参数矩阵
#[derive(Debug, Clone)]
pub struct ModelState {
    dims: ModelDims,
    pub wte: ParameterMatrix,
    pub wpe: ParameterMatrix,
    pub lm_head: ParameterMatrix,
    pub layers: Vec<LayerParams>,
}

/// 按稳定顺序展平后的参数（优化器与范数汇报共用同一顺序）
#[derive(Debug, Clone, Default)]
pub struct FlatParameters {
    pub ids: Vec<NodeId>,
    pub groups: Vec<ParamGroup>,
}

impl FlatParameters {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 当前各参数梯度的分组范数
    pub fn gradient_norms(&self, graph: &Graph) -> Result<GroupNorms, GraphError> {
        let grads = self
            .ids
            .iter()
            .map(|&id| graph.grad(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GroupNorms::from_grouped(
            self.groups.iter().copied().zip(grads),
        ))
    }

    /// 与 `ids` 同序的一组数值（如每个参数的更新量）的分组范数
    pub fn grouped_norms(&self, values: &[f64]) -> GroupNorms {
        GroupNorms::from_grouped(self.groups.iter().copied().zip(values.iter().copied()))
    }
}

impl ModelState {
    /// 按固定顺序初始化：wte → wpe → lm_head → 各层 wq/wk/wv/wo/fc1/fc2
    ///
    /// 该顺序决定了随机数的消耗顺序，改变它会改变同一种子下的全部输出。
    pub fn init<R: Rng + ?Sized>(
        graph: &mut Graph,
        rng: &mut R,
        dims: ModelDims,
    ) -> Result<Self, GraphError> {
        let init = Gaussian::new(0.0, INIT_STD);
        let d = dims.n_embd;
        let hidden = MLP_EXPANSION * d;

        let wte = ParameterMatrix::new(graph, rng, &init, dims.vocab_size, d, ParamGroup::Embeddings)?;
        let wpe = ParameterMatrix::new(graph, rng, &init, dims.block_size, d, ParamGroup::Embeddings)?;
        let lm_head = ParameterMatrix::new(graph, rng, &init, dims.vocab_size, d, ParamGroup::LmHead)?;

        let mut layers = Vec::with_capacity(dims.n_layer);
        for _ in 0..dims.n_layer {
            let attn = ParamGroup::Attention;
            let mlp = ParamGroup::Mlp;
            layers.push(LayerParams {
                attn_wq: ParameterMatrix::new(graph, rng, &init, d, d, attn)?,
                attn_wk: ParameterMatrix::new(graph, rng, &init, d, d, attn)?,
                attn_wv: ParameterMatrix::new(graph, rng, &init, d, d, attn)?,
                attn_wo: ParameterMatrix::new(graph, rng, &init, d, d, attn)?,
                mlp_fc1: ParameterMatrix::new(graph, rng, &init, hidden, d, mlp)?,
                mlp_fc2: ParameterMatrix::new(graph, rng, &init, d, hidden, mlp)?,
            });
        }

        Ok(Self {
            dims,
            wte,
            wpe,
            lm_head,
            layers,
        })
    }

    pub const fn dims(&self) -> &ModelDims {
        &self.dims
    }

    /// (名称, 矩阵)，按初始化顺序
    pub fn named_matrices(&self) -> Vec<(String, &ParameterMatrix)> {
        let mut named = vec![
            ("wte".to_string(), &self.wte),
            ("wpe".to_string(), &self.wpe),
            ("lm_head".to_string(), &self.lm_head),
        ];
        for (i, layer) in self.layers.iter().enumerate() {
            named.push((format!("layer{i}.attn_wq"), &layer.attn_wq));
            named.push((format!("layer{i}.attn_wk"), &layer.attn_wk));
            named.push((format!("layer{i}.attn_wv"), &layer.attn_wv));
            named.push((format!("layer{i}.attn_wo"), &layer.attn_wo));
            named.push((format!("layer{i}.mlp_fc1"), &layer.mlp_fc1));
            named.push((format!("layer{i}.mlp_fc2"), &layer.mlp_fc2));
        }
        named
    }

    /// 按 `named_matrices` 顺序展平
    pub fn flatten(&self) -> FlatParameters {
        let mut flat = FlatParameters::default();
        for (_, matrix) in self.named_matrices() {
            flat.ids.extend_from_slice(matrix.ids());
            flat.groups
                .extend(std::iter::repeat_n(matrix.group(), matrix.ids().len()));
        }
        flat
    }

    pub fn num_params(&self) -> usize {
        self.named_matrices()
            .iter()
            .map(|(_, m)| m.ids().len())
            .sum()
    }
}
