/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 从当前模型自回归采样文本，以及 step.forward 中的 top-k 汇总
 */

use crate::data::Vocabulary;
use crate::errors::TrainError;
use crate::nn::{Graph, KvCache, ModelState, softmax};
use crate::utils::round_to;
use super::events::TopKEntry;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use std::cmp::Ordering;

/// 采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub sample_count: usize,
    pub temperature: f64,
    /// 单条序列的最大长度（不含起始 BOS）
    pub max_len: usize,
}

/// 生成 `sample_count` 条文本
///
/// 每条序列从空缓存和 BOS 开始；每个位置对 `softmax(logits / temperature)` 在整个词表上做加权抽样，
/// 抽到 BOS 或达到 `max_len` 时结束。每条序列结束后释放其临时节点。
pub fn sample_sequences<R: Rng + ?Sized>(
    graph: &mut Graph,
    model: &ModelState,
    vocab: &Vocabulary,
    params: SamplingParams,
    rng: &mut R,
) -> Result<Vec<String>, TrainError> {
    let n_layer = model.dims().n_layer;
    let inv_temperature = 1.0 / params.temperature;
    let mut samples = Vec::with_capacity(params.sample_count);

    for _ in 0..params.sample_count {
        let mut cache = KvCache::new(n_layer);
        let mut token = vocab.bos();
        let mut text = String::new();

        for pos in 0..params.max_len {
            let out = model.forward(graph, token, pos, &mut cache)?;
            let scaled = out
                .logits
                .iter()
                .map(|&logit| graph.mul_scalar(logit, inv_temperature))
                .collect::<Result<Vec<_>, _>>()?;
            let probs = softmax(graph, &scaled)?;
            let weights = graph.values(&probs)?;

            token = draw(&weights, rng)?;
            match vocab.char_at(token) {
                Some(c) => text.push(c),
                None => break,
            }
        }

        graph.release_transients();
        samples.push(text);
    }
    Ok(samples)
}

/// 按权重抽取一个下标；权重中出现 NaN/Inf 时报错
fn draw<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, TrainError> {
    if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
        return Err(TrainError::Sampling(format!("概率分布中存在非有限值 {bad}")));
    }
    let dist = WeightedIndex::new(weights).map_err(|e| TrainError::Sampling(e.to_string()))?;
    Ok(dist.sample(rng))
}

/// 概率最高的 `k` 个 token（概率相同时保持 id 顺序），概率保留 6 位小数
pub fn top_k_entries(probs: &[f64], vocab: &Vocabulary, k: usize) -> Vec<TopKEntry> {
    let mut ranked: Vec<(usize, f64)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(k)
        .map(|(token_id, prob)| TopKEntry {
            token_id,
            token: vocab.token_str(token_id),
            prob: round_to(prob, 6),
        })
        .collect()
}
