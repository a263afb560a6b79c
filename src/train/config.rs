/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 训练配置与运行上限
 *
 * 所有字段都有上/下限，在训练开始前统一校验一次：先查下限，再查上限，最后查 n_embd 与 n_head 的整除关系。
 */

use crate::errors::{ComparisonOperator, ConfigError};
use serde::{Deserialize, Serialize};

/// 运行上限（上传、语料与模型规模）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunLimits {
    pub upload_max_bytes: usize,
    pub upload_max_unique_chars: usize,
    pub corpus_max_chars: usize,
    pub num_steps_max: usize,
    pub block_size_max: usize,
    pub n_embd_max: usize,
    pub n_layer_max: usize,
    pub n_head_max: usize,
}

pub const RUN_LIMITS: RunLimits = RunLimits {
    upload_max_bytes: 200 * 1024,
    upload_max_unique_chars: 256,
    corpus_max_chars: 200_000,
    num_steps_max: 2_000,
    block_size_max: 64,
    n_embd_max: 64,
    n_layer_max: 2,
    n_head_max: 8,
};

/// 采样条数与 top-k 的上限
pub const SAMPLE_COUNT_MAX: usize = 20;
pub const TOP_K_MAX: usize = 20;

/// 一次训练运行的全部超参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub n_embd: usize,
    pub n_head: usize,
    pub n_layer: usize,
    pub block_size: usize,
    pub num_steps: usize,
    pub learning_rate: f64,
    /// 采样温度（只影响采样，不影响训练）
    pub temperature: f64,
    pub seed: u64,
    pub sample_count: usize,
    /// 每隔多少步采样一次（最后一步总会采样）
    pub sample_interval: usize,
    /// step.forward 中汇报的候选 token 数（不影响采样）
    pub top_k: usize,
    /// 取哪个位置的损失子图做快照
    pub op_graph_token_index: usize,
    /// 每隔多少步做一次子图快照
    pub op_graph_step_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_embd: 32,
            n_head: 4,
            n_layer: 1,
            block_size: 16,
            num_steps: 300,
            learning_rate: 0.01,
            temperature: 0.8,
            seed: 42,
            sample_count: 5,
            sample_interval: 100,
            top_k: 5,
            op_graph_token_index: 0,
            op_graph_step_interval: 25,
        }
    }
}

fn check(
    field: &'static str,
    operator: ComparisonOperator,
    threshold: f64,
    actual: f64,
) -> Result<(), ConfigError> {
    if operator.holds(actual, threshold) {
        Ok(())
    } else {
        Err(ConfigError::ValueMustSatisfyComparison {
            field,
            operator,
            threshold,
            actual,
        })
    }
}

impl TrainingConfig {
    /// 解析 JSON（缺省字段取默认值）并校验
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        use ComparisonOperator::{GreaterOrEqual, GreaterThan, LessOrEqual};
        let limits = &RUN_LIMITS;

        // 1. 下限
        let minima: [(&'static str, ComparisonOperator, f64, f64); 11] = [
            ("n_embd", GreaterOrEqual, 8.0, self.n_embd as f64),
            ("n_head", GreaterOrEqual, 1.0, self.n_head as f64),
            ("n_layer", GreaterOrEqual, 1.0, self.n_layer as f64),
            ("block_size", GreaterOrEqual, 4.0, self.block_size as f64),
            ("num_steps", GreaterOrEqual, 1.0, self.num_steps as f64),
            ("learning_rate", GreaterThan, 0.0, self.learning_rate),
            ("temperature", GreaterThan, 0.0, self.temperature),
            ("sample_count", GreaterOrEqual, 1.0, self.sample_count as f64),
            ("sample_interval", GreaterOrEqual, 1.0, self.sample_interval as f64),
            ("top_k", GreaterOrEqual, 1.0, self.top_k as f64),
            (
                "op_graph_step_interval",
                GreaterOrEqual,
                1.0,
                self.op_graph_step_interval as f64,
            ),
        ];
        // 2. 上限
        let maxima: [(&'static str, usize, usize); 7] = [
            ("sample_count", SAMPLE_COUNT_MAX, self.sample_count),
            ("top_k", TOP_K_MAX, self.top_k),
            ("n_embd", limits.n_embd_max, self.n_embd),
            ("n_head", limits.n_head_max, self.n_head),
            ("n_layer", limits.n_layer_max, self.n_layer),
            ("block_size", limits.block_size_max, self.block_size),
            ("num_steps", limits.num_steps_max, self.num_steps),
        ];

        for (field, operator, threshold, actual) in minima {
            check(field, operator, threshold, actual)?;
        }
        for (field, max, actual) in maxima {
            check(field, LessOrEqual, max as f64, actual as f64)?;
        }

        // 3. 多头切分
        if self.n_embd % self.n_head != 0 {
            return Err(ConfigError::HeadsMustDivideEmbedding {
                n_embd: self.n_embd,
                n_head: self.n_head,
            });
        }
        Ok(())
    }

    pub const fn head_dim(&self) -> usize {
        self.n_embd / self.n_head
    }
}
