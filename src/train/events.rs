/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 训练事件
 *
 * 每个事件一经发出即不可变；同一步内的顺序固定为
 * step.forward → step.attention → step.loss → step.backward → step.update → (sample.generated)。
 * 只在输出边界处用 serde 序列化为 `{"type": ..., "payload": {...}}`。
 * 非有限浮点数写出为 `null`，读回时还原为 NaN。
 */

use super::config::TrainingConfig;
use crate::nn::{GroupNorms, OpGraph};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum StepEvent {
    #[serde(rename = "run.started")]
    RunStarted(RunStarted),
    #[serde(rename = "step.forward")]
    StepForward(StepForward),
    #[serde(rename = "step.attention")]
    StepAttention(StepAttention),
    #[serde(rename = "step.loss")]
    StepLoss(StepLoss),
    #[serde(rename = "step.backward")]
    StepBackward(StepBackward),
    #[serde(rename = "step.update")]
    StepUpdate(StepUpdate),
    #[serde(rename = "sample.generated")]
    SampleGenerated(SampleGenerated),
    #[serde(rename = "run.canceled")]
    RunCanceled(RunCanceled),
    #[serde(rename = "run.completed")]
    RunCompleted(RunCompleted),
    #[serde(rename = "run.failed")]
    RunFailed(RunFailed),
}

impl StepEvent {
    /// 事件类型名（即序列化后的 `type` 字段）
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted(_) => "run.started",
            Self::StepForward(_) => "step.forward",
            Self::StepAttention(_) => "step.attention",
            Self::StepLoss(_) => "step.loss",
            Self::StepBackward(_) => "step.backward",
            Self::StepUpdate(_) => "step.update",
            Self::SampleGenerated(_) => "sample.generated",
            Self::RunCanceled(_) => "run.canceled",
            Self::RunCompleted(_) => "run.completed",
            Self::RunFailed(_) => "run.failed",
        }
    }

    /// 事件所属的训练步（运行级事件没有）
    pub const fn step(&self) -> Option<usize> {
        match self {
            Self::StepForward(e) => Some(e.step),
            Self::StepAttention(e) => Some(e.step),
            Self::StepLoss(e) => Some(e.step),
            Self::StepBackward(e) => Some(e.step),
            Self::StepUpdate(e) => Some(e.step),
            Self::SampleGenerated(e) => Some(e.step),
            Self::RunCanceled(e) => Some(e.step),
            Self::RunStarted(_) | Self::RunCompleted(_) | Self::RunFailed(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStarted {
    pub vocab_size: usize,
    pub doc_count: usize,
    pub num_params: usize,
    pub config: TrainingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepForward {
    pub step: usize,
    pub token_summaries: Vec<TokenSummary>,
}

/// 某个位置的输入/目标 token 及模型给出的 top-k 预测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub position: usize,
    pub input_token: String,
    pub target_token: String,
    pub top_k: Vec<TopKEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKEntry {
    pub token_id: usize,
    pub token: String,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub prob: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAttention {
    pub step: usize,
    pub token_attention: Vec<TokenAttention>,
}

/// `heads` 按 (层, 头) 顺序排列，第 i 个向量覆盖位置 0..=position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAttention {
    pub position: usize,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize_nested")]
    pub heads: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLoss {
    pub step: usize,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBackward {
    pub step: usize,
    pub gradient_norms: GroupNorms,
    /// 未抓取快照的步中不出现该字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_graph: Option<OpGraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepUpdate {
    pub step: usize,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub learning_rate: f64,
    pub update_norms: GroupNorms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGenerated {
    pub step: usize,
    pub samples: Vec<String>,
}

/// `step` 为检测到取消时即将开始的那一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCanceled {
    pub step: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCompleted {
    pub steps_completed: usize,
    #[serde(deserialize_with = "crate::utils::nullable_float::deserialize")]
    pub final_loss: f64,
    pub vocab_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFailed {
    pub error: String,
}
