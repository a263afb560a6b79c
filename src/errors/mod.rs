/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 全局错误类型：配置错误 + 训练入口统一错误
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

use crate::data::DataError;
use crate::nn::GraphError;

/// 训练配置错误（在任何训练步开始前被拒绝）
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{field}须{operator}{threshold}，实际为{actual}")]
    ValueMustSatisfyComparison {
        field: &'static str,
        operator: ComparisonOperator,
        threshold: f64,
        actual: f64,
    },
    #[error("n_embd（{n_embd}）必须能被 n_head（{n_head}）整除")]
    HeadsMustDivideEmbedding { n_embd: usize, n_head: usize },
    #[error("配置解析失败：{0}")]
    Parse(String),
}

/// 事件输出端返回的错误（由外部实现决定具体类型）
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// 训练入口的统一错误
///
/// 除取消外，训练循环中的任何错误都原样向上传递，由调用方（如 `run_job`）记录为失败。
#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("语料为空：至少需要一个文档")]
    EmptyCorpus,
    #[error("语料中没有任何字符，词表为空")]
    EmptyVocabulary,
    #[error("训练器只能运行一次")]
    AlreadyStarted,
    #[error("采样失败：{0}")]
    Sampling(String),
    #[error("事件输出失败：{0}")]
    EventSink(#[source] SinkError),
}
