//! # Micro GPT Lab
//!
//! `micro_gpt_lab`用纯rust实现一个字符级的迷你transformer训练引擎：
//! 所有计算都由标量节点组成的计算图完成（无张量），训练过程中的损失、注意力权重、
//! 梯度/更新范数、采样文本以及裁剪后的计算子图都以事件形式实时输出，供可视化前端展示。
//!
//! ```ignore
//! use micro_gpt_lab::data::resolve_docs;
//! use micro_gpt_lab::train::{NeverCancel, StepEvent, TrainingConfig, train};
//!
//! let docs = resolve_docs("arithmetic", None)?;
//! let mut events: Vec<StepEvent> = Vec::new();
//! let result = train(&docs, &TrainingConfig::default(), &mut events, &NeverCancel)?;
//! ```

pub mod data;
pub mod distribution;
pub mod errors;
pub mod nn;
pub mod train;
pub mod utils;

pub use errors::{ConfigError, TrainError};
pub use train::{TrainResult, TrainStatus, TrainingConfig, run_job, train};
