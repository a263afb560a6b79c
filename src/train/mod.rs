/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 训练引擎：配置、训练循环、采样、事件与运行生命周期
 */

pub mod config;
pub mod events;
pub mod run;
mod sampling;
pub mod sink;
mod trainer;

#[cfg(test)]
mod tests;

pub use config::{RUN_LIMITS, RunLimits, TrainingConfig};
pub use events::StepEvent;
pub use run::{RunOutcome, RunStatus, run_job};
pub use sampling::{SamplingParams, sample_sequences, top_k_entries};
pub use sink::{CancelFlag, CancelSource, EventSink, JsonLinesSink, NeverCancel};
pub use trainer::{TrainPhase, TrainResult, TrainStatus, Trainer, train};
