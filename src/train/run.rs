/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 单次运行的生命周期：状态流转与终止事件
 *
 * run.completed / run.failed 只由这里追加，训练循环本身从不发出它们。
 */

use super::config::TrainingConfig;
use super::events::{RunCompleted, RunFailed, StepEvent};
use super::sink::{CancelSource, EventSink};
use super::trainer::{TrainResult, TrainStatus, train};
use crate::errors::TrainError;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// 运行的终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
    Canceled,
}

/// 一次运行的最终结果
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// 训练正常结束（完成或取消）时的结果
    pub result: Option<TrainResult>,
    /// 失败时的错误
    pub error: Option<TrainError>,
}

/// 执行一次运行
///
/// - 开始前已请求取消：直接返回 Canceled，不训练也不发任何事件
/// - 训练完成：追加 `run.completed`
/// - 训练被取消：不再追加事件
/// - 任何错误：追加 `run.failed`（若输出端仍可用）并返回 Failed
pub fn run_job<D, S, C>(docs: &[D], config: &TrainingConfig, sink: &mut S, cancel: &C) -> RunOutcome
where
    D: AsRef<str>,
    S: EventSink + ?Sized,
    C: CancelSource + ?Sized,
{
    if cancel.is_cancel_requested() {
        info!("运行开始前已被取消");
        return RunOutcome {
            status: RunStatus::Canceled,
            result: None,
            error: None,
        };
    }

    match train(docs, config, sink, cancel) {
        Ok(result) if result.status == TrainStatus::Canceled => RunOutcome {
            status: RunStatus::Canceled,
            result: Some(result),
            error: None,
        },
        Ok(result) => {
            let completed = StepEvent::RunCompleted(RunCompleted {
                steps_completed: result.steps_completed,
                final_loss: round_to(result.final_loss, 6),
                vocab_size: result.vocab_size,
            });
            match sink.emit(completed) {
                Ok(()) => RunOutcome {
                    status: RunStatus::Completed,
                    result: Some(result),
                    error: None,
                },
                Err(e) => fail(sink, TrainError::EventSink(e)),
            }
        }
        Err(e) => fail(sink, e),
    }
}

fn fail<S: EventSink + ?Sized>(sink: &mut S, err: TrainError) -> RunOutcome {
    error!(error = %err, "运行失败");
    let failed = StepEvent::RunFailed(RunFailed {
        error: err.to_string(),
    });
    if let Err(sink_err) = sink.emit(failed) {
        error!(error = %sink_err, "无法写出 run.failed 事件");
    }
    RunOutcome {
        status: RunStatus::Failed,
        result: None,
        error: Some(err),
    }
}
