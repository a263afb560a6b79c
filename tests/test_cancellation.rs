/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 取消：在第 K 步开始前取消，已完成 K-1 步，且不再出现第 K 步及之后的步事件
 */
use micro_gpt_lab::train::{
    CancelFlag, EventSink, StepEvent, TrainStatus, TrainingConfig, train,
};
use micro_gpt_lab::errors::SinkError;

/// 收到第 `cancel_after` 步的 step.update 后置位取消标志
struct CancelAfterStep {
    events: Vec<StepEvent>,
    flag: CancelFlag,
    cancel_after: usize,
}

impl EventSink for CancelAfterStep {
    fn emit(&mut self, event: StepEvent) -> Result<(), SinkError> {
        if let StepEvent::StepUpdate(update) = &event {
            if update.step == self.cancel_after {
                self.flag.cancel();
            }
        }
        self.events.push(event);
        Ok(())
    }
}

#[test]
fn test_cancel_before_step_k() {
    const K: usize = 4;
    let config = TrainingConfig {
        n_embd: 8,
        n_head: 2,
        block_size: 8,
        num_steps: 10,
        sample_interval: 2,
        sample_count: 1,
        ..TrainingConfig::default()
    };
    let flag = CancelFlag::new();
    let mut sink = CancelAfterStep {
        events: Vec::new(),
        flag: flag.clone(),
        cancel_after: K - 1,
    };

    let result = train(&["hello", "world"], &config, &mut sink, &flag).unwrap();
    assert_eq!(result.status, TrainStatus::Canceled);
    assert_eq!(result.steps_completed, K - 1);
    assert!(result.final_loss > 0.0);

    let (last, rest) = sink.events.split_last().unwrap();
    assert!(matches!(last, StepEvent::RunCanceled(c) if c.step == K));
    assert!(rest.iter().all(|e| e.step().is_none_or(|s| s < K)));
    // 取消之前的采样照常发生（第 2 步）
    assert!(rest.iter().any(|e| matches!(e, StepEvent::SampleGenerated(s) if s.step == 2)));
}
