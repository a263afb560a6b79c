
use super::TrainingConfig;

/// 足够小、几步就能跑完的配置
pub(super) fn tiny_config() -> TrainingConfig {
    TrainingConfig {
        n_embd: 8,
        n_head: 2,
        n_layer: 1,
        block_size: 8,
        num_steps: 3,
        sample_count: 2,
        sample_interval: 2,
        op_graph_step_interval: 2,
        ..TrainingConfig::default()
    }
}
