/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 相同的文档、配置与种子必须产生逐字节一致的事件流
 */
use micro_gpt_lab::data::resolve_docs;
use micro_gpt_lab::train::{JsonLinesSink, NeverCancel, TrainingConfig, train};

fn config(seed: u64) -> TrainingConfig {
    TrainingConfig {
        n_embd: 8,
        n_head: 2,
        block_size: 8,
        num_steps: 6,
        sample_count: 2,
        sample_interval: 3,
        op_graph_step_interval: 2,
        seed,
        ..TrainingConfig::default()
    }
}

fn run(seed: u64) -> String {
    let docs = resolve_docs("sql_snippets", None).unwrap();
    let mut sink = JsonLinesSink::new(Vec::new());
    train(&docs, &config(seed), &mut sink, &NeverCancel).unwrap();
    String::from_utf8(sink.into_inner()).unwrap()
}

#[test]
fn test_runs_are_byte_identical() {
    let first = run(42);
    let second = run(42);
    assert_eq!(first, second);

    // run.started + 6 × 5 个步事件 + 2 次采样
    assert_eq!(first.lines().count(), 1 + 6 * 5 + 2);
    for (i, line) in first.lines().enumerate() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["seq"], (i + 1) as u64);
    }
}

#[test]
fn test_seed_changes_the_run() {
    assert_ne!(run(1), run(2));
}
