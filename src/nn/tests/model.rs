use approx::assert_abs_diff_eq;

use crate::nn::{Graph, KvCache, ModelDims, ModelState};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn setup() -> (Graph, ModelState) {
    let mut graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(3);
    let dims = ModelDims {
        vocab_size: 4,
        n_embd: 8,
        n_head: 2,
        n_layer: 2,
        block_size: 6,
    };
    let model = ModelState::init(&mut graph, &mut rng, dims).unwrap();
    (graph, model)
}

#[test]
fn test_forward_shapes_and_cache_growth() {
    let (mut graph, model) = setup();
    let mut cache = KvCache::new(2);
    assert!(cache.is_empty());

    for (pos, token) in [3, 0, 1, 2].into_iter().enumerate() {
        let out = model.forward(&mut graph, token, pos, &mut cache).unwrap();
        assert_eq!(out.logits.len(), 4);
        // 2 层 × 2 头，每个注意力向量覆盖 0..=pos
        assert_eq!(out.attention.len(), 4);
        assert!(out.attention.iter().all(|w| w.len() == pos + 1));
        assert_eq!(cache.len(0), pos + 1);
        assert_eq!(cache.len(1), pos + 1);
    }
}

#[test]
fn test_attention_weights_sum_to_one() {
    let (mut graph, model) = setup();
    let mut cache = KvCache::new(2);
    for pos in 0..6 {
        let out = model.forward(&mut graph, pos % 4, pos, &mut cache).unwrap();
        for head in &out.attention {
            assert_abs_diff_eq!(head.iter().sum::<f64>(), 1.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn test_first_position_attends_only_to_itself() {
    let (mut graph, model) = setup();
    let mut cache = KvCache::new(2);
    let out = model.forward(&mut graph, 3, 0, &mut cache).unwrap();
    for head in &out.attention {
        assert_eq!(head.len(), 1);
        assert_abs_diff_eq!(head[0], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_forward_rejects_bad_inputs() {
    let (mut graph, model) = setup();
    let mut cache = KvCache::new(2);
    // 超出 block_size 的位置
    assert!(model.forward(&mut graph, 0, 6, &mut cache).is_err());
    // 超出词表的 token
    assert!(model.forward(&mut graph, 4, 0, &mut KvCache::new(2)).is_err());
    // 缓存层数不一致
    assert!(model.forward(&mut graph, 0, 0, &mut KvCache::new(1)).is_err());
}

#[test]
fn test_forward_builds_only_transients() {
    let (mut graph, model) = setup();
    let num_params = graph.num_parameters();
    let mut cache = KvCache::new(2);
    let out = model.forward(&mut graph, 0, 0, &mut cache).unwrap();
    assert!(graph.num_transients() > 0);
    assert_eq!(graph.num_parameters(), num_params);

    // 反向传播后参数获得梯度
    graph.backward(out.logits[0]).unwrap();
    let grad = graph.grad(model.lm_head.row(0).unwrap()[0]).unwrap();
    assert!(grad != 0.0);
}
