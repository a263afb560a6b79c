use approx::assert_abs_diff_eq;

use crate::nn::Graph;

/// f(x) = x·x + 3x
fn build(graph: &mut Graph, x: crate::nn::NodeId) -> crate::nn::NodeId {
    let xx = graph.mul(x, x).unwrap();
    let three_x = graph.mul_scalar(x, 3.0).unwrap();
    graph.add(xx, three_x).unwrap()
}

#[test]
fn test_backward_matches_finite_difference() {
    let x0 = 2.5;
    let mut graph = Graph::new();
    let x = graph.new_parameter(x0).unwrap();
    let y = build(&mut graph, x);
    graph.backward(y).unwrap();

    let f = |x: f64| x * x + 3.0 * x;
    let h = 1e-6;
    let numeric = (f(x0 + h) - f(x0 - h)) / (2.0 * h);
    assert_abs_diff_eq!(graph.grad(x).unwrap(), numeric, epsilon = 1e-4);
    assert_abs_diff_eq!(graph.grad(x).unwrap(), 8.0, epsilon = 1e-12);
    assert_eq!(graph.grad(y).unwrap(), 1.0);
}

#[test]
fn test_gradients_accumulate_until_zeroed() {
    let mut graph = Graph::new();
    let x = graph.new_parameter(2.5).unwrap();

    let y1 = build(&mut graph, x);
    graph.backward(y1).unwrap();
    let y2 = build(&mut graph, x);
    graph.backward(y2).unwrap();
    assert_abs_diff_eq!(graph.grad(x).unwrap(), 16.0, epsilon = 1e-12);

    graph.zero_parameter_grads();
    assert_eq!(graph.grad(x).unwrap(), 0.0);
}

#[test]
fn test_shared_subexpression_counts_every_path() {
    // y = (a·b) + (a·b)，a·b 只建一次
    let mut graph = Graph::new();
    let a = graph.new_parameter(3.0).unwrap();
    let b = graph.new_parameter(4.0).unwrap();
    let ab = graph.mul(a, b).unwrap();
    let y = graph.add(ab, ab).unwrap();
    graph.backward(y).unwrap();

    assert_eq!(graph.grad(a).unwrap(), 8.0);
    assert_eq!(graph.grad(b).unwrap(), 6.0);
}

#[test]
fn test_topological_order_is_post_order() {
    let mut graph = Graph::new();
    let x = graph.new_parameter(1.0).unwrap();
    let y = build(&mut graph, x);
    let order = graph.topological_order(y).unwrap();

    assert_eq!(order.last(), Some(&y));
    for (i, &id) in order.iter().enumerate() {
        for &(child, _) in graph.node(id).unwrap().children() {
            let child_pos = order.iter().position(|&n| n == child).unwrap();
            assert!(child_pos < i);
        }
    }
    // 每个节点只出现一次
    let mut dedup = order.clone();
    dedup.sort();
    dedup.dedup();
    assert_eq!(dedup.len(), order.len());
}

#[test]
fn test_deep_chain_does_not_overflow_stack() {
    let mut graph = Graph::new();
    let x = graph.new_parameter(1.0).unwrap();
    let mut y = x;
    for _ in 0..200_000 {
        y = graph.add_scalar(y, 0.0).unwrap();
    }
    graph.backward(y).unwrap();
    assert_eq!(graph.grad(x).unwrap(), 1.0);
}
