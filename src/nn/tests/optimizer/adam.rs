/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Adam 优化器测试
 */

use approx::assert_abs_diff_eq;

use crate::nn::optimizer::{ADAM_BETA1, ADAM_BETA2, ADAM_EPSILON, Adam, LinearDecay, Optimizer};
use crate::nn::{Graph, NodeId};

/// loss = 3w，∂loss/∂w = 3
fn backward_linear_loss(graph: &mut Graph, w: NodeId) {
    let loss = graph.mul_scalar(w, 3.0).unwrap();
    graph.backward(loss).unwrap();
}

#[test]
fn test_adam_fixed_hyperparameters() {
    assert_eq!(ADAM_BETA1, 0.85);
    assert_eq!(ADAM_BETA2, 0.99);
    assert_eq!(ADAM_EPSILON, 1e-8);
}

#[test]
fn test_adam_update() {
    // Adam 更新 (beta1=0.85, beta2=0.99, eps=1e-8, lr=0.1)，梯度恒为 3:
    //   m_1 = 0.15 * 3 = 0.45
    //   v_1 = 0.01 * 9 = 0.09
    //   m_hat = 0.45 / (1-0.85) = 3.0
    //   v_hat = 0.09 / (1-0.99) = 9.0
    //   update = 0.1 * 3.0 / (sqrt(9.0) + 1e-8) ≈ 0.1
    //   w_new = 2.0 - 0.1 ≈ 1.9
    let mut graph = Graph::new();
    let w = graph.new_parameter(2.0).unwrap();
    let mut adam = Adam::new(vec![w], 0.1);

    backward_linear_loss(&mut graph, w);
    let deltas = adam.step(&mut graph).unwrap();
    graph.release_transients();

    assert_eq!(adam.steps_taken(), 1);
    assert_abs_diff_eq!(deltas[0], 0.1, epsilon = 1e-7);
    assert_abs_diff_eq!(graph.value(w).unwrap(), 1.9, epsilon = 1e-7);
    let (m, v) = adam.moments();
    assert_abs_diff_eq!(m[0], 0.45, epsilon = 1e-12);
    assert_abs_diff_eq!(v[0], 0.09, epsilon = 1e-12);

    // 第 2 步：梯度不变时偏差修正后的比值仍为 1，更新量仍约等于 lr
    backward_linear_loss(&mut graph, w);
    let deltas = adam.step(&mut graph).unwrap();
    assert_abs_diff_eq!(deltas[0], 0.1, epsilon = 1e-7);
    assert_abs_diff_eq!(graph.value(w).unwrap(), 1.8, epsilon = 1e-6);
}

#[test]
fn test_adam_zeroes_grads_after_step() {
    let mut graph = Graph::new();
    let a = graph.new_parameter(1.0).unwrap();
    let b = graph.new_parameter(-1.0).unwrap();
    let prod = graph.mul(a, b).unwrap();
    graph.backward(prod).unwrap();
    assert_eq!(graph.grad(a).unwrap(), -1.0);

    let mut adam = Adam::new(vec![a, b], 0.01);
    adam.step(&mut graph).unwrap();
    assert_eq!(graph.grad(a).unwrap(), 0.0);
    assert_eq!(graph.grad(b).unwrap(), 0.0);
}

#[test]
fn test_adam_zero_grad_leaves_param_unchanged() {
    let mut graph = Graph::new();
    let w = graph.new_parameter(0.5).unwrap();
    let mut adam = Adam::new(vec![w], 0.1);

    let deltas = adam.step(&mut graph).unwrap();
    assert_eq!(deltas, vec![0.0]);
    assert_eq!(graph.value(w).unwrap(), 0.5);
}

#[test]
fn test_linear_decay() {
    let schedule = LinearDecay::new(0.01, 4);
    assert_abs_diff_eq!(schedule.lr_at(0), 0.01, epsilon = 1e-15);
    assert_abs_diff_eq!(schedule.lr_at(1), 0.0075, epsilon = 1e-15);
    assert_abs_diff_eq!(schedule.lr_at(3), 0.0025, epsilon = 1e-15);
    // 最后一步的学习率为正，只有越过总步数才归零
    assert_eq!(schedule.lr_at(4), 0.0);
}
