/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Optimizer trait 通用行为测试
 */

use crate::assert_err;
use crate::nn::optimizer::{Adam, Optimizer};
use crate::nn::{Graph, GraphError};

#[test]
fn test_learning_rate_modification() {
    let mut graph = Graph::new();
    let w = graph.new_parameter(1.0).unwrap();
    let mut adam: Box<dyn Optimizer> = Box::new(Adam::new(vec![w], 0.001));
    assert_eq!(adam.learning_rate(), 0.001);

    adam.set_learning_rate(0.0001);
    assert_eq!(adam.learning_rate(), 0.0001);
}

#[test]
fn test_step_advances_moments() {
    let mut graph = Graph::new();
    let w = graph.new_parameter(1.0).unwrap();
    let loss = graph.mul(w, w).unwrap();
    graph.backward(loss).unwrap();

    let mut adam = Adam::new(vec![w], 0.01);
    assert_eq!(adam.moments(), (&[0.0][..], &[0.0][..]));
    adam.step(&mut graph).unwrap();
    assert_eq!(adam.steps_taken(), 1);
    assert!(adam.moments().0[0] != 0.0);
}

#[test]
fn test_step_rejects_non_parameter_ids() {
    let mut graph = Graph::new();
    let w = graph.new_parameter(1.0).unwrap();
    let c = graph.constant(2.0);
    let mut adam = Adam::new(vec![w, c], 0.01);
    assert_err!(adam.step(&mut graph), GraphError::InvalidOperation(_));
}
