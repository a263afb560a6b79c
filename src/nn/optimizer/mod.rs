/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 优化器模块：Adam + 线性衰减学习率
 */

mod core;

pub use self::core::{ADAM_BETA1, ADAM_BETA2, ADAM_EPSILON, Adam, LinearDecay, Optimizer};
