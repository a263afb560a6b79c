/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Optimizer API
 *
 * 核心特性：
 * - 优化器按构造时给定的稳定顺序持有参数 NodeId，矩估计与之按下标一一对应
 * - step() 直接读写 Graph 中参数节点的值与梯度，逐个参数更新后立即清零其梯度
 * - step() 返回每个参数本次的更新量，供调用方汇报分组范数
 */

use crate::nn::{Graph, GraphError, NodeId};

/// β1（一阶矩衰减），固定值
pub const ADAM_BETA1: f64 = 0.85;
/// β2（二阶矩衰减），固定值
pub const ADAM_BETA2: f64 = 0.99;
/// 数值稳定项，固定值
pub const ADAM_EPSILON: f64 = 1e-8;

/// Optimizer trait
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Adam::new(params.ids.clone(), 0.01);
///
/// graph.backward(loss)?;
/// optimizer.set_learning_rate(schedule.lr_at(step0));
/// let deltas = optimizer.step(&mut graph)?; // 更新参数并清零梯度
/// graph.release_transients();
/// ```
pub trait Optimizer {
    /// 更新全部参数并清零其梯度，返回各参数的更新量（与参数顺序一致）
    fn step(&mut self, graph: &mut Graph) -> Result<Vec<f64>, GraphError>;

    /// 获取学习率
    fn learning_rate(&self) -> f64;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f64);
}

/// Adam 优化器
///
/// Adam: Adaptive Moment Estimation
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - θ = θ - α * `m_hat` / (√`v_hat` + ε)
#[derive(Debug, Clone)]
pub struct Adam {
    /// 要优化的参数（顺序即矩估计的下标）
    params: Vec<NodeId>,
    /// 学习率
    lr: f64,
    /// β1 (一阶矩衰减)
    beta1: f64,
    /// β2 (二阶矩衰减)
    beta2: f64,
    /// 数值稳定项
    epsilon: f64,
    /// 一阶矩估计
    m: Vec<f64>,
    /// 二阶矩估计
    v: Vec<f64>,
    /// 时间步（从 1 开始计，用于偏差修正）
    t: usize,
}

impl Adam {
    /// 使用固定超参数创建 Adam 优化器
    pub fn new(params: Vec<NodeId>, lr: f64) -> Self {
        Self::new_with_config(params, lr, ADAM_BETA1, ADAM_BETA2, ADAM_EPSILON)
    }

    /// 创建带完整配置的 Adam 优化器
    pub fn new_with_config(params: Vec<NodeId>, lr: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        let n = params.len();
        Self {
            params,
            lr,
            beta1,
            beta2,
            epsilon,
            m: vec![0.0; n],
            v: vec![0.0; n],
            t: 0,
        }
    }

    pub fn params(&self) -> &[NodeId] {
        &self.params
    }

    /// 已执行的步数
    pub const fn steps_taken(&self) -> usize {
        self.t
    }

    pub fn moments(&self) -> (&[f64], &[f64]) {
        (&self.m, &self.v)
    }
}

impl Optimizer for Adam {
    fn step(&mut self, graph: &mut Graph) -> Result<Vec<f64>, GraphError> {
        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        let mut deltas = Vec::with_capacity(self.params.len());
        for (i, &id) in self.params.iter().enumerate() {
            let grad = graph.grad(id)?;
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * grad;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * (grad * grad);
            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;
            let delta = self.lr * m_hat / (v_hat.sqrt() + self.epsilon);

            let value = graph.value(id)?;
            graph.set_parameter_value(id, value - delta)?;
            // 同一步中多个损失项会累加进同一个梯度，用完必须清零
            graph.zero_parameter_grad(id)?;
            deltas.push(delta);
        }
        Ok(deltas)
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.lr = lr;
    }
}

/// 线性衰减学习率：`lr_t = base_lr * (1 - step / num_steps)`，step 从 0 计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDecay {
    base_lr: f64,
    num_steps: usize,
}

impl LinearDecay {
    pub const fn new(base_lr: f64, num_steps: usize) -> Self {
        Self { base_lr, num_steps }
    }

    pub fn lr_at(&self, step: usize) -> f64 {
        self.base_lr * (1.0 - step as f64 / self.num_steps as f64)
    }
}
