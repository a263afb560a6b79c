/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 训练循环
 *
 * 状态：NotStarted → Running → {Completed, Canceled}；失败以错误形式返回给调用方。
 *
 * 随机数只在三处消耗，且顺序固定：打乱文档 → 参数初始化 → 采样。
 * 因此同一组文档、配置与种子产生的事件序列逐字节一致。
 */

use super::config::TrainingConfig;
use super::events::{
    RunCanceled, RunStarted, SampleGenerated, StepAttention, StepBackward, StepEvent, StepForward,
    StepLoss, StepUpdate, TokenAttention, TokenSummary,
};
use super::sampling::{SamplingParams, sample_sequences, top_k_entries};
use super::sink::{CancelSource, EventSink};
use crate::data::Vocabulary;
use crate::errors::TrainError;
use crate::nn::{
    Adam, FlatParameters, Graph, KvCache, LinearDecay, ModelDims, ModelState, NodeId,
    OP_GRAPH_MAX_NODES, Optimizer, softmax,
};
use crate::utils::round_to;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 训练器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainPhase {
    NotStarted,
    Running,
    Completed,
    Canceled,
}

/// 训练的终止状态（失败不在此列，而是以 `Err` 返回）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainStatus {
    Completed,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResult {
    pub status: TrainStatus,
    /// 最后一个完成步的平均损失（一步都未完成时为 0）
    pub final_loss: f64,
    pub steps_completed: usize,
    pub vocab_size: usize,
}

/// 训练入口：校验配置、搭建模型并跑完全部步数（或直到被取消）
///
/// # 使用示例
/// ```ignore
/// let mut events: Vec<StepEvent> = Vec::new();
/// let result = train(&docs, &TrainingConfig::default(), &mut events, &NeverCancel)?;
/// assert_eq!(result.status, TrainStatus::Completed);
/// ```
pub fn train<D, S, C>(
    docs: &[D],
    config: &TrainingConfig,
    sink: &mut S,
    cancel: &C,
) -> Result<TrainResult, TrainError>
where
    D: AsRef<str>,
    S: EventSink + ?Sized,
    C: CancelSource + ?Sized,
{
    Trainer::new(docs, config)?.run(sink, cancel)
}

/// 单次运行的全部状态
#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    docs: Vec<String>,
    vocab: Vocabulary,
    graph: Graph,
    model: ModelState,
    params: FlatParameters,
    optimizer: Adam,
    schedule: LinearDecay,
    rng: StdRng,
    phase: TrainPhase,
    last_loss: f64,
}

/// 单步前向的产物
struct StepForwardPass {
    loss: NodeId,
    loss_value: f64,
    /// 用于子图快照的那个位置的损失节点
    selected_loss: Option<NodeId>,
    token_summaries: Vec<TokenSummary>,
    token_attention: Vec<TokenAttention>,
}

impl Trainer {
    /// 按固定顺序完成准备工作：播种 → 打乱文档 → 建词表 → 初始化参数 → 展平参数
    pub fn new<D: AsRef<str>>(docs: &[D], config: &TrainingConfig) -> Result<Self, TrainError> {
        config.validate()?;
        if docs.is_empty() {
            return Err(TrainError::EmptyCorpus);
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut docs: Vec<String> = docs.iter().map(|d| d.as_ref().to_string()).collect();
        docs.shuffle(&mut rng);

        let vocab = Vocabulary::from_docs(&docs);
        if vocab.is_empty() {
            return Err(TrainError::EmptyVocabulary);
        }

        let dims = ModelDims {
            vocab_size: vocab.size(),
            n_embd: config.n_embd,
            n_head: config.n_head,
            n_layer: config.n_layer,
            block_size: config.block_size,
        };
        let mut graph = Graph::new();
        let model = ModelState::init(&mut graph, &mut rng, dims)?;
        let params = model.flatten();
        let optimizer = Adam::new(params.ids.clone(), config.learning_rate);
        let schedule = LinearDecay::new(config.learning_rate, config.num_steps);

        Ok(Self {
            config: config.clone(),
            docs,
            vocab,
            graph,
            model,
            params,
            optimizer,
            schedule,
            rng,
            phase: TrainPhase::NotStarted,
            last_loss: 0.0,
        })
    }

    pub const fn phase(&self) -> TrainPhase {
        self.phase
    }

    pub const fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// 打乱后的文档
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    pub const fn model(&self) -> &ModelState {
        &self.model
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    /// 发出 run.started 并逐步训练；只能调用一次
    pub fn run<S, C>(&mut self, sink: &mut S, cancel: &C) -> Result<TrainResult, TrainError>
    where
        S: EventSink + ?Sized,
        C: CancelSource + ?Sized,
    {
        if self.phase != TrainPhase::NotStarted {
            return Err(TrainError::AlreadyStarted);
        }
        self.phase = TrainPhase::Running;

        info!(
            vocab_size = self.vocab.size(),
            doc_count = self.docs.len(),
            num_params = self.params.len(),
            "训练开始"
        );
        emit(
            sink,
            StepEvent::RunStarted(RunStarted {
                vocab_size: self.vocab.size(),
                doc_count: self.docs.len(),
                num_params: self.params.len(),
                config: self.config.clone(),
            }),
        )?;

        for step in 1..=self.config.num_steps {
            if cancel.is_cancel_requested() {
                info!(step, "检测到取消请求，训练终止");
                emit(sink, StepEvent::RunCanceled(RunCanceled { step }))?;
                self.phase = TrainPhase::Canceled;
                return Ok(self.result(TrainStatus::Canceled, step - 1));
            }
            self.train_step(step, sink)?;
        }

        self.phase = TrainPhase::Completed;
        info!(
            steps = self.config.num_steps,
            final_loss = self.last_loss,
            "训练完成"
        );
        Ok(self.result(TrainStatus::Completed, self.config.num_steps))
    }

    fn result(&self, status: TrainStatus, steps_completed: usize) -> TrainResult {
        TrainResult {
            status,
            final_loss: self.last_loss,
            steps_completed,
            vocab_size: self.vocab.size(),
        }
    }

    /// 第 `step` 步（从 1 计）
    fn train_step<S: EventSink + ?Sized>(&mut self, step: usize, sink: &mut S) -> Result<(), TrainError> {
        let pass = self.forward_doc(step)?;
        self.last_loss = pass.loss_value;
        if !pass.loss_value.is_finite() {
            warn!(step, loss = pass.loss_value, "损失出现非有限值");
        }

        emit(
            sink,
            StepEvent::StepForward(StepForward {
                step,
                token_summaries: pass.token_summaries,
            }),
        )?;
        emit(
            sink,
            StepEvent::StepAttention(StepAttention {
                step,
                token_attention: pass.token_attention,
            }),
        )?;
        emit(
            sink,
            StepEvent::StepLoss(StepLoss {
                step,
                loss: round_to(pass.loss_value, 6),
            }),
        )?;

        // 反向：梯度范数与子图快照都必须在优化器清零梯度之前读取
        self.graph.backward(pass.loss)?;
        let gradient_norms = self.params.gradient_norms(&self.graph)?;
        let op_graph = match pass.selected_loss {
            Some(root) if (step - 1) % self.config.op_graph_step_interval == 0 => {
                Some(self.graph.snapshot(root, OP_GRAPH_MAX_NODES)?)
            }
            _ => None,
        };
        emit(
            sink,
            StepEvent::StepBackward(StepBackward {
                step,
                gradient_norms,
                op_graph,
            }),
        )?;

        // 更新
        let lr = self.schedule.lr_at(step - 1);
        self.optimizer.set_learning_rate(lr);
        let deltas = self.optimizer.step(&mut self.graph)?;
        self.graph.release_transients();
        debug!(step, loss = pass.loss_value, lr, "完成一步更新");
        emit(
            sink,
            StepEvent::StepUpdate(StepUpdate {
                step,
                learning_rate: round_to(lr, 8),
                update_norms: self.params.grouped_norms(&deltas),
            }),
        )?;

        if step % self.config.sample_interval == 0 || step == self.config.num_steps {
            let samples = sample_sequences(
                &mut self.graph,
                &self.model,
                &self.vocab,
                SamplingParams {
                    sample_count: self.config.sample_count,
                    temperature: self.config.temperature,
                    max_len: self.config.block_size,
                },
                &mut self.rng,
            )?;
            emit(
                sink,
                StepEvent::SampleGenerated(SampleGenerated { step, samples }),
            )?;
        }
        Ok(())
    }

    /// 对本步的文档逐位置前向，得到平均交叉熵损失
    fn forward_doc(&mut self, step: usize) -> Result<StepForwardPass, TrainError> {
        let doc = &self.docs[(step - 1) % self.docs.len()];
        let tokens = self.vocab.encode(doc);
        let n = self.config.block_size.min(tokens.len() - 1);

        let graph = &mut self.graph;
        let mut cache = KvCache::new(self.config.n_layer);
        let mut losses = Vec::with_capacity(n);
        let mut selected_loss = None;
        let mut token_summaries = Vec::with_capacity(n);
        let mut token_attention = Vec::with_capacity(n);

        for pos in 0..n {
            let (input, target) = (tokens[pos], tokens[pos + 1]);
            let out = self.model.forward(graph, input, pos, &mut cache)?;
            let probs = softmax(graph, &out.logits)?;
            let log_prob = graph.log(probs[target])?;
            let loss_t = graph.neg(log_prob)?;
            losses.push(loss_t);
            if pos == self.config.op_graph_token_index {
                selected_loss = Some(loss_t);
            }

            token_summaries.push(TokenSummary {
                position: pos,
                input_token: self.vocab.token_str(input),
                target_token: self.vocab.token_str(target),
                top_k: top_k_entries(&graph.values(&probs)?, &self.vocab, self.config.top_k),
            });
            token_attention.push(TokenAttention {
                position: pos,
                heads: out
                    .attention
                    .into_iter()
                    .map(|head| head.into_iter().map(|w| round_to(w, 6)).collect())
                    .collect(),
            });
        }

        let total = graph.sum(&losses)?;
        let loss = graph.mul_scalar(total, 1.0 / n as f64)?;
        Ok(StepForwardPass {
            loss,
            loss_value: graph.value(loss)?,
            selected_loss,
            token_summaries,
            token_attention,
        })
    }
}

fn emit<S: EventSink + ?Sized>(sink: &mut S, event: StepEvent) -> Result<(), TrainError> {
    sink.emit(event).map_err(TrainError::EventSink)
}
