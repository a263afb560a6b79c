/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 注入训练循环的两个边界：事件输出端与取消信号
 */

use super::events::StepEvent;
use crate::errors::SinkError;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 事件输出端
///
/// 返回的错误会中止训练并原样传给调用方。
pub trait EventSink {
    fn emit(&mut self, event: StepEvent) -> Result<(), SinkError>;
}

/// 内存记录（测试与回放用）
impl EventSink for Vec<StepEvent> {
    fn emit(&mut self, event: StepEvent) -> Result<(), SinkError> {
        self.push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: StepEvent) -> Result<(), SinkError> {
        (**self).emit(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: StepEvent) -> Result<(), SinkError> {
        (**self).emit(event)
    }
}

/// 每行一个 `{"seq": n, "type": ..., "payload": {...}}`，seq 从 1 开始
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    seq: u64,
}

#[derive(Serialize)]
struct Envelope<'a> {
    seq: u64,
    #[serde(flatten)]
    event: &'a StepEvent,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer, seq: 0 }
    }

    /// 已写出的事件数
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: StepEvent) -> Result<(), SinkError> {
        let envelope = Envelope {
            seq: self.seq + 1,
            event: &event,
        };
        serde_json::to_writer(&mut self.writer, &envelope)?;
        self.writer.write_all(b"\n")?;
        self.seq += 1;
        Ok(())
    }
}

/// 取消信号，仅在每一步开始前轮询
pub trait CancelSource {
    fn is_cancel_requested(&self) -> bool;
}

/// 从不取消
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSource for NeverCancel {
    fn is_cancel_requested(&self) -> bool {
        false
    }
}

/// 可跨线程设置的取消标志（克隆后共享同一个标志）
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl CancelSource for CancelFlag {
    fn is_cancel_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 任意 `Fn() -> bool` 闭包都可作为取消信号
impl<F: Fn() -> bool> CancelSource for F {
    fn is_cancel_requested(&self) -> bool {
        self()
    }
}
