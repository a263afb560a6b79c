//! 语料相关错误类型定义

use thiserror::Error;

/// 语料解析、内置语料包与上传校验相关错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// 未知的语料包
    #[error("未知的语料包: {0}")]
    UnknownPack(String),

    /// 上传文本不存在
    #[error("上传的语料不存在")]
    UploadNotFound,

    /// 语料中没有非空文档
    #[error("语料中没有非空文档")]
    NoDocuments,

    /// 语料字符数超限
    #[error("语料字符数超限: {len} > {max}")]
    CorpusTooLarge { len: usize, max: usize },

    /// 语料包生成的文档数不足
    #[error("语料包 {pack}: 至少需要 {expected} 行，实际 {got} 行")]
    PackTooSmall {
        pack: &'static str,
        expected: usize,
        got: usize,
    },

    /// 上传文件扩展名不被允许
    #[error("只允许上传 {allowed} 文件")]
    UnsupportedExtension { allowed: String },

    /// 上传文件过大
    #[error("文件超过 {max} 字节")]
    FileTooLarge { max: usize },

    /// 上传文件不是 UTF-8 文本
    #[error("文件必须是 UTF-8 文本")]
    NotUtf8,

    /// 上传文件为空
    #[error("文件为空")]
    EmptyFile,

    /// 上传文件字符种类过多
    #[error("字符种类过多: {got} > {max}")]
    TooManyUniqueChars { got: usize, max: usize },

    /// 上传内容命中黑名单
    #[error("检测到被禁止的内容: {0}")]
    BlockedContent(&'static str),
}
