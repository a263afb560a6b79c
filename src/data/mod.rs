//! 语料模块
//!
//! 为训练引擎提供文档列表与字符级词表。
//!
//! # 主要组件
//!
//! - [`Vocabulary`]: 排序后的去重字符 + 一个 `BOS` 哨兵 id
//! - [`packs`]: 6 个内置语料包（确定性生成，每包 60 条文档）
//! - [`resolve_docs`]: 按语料包 id 或 `upload:<id>` 解析文档
//! - [`validate_upload`]: 上传文本的校验
//! - [`DataError`]: 语料相关错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use micro_gpt_lab::data::{resolve_docs, Vocabulary};
//!
//! let docs = resolve_docs("arithmetic", None)?;
//! let vocab = Vocabulary::from_docs(&docs);
//! let tokens = vocab.encode(&docs[0]); // [BOS, ..., BOS]
//! ```

mod corpus;
pub mod error;
pub mod packs;
mod upload;
mod vocab;

#[cfg(test)]
mod tests;

// Re-exports
pub use corpus::{UPLOAD_PREFIX, docs_from_text, resolve_docs};
pub use error::DataError;
pub use packs::{BUILTIN_PACK_IDS, PackDescriptor, builtin_pack_docs, pack_descriptors};
pub use upload::{BLOCKED_CONTENT, UPLOAD_ALLOWED_EXTENSIONS, validate_upload};
pub use vocab::{BOS_TOKEN, Vocabulary};
