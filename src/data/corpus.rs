/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 语料解析：把内置语料包 id 或上传文本解析为文档列表
 */

use super::error::DataError;
use super::packs::{BUILTIN_PACK_IDS, builtin_pack_docs};
use crate::train::config::RUN_LIMITS;

/// 上传语料的 pack id 前缀（`upload:<upload_id>`）
pub const UPLOAD_PREFIX: &str = "upload:";

/// 行分隔符：除 `\n` 外还包括单独的 `\r`、垂直制表/换页、文件/组/记录分隔符以及 Unicode 行/段分隔符
pub const LINE_SEPARATORS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// 按行切分：去掉首尾空白，丢弃空行
///
/// `\r\n` 之间切出的空片段会被空行过滤掉。以 `\n` 重新拼接后的字符数不得超过 `corpus_max_chars`。
pub fn docs_from_text(text: &str) -> Result<Vec<String>, DataError> {
    let docs: Vec<String> = text
        .split(LINE_SEPARATORS)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if docs.is_empty() {
        return Err(DataError::NoDocuments);
    }
    check_corpus_len(&docs)?;
    Ok(docs)
}

/// 解析训练用文档
///
/// - 内置语料包 id：返回生成的文档
/// - `upload:<id>`：需同时提供上传文本，否则报 [`DataError::UploadNotFound`]
/// - 其余 id：[`DataError::UnknownPack`]
pub fn resolve_docs(pack_id: &str, upload_text: Option<&str>) -> Result<Vec<String>, DataError> {
    if BUILTIN_PACK_IDS.contains(&pack_id) {
        let docs = builtin_pack_docs(pack_id)?;
        check_corpus_len(&docs)?;
        return Ok(docs);
    }
    if pack_id.starts_with(UPLOAD_PREFIX) {
        let text = upload_text.ok_or(DataError::UploadNotFound)?;
        return docs_from_text(text);
    }
    Err(DataError::UnknownPack(pack_id.to_string()))
}

fn check_corpus_len(docs: &[String]) -> Result<(), DataError> {
    // 行与行之间各计一个换行符
    let len = docs.iter().map(|d| d.chars().count()).sum::<usize>() + docs.len().saturating_sub(1);
    let max = RUN_LIMITS.corpus_max_chars;
    if len > max {
        return Err(DataError::CorpusTooLarge { len, max });
    }
    Ok(())
}
