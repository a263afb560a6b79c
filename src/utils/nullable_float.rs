//! 非有限浮点数的反序列化
//!
//! `serde_json` 把 NaN/±Inf 写成 `null`。事件载荷里的浮点字段用这里的函数读回，
//! `null` 还原为 NaN（±Inf 的符号在 JSON 中已丢失），使事件行总能解析回来。

use serde::{Deserialize, Deserializer};

/// `f64` 字段：`null` → NaN
pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// `Vec<Vec<f64>>` 字段：逐元素 `null` → NaN
pub fn deserialize_nested<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect())
}
