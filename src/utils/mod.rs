//! # 常用接口模块
//!
//! 本模块提供事件载荷共用的数值小工具，以及单元测试用的断言宏

#[cfg(test)]
mod tests;

pub mod nullable_float;

/// 按十进制小数位四舍五入（事件载荷统一使用，NaN/Inf 原样返回）
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// L2 范数：sqrt(Σ v²)
pub fn l2_norm(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().map(|v| v * v).sum::<f64>().sqrt()
}
