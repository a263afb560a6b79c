use std::fmt::{self, Display};

/// 比较运算符（用于描述配置项的取值约束）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
}
impl ComparisonOperator {
    /// `actual <op> threshold` 是否成立（NaN 一律视为不成立）
    pub fn holds(&self, actual: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterOrEqual => actual >= threshold,
            ComparisonOperator::LessOrEqual => actual <= threshold,
            ComparisonOperator::GreaterThan => actual > threshold,
            ComparisonOperator::LessThan => actual < threshold,
        }
    }
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::LessOrEqual => "≤",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
        };
        write!(f, "{}", operator_name)
    }
}
