/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 模块的错误类型
 */

use super::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// 节点不存在（或属于已释放的临时段）
    #[error("节点 {0} 不存在")]
    NodeNotFound(NodeId),
    #[error("非法操作：{0}")]
    InvalidOperation(String),
}
