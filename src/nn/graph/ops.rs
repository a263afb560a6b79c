/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 基本运算
 *
 * 基本运算记录输入及局部偏导：
 * - add:  ∂(a+b)/∂a = 1,        ∂(a+b)/∂b = 1
 * - mul:  ∂(a·b)/∂a = b,        ∂(a·b)/∂b = a
 * - pow:  ∂(aᵖ)/∂a = p·aᵖ⁻¹
 * - log:  ∂ln(a)/∂a = 1/a
 * - exp:  ∂eᵃ/∂a = eᵃ
 * - relu: ∂relu(a)/∂a = [a > 0]
 *
 * 派生运算（neg/sub/div/标量运算）完全由基本运算组合而成，浮点字面量以常量叶子节点进入图。
 * 数值退化（ln 非正数、除以零等）不做保护，NaN/Inf 会沿计算继续传播。
 */

use super::{Graph, GraphError, NodeId};

impl Graph {
    // ========== 基本运算 ==========

    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let (va, vb) = (self.value(a)?, self.value(b)?);
        Ok(self.push(va + vb, &[(a, 1.0), (b, 1.0)]))
    }

    pub fn mul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let (va, vb) = (self.value(a)?, self.value(b)?);
        Ok(self.push(va * vb, &[(a, vb), (b, va)]))
    }

    /// 实数次幂（整数次幂同样走这里）
    pub fn pow(&mut self, a: NodeId, exponent: f64) -> Result<NodeId, GraphError> {
        let va = self.value(a)?;
        let local = exponent * va.powf(exponent - 1.0);
        Ok(self.push(va.powf(exponent), &[(a, local)]))
    }

    /// 自然对数
    pub fn log(&mut self, a: NodeId) -> Result<NodeId, GraphError> {
        let va = self.value(a)?;
        Ok(self.push(va.ln(), &[(a, 1.0 / va)]))
    }

    pub fn exp(&mut self, a: NodeId) -> Result<NodeId, GraphError> {
        let out = self.value(a)?.exp();
        Ok(self.push(out, &[(a, out)]))
    }

    pub fn relu(&mut self, a: NodeId) -> Result<NodeId, GraphError> {
        let va = self.value(a)?;
        let local = if va > 0.0 { 1.0 } else { 0.0 };
        Ok(self.push(va.max(0.0), &[(a, local)]))
    }

    // ========== 派生运算 ==========

    /// -a = a · (-1)
    pub fn neg(&mut self, a: NodeId) -> Result<NodeId, GraphError> {
        self.mul_scalar(a, -1.0)
    }

    /// a - b = a + (-b)
    pub fn sub(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let neg_b = self.neg(b)?;
        self.add(a, neg_b)
    }

    /// a / b = a · b⁻¹
    pub fn div(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let inv_b = self.pow(b, -1.0)?;
        self.mul(a, inv_b)
    }

    pub fn add_scalar(&mut self, a: NodeId, c: f64) -> Result<NodeId, GraphError> {
        let c = self.constant(c);
        self.add(a, c)
    }

    pub fn mul_scalar(&mut self, a: NodeId, c: f64) -> Result<NodeId, GraphError> {
        let c = self.constant(c);
        self.mul(a, c)
    }

    /// 逐项左折叠求和；空列表得到常量 0
    pub fn sum(&mut self, terms: &[NodeId]) -> Result<NodeId, GraphError> {
        let Some((&first, rest)) = terms.split_first() else {
            return Ok(self.constant(0.0));
        };
        rest.iter().try_fold(first, |acc, &term| self.add(acc, term))
    }

    /// 点积 Σ aᵢ·bᵢ（两者长度必须一致）
    pub fn dot(&mut self, a: &[NodeId], b: &[NodeId]) -> Result<NodeId, GraphError> {
        if a.len() != b.len() {
            return Err(GraphError::InvalidOperation(format!(
                "点积两侧长度不一致：{} vs {}",
                a.len(),
                b.len()
            )));
        }
        let products = a
            .iter()
            .zip(b)
            .map(|(&x, &y)| self.mul(x, y))
            .collect::<Result<Vec<_>, _>>()?;
        self.sum(&products)
    }
}
