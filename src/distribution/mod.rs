use rand::Rng;


/// 参数初始化用的高斯分布（Box-Muller）
///
/// 每个样本恰好消耗两次 `rng` 抽样，调用方据此保证同一种子下的抽样顺序可复现。
#[derive(Debug, Clone, Copy)]
pub struct Gaussian {
    mean: f64,
    std_dev: f64,
}

impl Gaussian {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // gen() 落在 [0, 1)，翻转为 (0, 1] 以避开 ln(0)
        let u1: f64 = 1.0 - rng.r#gen::<f64>();
        let u2: f64 = rng.r#gen::<f64>();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        self.mean + self.std_dev * z0
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}
