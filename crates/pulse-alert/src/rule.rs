/// 阈值告警规则
///
/// 比较是严格的：等于阈值不触发。
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    name: String,
    threshold: f64,
}

impl ThresholdRule {
    /// CPU 使用率超过阈值
    pub fn cpu_above(threshold: f64) -> Self {
        Self {
            name: "high_cpu".to_string(),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(&self, value: f64) -> bool {
        value > self.threshold
    }

    pub fn message(&self, value: f64) -> String {
        format!(
            "{}: value={:.2}, threshold={:.2}",
            self.name, value, self.threshold
        )
    }
}
