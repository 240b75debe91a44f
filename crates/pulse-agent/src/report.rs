//! 通知正文与标题格式化
//!
//! 全部为纯函数，输入快照，输出文本。

use chrono::SecondsFormat;
use pulse_types::MetricsSnapshot;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const ORANGE: &str = "\x1b[38;5;208m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// 输出样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    /// 是否输出 ANSI 颜色
    pub color: bool,
}

impl ReportStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "n/a".to_string(),
    }
}

/// CPU 使用率按区间着色：≤40 绿，≤60 黄，≤80 橙，其余红
pub fn cpu_color(value: f64, style: &ReportStyle) -> String {
    let code = if value <= 40.0 {
        GREEN
    } else if value <= 60.0 {
        YELLOW
    } else if value <= 80.0 {
        ORANGE
    } else {
        RED
    };
    style.paint(code, &format!("{value:.1}%"))
}

fn cpu_text(value: Option<f64>, style: &ReportStyle) -> String {
    match value {
        Some(v) => cpu_color(v, style),
        None => "n/a".to_string(),
    }
}

/// 字节数转为二进制单位
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn time_text(snapshot: &MetricsSnapshot) -> String {
    snapshot.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn json_text(snapshot: &MetricsSnapshot) -> String {
    snapshot
        .to_json_pretty()
        .unwrap_or_else(|e| format!("<metrics unavailable: {e}>"))
}

pub fn summary_subject(snapshot: &MetricsSnapshot) -> String {
    format!("[Summary] CPU: {}", percent(snapshot.cpu_percent))
}

pub fn alert_subject(cpu: f64) -> String {
    format!("[ALERT] HIGH CPU {cpu:.1}%")
}

/// 汇总正文
pub fn format_summary(snapshot: &MetricsSnapshot, style: &ReportStyle) -> String {
    let mut body = String::new();

    body.push_str(&style.paint(BLUE, "📊 Server Health Summary"));
    body.push_str("\n\n");
    body.push_str(&format!("🖥️ Server: {}\n", snapshot.hostname));
    body.push_str(&format!("⏱️ Time (UTC): {}\n\n", time_text(snapshot)));

    body.push_str(&format!(
        "⚙️ CPU Usage: {}\n",
        cpu_text(snapshot.cpu_percent, style)
    ));
    body.push_str(&format!("💾 Memory Usage: {}\n", percent(snapshot.memory_percent)));
    body.push_str(&format!("📦 Disk Usage: {}\n", percent(snapshot.disk_percent)));
    body.push_str(&format!("🔁 Swap Usage: {}\n", percent(snapshot.swap_percent)));

    match &snapshot.load_average {
        Some(load) => body.push_str(&format!(
            "📈 Load Average: {:.2} / {:.2} / {:.2}\n",
            load.one, load.five, load.fifteen
        )),
        None => body.push_str("📈 Load Average: n/a\n"),
    }

    match &snapshot.network {
        Some(net) => body.push_str(&format!(
            "🌐 Network: {} received / {} sent\n",
            human_bytes(net.bytes_received),
            human_bytes(net.bytes_transmitted)
        )),
        None => body.push_str("🌐 Network: n/a\n"),
    }

    body.push_str("\nJSON Metrics:\n");
    body.push_str(&json_text(snapshot));
    body.push('\n');

    body
}

/// 告警正文
pub fn format_alert(snapshot: &MetricsSnapshot, threshold: f64, style: &ReportStyle) -> String {
    let mut body = String::new();

    body.push_str(&style.paint(RED, "🚨 HIGH CPU ALERT TRIGGERED!"));
    body.push_str("\n\n");
    body.push_str(&format!("🖥️ Server: {}\n", snapshot.hostname));
    body.push_str(&format!("⏱️ Time (UTC): {}\n\n", time_text(snapshot)));

    body.push_str(&format!(
        "⚠️ CPU Usage: {}  (Threshold: {}%)\n",
        cpu_text(snapshot.cpu_percent, style),
        threshold
    ));
    body.push_str(&format!("💾 Memory: {}\n", percent(snapshot.memory_percent)));
    body.push_str(&format!("📦 Disk: {}\n", percent(snapshot.disk_percent)));

    body.push_str("\nJSON Metrics:\n");
    body.push_str(&json_text(snapshot));
    body.push('\n');

    body
}
