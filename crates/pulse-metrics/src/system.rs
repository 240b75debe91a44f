use async_trait::async_trait;
use chrono::Utc;
use pulse_types::{round1, LoadAverage, MetricsSnapshot, NetworkCounters};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, Networks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::error::CollectError;
use crate::source::MetricsSource;

/// 采集参数
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// CPU 采样窗口
    pub sample_interval: Duration,
    /// 统计磁盘使用率的路径
    pub disk_path: PathBuf,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(1000),
            disk_path: PathBuf::from("/"),
        }
    }
}

/// 系统指标收集器
pub struct SystemCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    options: CollectorOptions,
}

impl SystemCollector {
    pub fn new(options: CollectorOptions) -> Self {
        Self {
            system: System::new(),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            options,
        }
    }

    /// 两次刷新之间等待采样窗口，返回全局与每核使用率
    async fn sample_cpu(&mut self) -> (Option<f64>, Option<Vec<f64>>) {
        self.system.refresh_cpu();
        sleep(self.options.sample_interval.max(MINIMUM_CPU_UPDATE_INTERVAL)).await;
        self.system.refresh_cpu();

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            warn!("No CPUs reported by the host, CPU usage unavailable");
            return (None, None);
        }

        let global = round1(self.system.global_cpu_info().cpu_usage() as f64);
        let per_core = cpus
            .iter()
            .map(|cpu| round1(cpu.cpu_usage() as f64))
            .collect();

        (Some(global), Some(per_core))
    }

    fn sample_memory(&mut self) -> (Option<f64>, Option<f64>) {
        self.system.refresh_memory();

        let memory = usage_percent(self.system.used_memory(), self.system.total_memory());
        let swap = usage_percent(self.system.used_swap(), self.system.total_swap());

        (memory, swap)
    }

    fn sample_disk(&mut self) -> Option<f64> {
        self.disks.refresh_list();

        let mounts: Vec<(PathBuf, u64, u64)> = self
            .disks
            .list()
            .iter()
            .map(|disk| {
                (
                    disk.mount_point().to_path_buf(),
                    disk.total_space(),
                    disk.available_space(),
                )
            })
            .collect();

        let usage = select_disk_usage(&mounts, &self.options.disk_path);
        if usage.is_none() {
            warn!(
                path = %self.options.disk_path.display(),
                "No mounted disk found for path, disk usage unavailable"
            );
        }
        usage
    }

    fn sample_network(&mut self) -> Option<NetworkCounters> {
        self.networks.refresh_list();

        let interfaces = self.networks.list();
        if interfaces.is_empty() {
            return None;
        }

        Some(interfaces.values().fold(
            NetworkCounters {
                bytes_received: 0,
                bytes_transmitted: 0,
            },
            |acc, data| NetworkCounters {
                bytes_received: acc.bytes_received + data.total_received(),
                bytes_transmitted: acc.bytes_transmitted + data.total_transmitted(),
            },
        ))
    }

    #[cfg(unix)]
    fn sample_load(&self) -> Option<LoadAverage> {
        let load = System::load_average();
        Some(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    #[cfg(not(unix))]
    fn sample_load(&self) -> Option<LoadAverage> {
        None
    }
}

#[async_trait]
impl MetricsSource for SystemCollector {
    async fn snapshot(&mut self) -> Result<MetricsSnapshot, CollectError> {
        let hostname = host_identity(hostname::get()?);

        let (cpu_percent, cpu_per_core) = self.sample_cpu().await;
        let (memory_percent, swap_percent) = self.sample_memory();
        let disk_percent = self.sample_disk();
        let network = self.sample_network();
        let load_average = self.sample_load();

        let snapshot = MetricsSnapshot {
            timestamp: Utc::now(),
            hostname,
            cpu_percent,
            cpu_per_core,
            memory_percent,
            swap_percent,
            disk_percent,
            load_average,
            network,
        };

        debug!(
            cpu = ?snapshot.cpu_percent,
            memory = ?snapshot.memory_percent,
            disk = ?snapshot.disk_percent,
            "System metrics collected"
        );

        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "system"
    }
}

/// 使用率百分比，总量为 0 时不可用
pub fn usage_percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round1(used as f64 / total as f64 * 100.0))
}

/// 按最长挂载点前缀选择包含 `path` 的磁盘，返回其使用率
///
/// `mounts` 的元素为 `(挂载点, 总空间, 可用空间)`。
pub fn select_disk_usage(mounts: &[(PathBuf, u64, u64)], path: &Path) -> Option<f64> {
    mounts
        .iter()
        .filter(|(mount_point, _, _)| path.starts_with(mount_point))
        .max_by_key(|(mount_point, _, _)| mount_point.components().count())
        .and_then(|(_, total, available)| {
            usage_percent(total.saturating_sub(*available), *total)
        })
}

/// 主机名转为字符串，非 UTF-8 字节以替换字符保留
fn host_identity(raw: OsString) -> String {
    match raw.into_string() {
        Ok(name) => name,
        Err(raw) => {
            let name = raw.to_string_lossy().into_owned();
            warn!(hostname = %name, "Hostname is not valid UTF-8, using lossy conversion");
            name
        }
    }
}
