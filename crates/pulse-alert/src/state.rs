use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StateError;

/// 上次告警时间的持久化接口
///
/// 时间以 Unix 秒（浮点）表示。`load` 在从未告警时返回 `Ok(None)`。
pub trait AlertStateStore: Send + Sync {
    fn load(&self) -> Result<Option<f64>, StateError>;

    fn store(&self, timestamp: f64) -> Result<(), StateError>;

    fn describe(&self) -> String;
}

impl<S: AlertStateStore + ?Sized> AlertStateStore for Box<S> {
    fn load(&self) -> Result<Option<f64>, StateError> {
        (**self).load()
    }

    fn store(&self, timestamp: f64) -> Result<(), StateError> {
        (**self).store(timestamp)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// 单值文本文件存储
///
/// 写入先落到同目录的临时文件再重命名覆盖，读者不会看到写了一半的值。
/// 不加锁：同一主机只允许一个运行实例。
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("state"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl AlertStateStore for FileStateStore {
    fn load(&self) -> Result<Option<f64>, StateError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        match content.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(StateError::Corrupt {
                path: self.path.clone(),
                content,
            }),
        }
    }

    fn store(&self, timestamp: f64) -> Result<(), StateError> {
        let temp = self.temp_path();
        fs::write(&temp, timestamp.to_string()).map_err(|e| self.io_error(e))?;

        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(e));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内存存储，写入只在进程内可见
///
/// 演练时以真实状态为初值，判定结果与正式运行一致，但不改动状态文件。
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    value: Mutex<Option<f64>>,
}

impl MemoryStateStore {
    pub fn new(initial: Option<f64>) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }
}

impl AlertStateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<f64>, StateError> {
        Ok(*self.value.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn store(&self, timestamp: f64) -> Result<(), StateError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(timestamp);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// 转换为 Unix 秒（微秒精度）
pub fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}
