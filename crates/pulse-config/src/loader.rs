use config::{Config, Environment, File, FileFormat, Map};
use std::path::{Path, PathBuf};

use crate::agent::{AgentConfig, RawConfig};
use crate::error::ConfigError;

/// 环境变量前缀，如 `HOSTPULSE_SUMMARY_CHANNEL`
pub const ENV_PREFIX: &str = "HOSTPULSE";

/// 配置加载器
///
/// 优先级：环境变量 > 配置文件 > 默认值。
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定 TOML 配置文件，文件必须存在
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// 用给定的变量表替代进程环境
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// 加载并校验
    pub fn load(&self) -> Result<AgentConfig, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            let path = path
                .to_str()
                .ok_or_else(|| ConfigError::invalid("config", "path is not valid UTF-8"))?;
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(self.env.clone()));

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        AgentConfig::try_from(raw)
    }
}
