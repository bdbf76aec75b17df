//! 连接配置加载
//!
//! 连接信息来自 Java 风格的 properties 文件（`key=value`，`#` 注释），
//! 以 INI 格式叠加在内嵌的默认值之上，最后再叠加 `KSQL_RUNNER__` 前缀的环境变量。
//!
//! ```text
//! ksqldb.endpoint=pksqlc-xxxxx.us-east-1.aws.confluent.cloud
//! api.key=ABCDEFG
//! api.secret=...
//! ```

use crate::error::RunnerError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use log::debug;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/ksql-runner.default.toml");

/// 环境变量前缀，例如 `KSQL_RUNNER__KSQLDB__ENDPOINT`
const ENV_PREFIX: &str = "KSQL_RUNNER";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize)]
struct RawConfig {
    ksqldb: RawEngine,
    #[serde(default)]
    api: Option<RawApi>,
}

#[derive(Debug, Deserialize)]
struct RawEngine {
    endpoint: String,
    port: u16,
    tls: bool,
    timeout: RawTimeout,
}

#[derive(Debug, Deserialize)]
struct RawTimeout {
    secs: u64,
}

#[derive(Deserialize)]
struct RawApi {
    key: String,
    #[serde(default)]
    secret: Option<String>,
}

impl fmt::Debug for RawApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawApi")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// HTTP basic auth 凭据
///
/// 只配置 `api.key` 时 `secret` 为 `None`，请求中只携带用户名。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// 远程引擎的连接配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// 主机名或完整 URL
    pub endpoint: String,
    pub port: u16,
    /// 端点未带协议时是否使用 https
    pub use_tls: bool,
    pub timeout: Duration,
    pub credentials: Option<Credentials>,
}

impl ConnectionConfig {
    /// 引擎 REST API 的基础 URL（不含结尾的 `/`）
    ///
    /// 端点已经带有协议（`http://`、`https://`）时原样使用，否则由 `use_tls` 和 `port` 拼出。
    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            let scheme = if self.use_tls { "https" } else { "http" };
            format!("{}://{}:{}", scheme, endpoint, self.port)
        }
    }

    fn from_raw(raw: RawConfig) -> Result<Self, RunnerError> {
        let endpoint = raw.ksqldb.endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(RunnerError::InvalidConfig(
                "ksqldb.endpoint must not be empty".to_string(),
            ));
        }
        if raw.ksqldb.timeout.secs == 0 {
            return Err(RunnerError::InvalidConfig(
                "ksqldb.timeout.secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            port: raw.ksqldb.port,
            use_tls: raw.ksqldb.tls,
            timeout: Duration::from_secs(raw.ksqldb.timeout.secs),
            credentials: raw.api.map(|api| Credentials {
                key: api.key,
                secret: api.secret,
            }),
        })
    }
}

/// 在内嵌默认值之上叠加用户配置的加载器
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// 以内嵌默认值为起点创建加载器
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// 叠加一个 properties 文件，文件不存在时报错
    pub fn with_properties_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Ini)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// 叠加一段 properties 格式的文本
    pub fn with_properties_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Ini));
        self
    }

    /// 叠加 `KSQL_RUNNER__` 前缀的环境变量
    pub fn with_environment(mut self) -> Self {
        self.builder = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR));
        self
    }

    /// 覆盖单个配置项，优先级高于文件和环境变量（命令行的 `--endpoint` 使用它）
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, RunnerError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// 构建并校验最终配置
    pub fn build(self) -> Result<ConnectionConfig, RunnerError> {
        let raw: RawConfig = self.builder.build()?.try_deserialize()?;
        debug!("raw connection config: {:?}", raw);
        ConnectionConfig::from_raw(raw)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 properties 文件加载连接配置（同时应用环境变量覆盖）
pub fn load_connection_config(path: impl AsRef<Path>) -> Result<ConnectionConfig, RunnerError> {
    Loader::new()
        .with_properties_file(path)
        .with_environment()
        .build()
}
