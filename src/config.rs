use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::JobParams;
use crate::services::RetryPolicy;

/// 指向 TOML 配置文件的环境变量
pub const CONFIG_PATH_ENV: &str = "REPORT_CONFIG";

/// 程序配置
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    /// 可互换的 API 密钥，每个密钥对应客户端池中的一个客户端
    pub llm_api_keys: Vec<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 批处理配置 ---
    /// 单个分块的最大记录数，记录总数不超过该值时走单次模式
    pub chunk_size: usize,
    /// 单次调用最多尝试次数
    pub max_attempts: u32,
    /// 第一次重试前的等待时间（毫秒）
    pub retry_base_delay_ms: u64,
    // --- 输入输出 ---
    /// 记录文件（.csv / .json）
    pub input_file: String,
    /// 报告输出文件
    pub output_file: String,
    /// 着目关键词
    pub focus_keywords: String,
    /// 排除条件
    pub exclude_keywords: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_keys: Vec::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-flash-lite-latest".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 8192,
            chunk_size: 60,
            max_attempts: 3,
            retry_base_delay_ms: 5000,
            input_file: "records.csv".to_string(),
            output_file: "report.html".to_string(),
            focus_keywords: String::new(),
            exclude_keywords: String::new(),
            verbose_logging: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("llm_api_keys", &format!("[{} keys]", self.llm_api_keys.len()))
            .field("llm_api_base_url", &self.llm_api_base_url)
            .field("llm_model_name", &self.llm_model_name)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("chunk_size", &self.chunk_size)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("input_file", &self.input_file)
            .field("output_file", &self.output_file)
            .field("focus_keywords", &self.focus_keywords)
            .field("exclude_keywords", &self.exclude_keywords)
            .field("verbose_logging", &self.verbose_logging)
            .finish()
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// 读取 TOML 配置文件，缺省项使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
            field: CONFIG_PATH_ENV.to_string(),
            reason: format!("无法读取 {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, source: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseFailed {
            path: source.to_string(),
            source: e,
        })
    }

    /// 若设置了 `REPORT_CONFIG` 则先读文件，再用环境变量覆盖，最后校验
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// 用查找函数覆盖各项配置，便于测试时替换环境变量来源
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = self;
        let env_keys = collect_api_keys(&lookup);

        Self {
            llm_api_keys: if env_keys.is_empty() {
                default.llm_api_keys
            } else {
                env_keys
            },
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: parse_var(&lookup, "LLM_TEMPERATURE").unwrap_or(default.llm_temperature),
            llm_max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS").unwrap_or(default.llm_max_tokens),
            chunk_size: parse_var(&lookup, "CHUNK_SIZE").unwrap_or(default.chunk_size),
            max_attempts: parse_var(&lookup, "MAX_ATTEMPTS").unwrap_or(default.max_attempts),
            retry_base_delay_ms: parse_var(&lookup, "RETRY_BASE_DELAY_MS").unwrap_or(default.retry_base_delay_ms),
            input_file: lookup("INPUT_FILE").unwrap_or(default.input_file),
            output_file: lookup("OUTPUT_FILE").unwrap_or(default.output_file),
            focus_keywords: lookup("FOCUS_KEYWORDS").unwrap_or(default.focus_keywords),
            exclude_keywords: lookup("EXCLUDE_KEYWORDS").unwrap_or(default.exclude_keywords),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_keys.is_empty() {
            return Err(ConfigError::NoApiKeys);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }

    pub fn job_params(&self) -> JobParams {
        JobParams::new(&self.focus_keywords, &self.exclude_keywords)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

/// 依次查找候选环境变量中的 API 密钥
///
/// 去掉首尾空白、空值与占位符，按首次出现顺序去重
pub fn collect_api_keys(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(list) = lookup("LLM_API_KEYS") {
        candidates.extend(list.split(',').map(str::to_string));
    }

    let mut names: Vec<String> = ["LLM_API_KEY", "API_KEY", "GOOGLE_API_KEY", "GEMINI_API_KEY"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for i in 1..=10 {
        names.push(format!("API_KEY_{}", i));
        names.push(format!("GOOGLE_API_KEY_{}", i));
    }
    candidates.extend(names.iter().filter_map(|name| lookup(name)));

    let mut keys: Vec<String> = Vec::new();
    for candidate in candidates {
        let key = candidate.trim();
        if key.is_empty() || is_placeholder(key) || keys.iter().any(|k| k == key) {
            continue;
        }
        keys.push(key.to_string());
    }
    keys
}

fn is_placeholder(key: &str) -> bool {
    let lowered = key.to_lowercase();
    lowered.contains("your_api_key") || lowered.contains("your-api-key") || key.contains("ここに")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn collects_and_dedups_keys_in_order() {
        let lookup = lookup_from(&[
            ("LLM_API_KEYS", "k1, k2 ,,"),
            ("API_KEY", " k2 "),
            ("GOOGLE_API_KEY_3", "k3"),
            ("API_KEY_1", "ここにキーを入力"),
            ("API_KEY_2", "YOUR_API_KEY"),
        ]);
        assert_eq!(collect_api_keys(lookup), vec!["k1", "k2", "k3"]);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::default().with_overrides(lookup_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("CHUNK_SIZE", "25"),
            ("MAX_ATTEMPTS", "not-a-number"),
            ("FOCUS_KEYWORDS", "电池"),
        ]));
        assert_eq!(config.llm_api_keys, vec!["abc"]);
        assert_eq!(config.chunk_size, 25);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.job_params().focus, "电池");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_values_survive_without_env() {
        let base = Config::from_toml_str(
            r#"
            llm_api_keys = ["file-key"]
            chunk_size = 10
            retry_base_delay_ms = 250
            "#,
            "test.toml",
        )
        .unwrap();
        let config = base.with_overrides(|_| None);

        assert_eq!(config.llm_api_keys, vec!["file-key"]);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.llm_model_name, Config::default().llm_model_name);
        assert_eq!(config.retry_policy().base_delay, Duration::from_millis(250));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = Config::from_toml_str("chunk_size = \"many\"", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseFailed { .. }));
    }

    #[test]
    fn validation_rejects_unusable_values() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::NoApiKeys)
        ));

        let zero_chunk = Config {
            llm_api_keys: vec!["k".into()],
            chunk_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            zero_chunk.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn debug_output_hides_keys() {
        let config = Config {
            llm_api_keys: vec!["secret".into()],
            ..Config::default()
        };
        let text = format!("{:?}", config);
        assert!(!text.contains("secret"));
        assert!(text.contains("[1 keys]"));
    }
}
