// src/config.rs

use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

// 上游接口的基地址单独成段，测试时可整体指向 mock 服务器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub qq_api_base: String,
    pub netease_api_base: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            qq_api_base: constants::qq::API_BASE.into(),
            netease_api_base: constants::netease::API_BASE.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值；重试默认关闭，单次上游失败即为最终结果
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(30),
            max_retries: Some(0),
        };

        Self {
            notes_dir: None,
            cache_file: None,
            network: network_config,
            endpoints: EndpointConfig::default(),
        }
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

fn default_cache_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CACHE_FILE_NAME);
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub notes_dir: PathBuf,
    pub cache_file: PathBuf,
    pub cache_capacity: usize,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub qq_api_base: String,
    pub netease_api_base: String,
}

impl AppConfig {
    /// 命令行参数优先于配置文件，二者都缺省时使用内置默认值
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;

        let notes_dir = args
            .notes_dir
            .clone()
            .or(external_config.notes_dir)
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_NOTES_DIR));
        let cache_file = match args.cache_file.clone().or(external_config.cache_file) {
            Some(path) => path,
            None => default_cache_path()?,
        };

        Ok(Self {
            notes_dir,
            cache_file,
            cache_capacity: constants::CACHE_CAPACITY,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(30)),
            max_retries: external_config.network.max_retries.unwrap_or(0),
            qq_api_base: external_config.endpoints.qq_api_base,
            netease_api_base: external_config.endpoints.netease_api_base,
        })
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from(constants::DEFAULT_NOTES_DIR),
            cache_file: PathBuf::from(constants::CACHE_FILE_NAME),
            cache_capacity: constants::CACHE_CAPACITY,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            qq_api_base: constants::qq::API_BASE.to_string(),
            netease_api_base: constants::netease::API_BASE.to_string(),
        }
    }
}
