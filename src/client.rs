// src/client.rs

use crate::{config::AppConfig, error::*};
use reqwest::{Response, header};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// 统一出站请求的 HTTP 客户端：浏览器 UA、连接/请求超时、可配置的传输层重试。
/// 解析层不做重试，max_retries 默认为 0。
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, referer: Option<&str>) -> AppResult<Response> {
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }
        let res = request.send().await?;
        Ok(res.error_for_status()?)
    }

    pub async fn get_text(&self, url: &str, referer: Option<&str>) -> AppResult<String> {
        Ok(self.get(url, referer).await?.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        referer: Option<&str>,
    ) -> AppResult<T> {
        let mut request = self.client.get(url).query(query);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }
        let res = request.send().await?.error_for_status()?;
        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })
    }

    /// 以 JSON 请求体 POST 到聚合接口 (musicu.fcg)，返回原始 Value 供调用方按业务键取块
    pub async fn post_value(
        &self,
        url: &str,
        payload: &Value,
        referer: Option<&str>,
    ) -> AppResult<Value> {
        let mut request = self.client.post(url).json(payload);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }
        let res = request.send().await?.error_for_status()?;
        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })
    }
}
