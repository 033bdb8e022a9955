//! 报告生成 API 客户端
//!
//! 封装所有与下游报告生成服务相关的调用逻辑。
//! 编排器只依赖 `ReportApi` 能力接口，便于在测试中替换为记录型假实现。

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::report::{GenerationRequestPayload, ReportType, Ticker};
use serde_json::json;
use tracing::debug;

/// 下游报告生成服务的能力接口
///
/// 两个入口对应两条路径：
/// - `generate_report` - 同步路径，逐个报告类型调用
/// - `submit_generation_requests` - 后台路径，一次性提交整批载荷数组
#[allow(async_fn_in_trait)]
pub trait ReportApi {
    /// 为单个标的生成单个类型的报告
    async fn generate_report(&self, ticker: &Ticker, report_type: ReportType) -> Result<()>;

    /// 提交一批后台生成请求
    ///
    /// 约定：请求体永远是数组，哪怕只有一个元素也不得退化为标量
    async fn submit_generation_requests(
        &self,
        payloads: &[GenerationRequestPayload],
    ) -> Result<()>;
}

/// 基于 reqwest 的真实客户端
pub struct ReportClient {
    client: reqwest::Client,
    base_url: String,
    space_id: String,
}

impl ReportClient {
    /// 创建新的报告客户端
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("无法构建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            space_id: config.space_id.clone(),
        })
    }

    /// 单报告端点：`/api/{space}/tickers-v1/exchange/{exchange}/{symbol}/{slug}`
    fn report_endpoint(&self, ticker: &Ticker, report_type: ReportType) -> String {
        format!(
            "{}/api/{}/tickers-v1/exchange/{}/{}/{}",
            self.base_url,
            self.space_id,
            ticker.exchange,
            ticker.symbol,
            report_type.slug()
        )
    }

    /// 批量端点：`/api/{space}/tickers-v1/generation-requests`
    fn generation_requests_endpoint(&self) -> String {
        format!(
            "{}/api/{}/tickers-v1/generation-requests",
            self.base_url, self.space_id
        )
    }

    async fn check_status(endpoint: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl ReportApi for ReportClient {
    async fn generate_report(&self, ticker: &Ticker, report_type: ReportType) -> Result<()> {
        let endpoint = self.report_endpoint(ticker, report_type);

        // 投资人视角报告在请求体中携带 investorKey，其余为空对象
        let body = match report_type.investor_key() {
            Some(key) => json!({ "investorKey": key }),
            None => json!({}),
        };

        debug!("生成报告 {} → {}", report_type, endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::downstream(&endpoint, e))?;

        Self::check_status(&endpoint, response).await
    }

    async fn submit_generation_requests(
        &self,
        payloads: &[GenerationRequestPayload],
    ) -> Result<()> {
        let endpoint = self.generation_requests_endpoint();

        debug!("提交后台生成请求: {} 行 → {}", payloads.len(), endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(&payloads)
            .send()
            .await
            .map_err(|e| AppError::downstream(&endpoint, e))?;

        Self::check_status(&endpoint, response).await
    }
}
