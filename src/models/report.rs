//! 报告相关数据类型
//!
//! - `ReportType` - 固定的 11 种报告类型，带硬性依赖顺序
//! - `Ticker` - 标的标识（代码 + 交易所）
//! - `GenerationRequestPayload` - 后台批量生成的单行载荷
//! - `FailedReportParts` - 仅重跑失败步骤的输入行

use crate::error::{AppError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// 报告类型枚举
///
/// 注意：`ALL_IN_ORDER` 的顺序是硬性依赖顺序——后面的报告在服务端
/// 会读取前面报告的产物，任何重实现都不允许调整这个顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    /// 财务分析
    FinancialAnalysis,
    /// 竞争格局
    Competition,
    /// 业务与护城河
    BusinessAndMoat,
    /// 合理估值
    FairValue,
    /// 未来风险
    FutureRisk,
    /// 历史表现
    PastPerformance,
    /// 未来增长
    FutureGrowth,
    /// 最终总结
    FinalSummary,
    /// 投资人视角：巴菲特
    WarrenBuffett,
    /// 投资人视角：芒格
    CharlieMunger,
    /// 投资人视角：阿克曼
    BillAckman,
}

/// slug → ReportType 的静态映射
static SLUG_TO_REPORT_TYPE: phf::Map<&'static str, ReportType> = phf::phf_map! {
    "financial-analysis" => ReportType::FinancialAnalysis,
    "competition" => ReportType::Competition,
    "business-and-moat" => ReportType::BusinessAndMoat,
    "fair-value" => ReportType::FairValue,
    "future-risk" => ReportType::FutureRisk,
    "past-performance" => ReportType::PastPerformance,
    "future-growth" => ReportType::FutureGrowth,
    "final-summary" => ReportType::FinalSummary,
    "warren-buffett" => ReportType::WarrenBuffett,
    "charlie-munger" => ReportType::CharlieMunger,
    "bill-ackman" => ReportType::BillAckman,
};

impl ReportType {
    /// 全部报告类型，按硬性依赖顺序排列
    pub const ALL_IN_ORDER: [ReportType; 11] = [
        ReportType::FinancialAnalysis,
        ReportType::Competition,
        ReportType::BusinessAndMoat,
        ReportType::FairValue,
        ReportType::FutureRisk,
        ReportType::PastPerformance,
        ReportType::FutureGrowth,
        ReportType::FinalSummary,
        ReportType::WarrenBuffett,
        ReportType::CharlieMunger,
        ReportType::BillAckman,
    ];

    /// URL 路径段
    pub fn slug(self) -> &'static str {
        match self {
            ReportType::FinancialAnalysis => "financial-analysis",
            ReportType::Competition => "competition",
            ReportType::BusinessAndMoat => "business-and-moat",
            ReportType::FairValue => "fair-value",
            ReportType::FutureRisk => "future-risk",
            ReportType::PastPerformance => "past-performance",
            ReportType::FutureGrowth => "future-growth",
            ReportType::FinalSummary => "final-summary",
            ReportType::WarrenBuffett => "warren-buffett",
            ReportType::CharlieMunger => "charlie-munger",
            ReportType::BillAckman => "bill-ackman",
        }
    }

    /// 投资人视角报告携带的 investorKey，其余类型为 None
    pub fn investor_key(self) -> Option<&'static str> {
        match self {
            ReportType::WarrenBuffett => Some("WARREN_BUFFETT"),
            ReportType::CharlieMunger => Some("CHARLIE_MUNGER"),
            ReportType::BillAckman => Some("BILL_ACKMAN"),
            _ => None,
        }
    }

    /// 从 slug 解析报告类型
    pub fn from_slug(slug: &str) -> Option<Self> {
        SLUG_TO_REPORT_TYPE.get(slug).copied()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// 标的标识
///
/// 等价性由 代码 + 交易所 共同决定
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    /// 标的代码（如 AAPL、BRK.B）
    pub symbol: String,
    /// 交易所（如 NASDAQ、NYSE）
    pub exchange: String,
}

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9][A-Z0-9.\-]{0,9}$").unwrap())
}

impl Ticker {
    /// 创建并校验标的标识
    pub fn new(symbol: impl Into<String>, exchange: impl Into<String>) -> Result<Self> {
        let symbol = symbol.into();
        let exchange = exchange.into();

        if !symbol_pattern().is_match(&symbol) {
            return Err(AppError::Validation(format!("非法的标的代码: {}", symbol)));
        }
        if exchange.is_empty() {
            return Err(AppError::Validation("交易所不能为空".to_string()));
        }

        Ok(Self { symbol, exchange })
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange, self.symbol)
    }
}

/// 后台批量生成请求中的单行载荷
///
/// 每个 ticker 一行：标的标识 + 每种报告类型一个布尔开关。
/// 构造后不再修改；不变量：恰好选中的类型为 true，其余全为 false。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequestPayload {
    pub symbol: String,
    pub exchange: String,
    pub regenerate_financial_analysis: bool,
    pub regenerate_competition: bool,
    pub regenerate_business_and_moat: bool,
    pub regenerate_fair_value: bool,
    pub regenerate_future_risk: bool,
    pub regenerate_past_performance: bool,
    pub regenerate_future_growth: bool,
    pub regenerate_final_summary: bool,
    pub regenerate_warren_buffett: bool,
    pub regenerate_charlie_munger: bool,
    pub regenerate_bill_ackman: bool,
}

impl GenerationRequestPayload {
    /// 按选中的报告类型构造载荷
    pub fn for_selected(ticker: &Ticker, selected: &[ReportType]) -> Self {
        let mut payload = Self::empty(ticker);
        for report_type in selected {
            payload.set_flag(*report_type);
        }
        payload
    }

    /// 构造全量重生成载荷（所有开关为 true）
    pub fn for_all(ticker: &Ticker) -> Self {
        Self::for_selected(ticker, &ReportType::ALL_IN_ORDER)
    }

    fn empty(ticker: &Ticker) -> Self {
        Self {
            symbol: ticker.symbol.clone(),
            exchange: ticker.exchange.clone(),
            regenerate_financial_analysis: false,
            regenerate_competition: false,
            regenerate_business_and_moat: false,
            regenerate_fair_value: false,
            regenerate_future_risk: false,
            regenerate_past_performance: false,
            regenerate_future_growth: false,
            regenerate_final_summary: false,
            regenerate_warren_buffett: false,
            regenerate_charlie_munger: false,
            regenerate_bill_ackman: false,
        }
    }

    fn set_flag(&mut self, report_type: ReportType) {
        match report_type {
            ReportType::FinancialAnalysis => self.regenerate_financial_analysis = true,
            ReportType::Competition => self.regenerate_competition = true,
            ReportType::BusinessAndMoat => self.regenerate_business_and_moat = true,
            ReportType::FairValue => self.regenerate_fair_value = true,
            ReportType::FutureRisk => self.regenerate_future_risk = true,
            ReportType::PastPerformance => self.regenerate_past_performance = true,
            ReportType::FutureGrowth => self.regenerate_future_growth = true,
            ReportType::FinalSummary => self.regenerate_final_summary = true,
            ReportType::WarrenBuffett => self.regenerate_warren_buffett = true,
            ReportType::CharlieMunger => self.regenerate_charlie_munger = true,
            ReportType::BillAckman => self.regenerate_bill_ackman = true,
        }
    }

    /// 读取某类型的开关
    pub fn flag(&self, report_type: ReportType) -> bool {
        match report_type {
            ReportType::FinancialAnalysis => self.regenerate_financial_analysis,
            ReportType::Competition => self.regenerate_competition,
            ReportType::BusinessAndMoat => self.regenerate_business_and_moat,
            ReportType::FairValue => self.regenerate_fair_value,
            ReportType::FutureRisk => self.regenerate_future_risk,
            ReportType::PastPerformance => self.regenerate_past_performance,
            ReportType::FutureGrowth => self.regenerate_future_growth,
            ReportType::FinalSummary => self.regenerate_final_summary,
            ReportType::WarrenBuffett => self.regenerate_warren_buffett,
            ReportType::CharlieMunger => self.regenerate_charlie_munger,
            ReportType::BillAckman => self.regenerate_bill_ackman,
        }
    }

    /// 当前为 true 的报告类型集合（按固定顺序）
    pub fn selected_types(&self) -> Vec<ReportType> {
        ReportType::ALL_IN_ORDER
            .into_iter()
            .filter(|t| self.flag(*t))
            .collect()
    }
}

/// 仅重跑失败步骤的输入行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedReportParts {
    pub ticker: Ticker,
    pub failed_steps: Vec<ReportType>,
}
