//! 报告生成编排器 - 编排层
//!
//! ## 核心约定
//!
//! 1. **固定依赖顺序**：`ReportType::ALL_IN_ORDER` 中靠后的报告在服务端
//!    依赖靠前报告的产物，串行路径必须按此顺序逐个调用，失败也不跳步不重排
//! 2. **失败继续**：单步调用失败被捕获并记日志，序列继续推进；无重试
//! 3. **逐步回调**：`on_done` 在每个成功步骤之后触发（不是序列结束时一次），
//!    这是给 UI 的增量反馈约定，不是缺陷
//! 4. **批量数组体**：后台路径把整批载荷放进一次 POST，单元素也保持数组形态
//! 5. **步间限速**：同一标的相邻两步之间等待可配置的延迟（默认约 1 秒），
//!    是对下游服务的限速礼让，测试中可归零

use crate::clients::ReportApi;
use crate::models::report::{FailedReportParts, GenerationRequestPayload, ReportType, Ticker};
use futures::future::join_all;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 生成状态机的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Running,
}

/// 可被调用方观察的生成状态（idle → running → idle）
///
/// 只用于让调用方禁用触发入口；编排器本身不阻止重入，也没有取消机制
#[derive(Debug, Default)]
pub struct GenerationState {
    phase: AtomicU8,
}

impl GenerationState {
    const IDLE: u8 = 0;
    const RUNNING: u8 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GenerationPhase {
        match self.phase.load(Ordering::Acquire) {
            Self::RUNNING => GenerationPhase::Running,
            _ => GenerationPhase::Idle,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.phase() == GenerationPhase::Running
    }

    fn begin(&self) {
        self.phase.store(Self::RUNNING, Ordering::Release);
    }

    fn finish(&self) {
        self.phase.store(Self::IDLE, Ordering::Release);
    }
}

/// 报告生成编排器
pub struct ReportOrchestrator<C> {
    api: C,
    step_delay: Duration,
    state: GenerationState,
}

impl<C: ReportApi> ReportOrchestrator<C> {
    /// 创建编排器
    pub fn new(api: C, step_delay: Duration) -> Self {
        Self {
            api,
            step_delay,
            state: GenerationState::new(),
        }
    }

    /// 当前生成状态
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// 为单个标的串行生成全部 11 种报告
    ///
    /// 每个成功步骤之后调用一次 `on_done(ticker)`；失败步骤只记日志并继续
    pub async fn generate_all_reports_for_ticker(
        &self,
        ticker: &Ticker,
        on_done: impl Fn(&Ticker),
    ) {
        self.state.begin();
        info!("🚀 [{}] 开始全量报告生成（{} 步）", ticker, ReportType::ALL_IN_ORDER.len());

        self.run_sequence(ticker, &ReportType::ALL_IN_ORDER, &on_done)
            .await;

        info!("🏁 [{}] 全量报告序列结束", ticker);
        self.state.finish();
    }

    /// 为多个标的并发生成选定类型的报告
    ///
    /// 并发约定：标的之间并发推进，单个标的内部严格按固定顺序串行；
    /// 标的 A 的第 N 步和标的 B 的第 M 步之间没有任何顺序保证
    pub async fn generate_reports_synchronously(
        &self,
        tickers: &[Ticker],
        selected: &[ReportType],
        on_done: impl Fn(&Ticker),
    ) {
        if tickers.is_empty() || selected.is_empty() {
            warn!("⚠️ 没有选定标的或报告类型，跳过同步生成");
            return;
        }

        self.state.begin();
        info!(
            "🚀 同步生成: {} 个标的 × {} 种报告",
            tickers.len(),
            selected.len()
        );

        let sequence = ordered_selection(selected);
        let on_done = &on_done;
        let sequence = &sequence;

        join_all(
            tickers
                .iter()
                .map(|ticker| self.run_sequence(ticker, sequence, on_done)),
        )
        .await;

        info!("🏁 同步生成结束: {} 个标的", tickers.len());
        self.state.finish();
    }

    /// 后台批量提交选定类型的生成请求
    ///
    /// 整批载荷放进一次 POST（数组体），永远不按标的拆分为多次请求
    pub async fn generate_specific_reports_in_background(
        &self,
        tickers: &[Ticker],
        selected: &[ReportType],
    ) -> crate::Result<()> {
        let payloads: Vec<GenerationRequestPayload> = tickers
            .iter()
            .map(|t| GenerationRequestPayload::for_selected(t, selected))
            .collect();

        self.submit_batch(payloads).await
    }

    /// 后台批量提交全量生成请求（所有开关为 true）
    pub async fn generate_all_reports_in_background(
        &self,
        tickers: &[Ticker],
    ) -> crate::Result<()> {
        let payloads = Self::create_full_background_generation_requests(tickers);
        self.submit_batch(payloads).await
    }

    /// 构造全量后台生成载荷（每个标的一行，所有开关为 true）
    pub fn create_full_background_generation_requests(
        tickers: &[Ticker],
    ) -> Vec<GenerationRequestPayload> {
        tickers.iter().map(GenerationRequestPayload::for_all).collect()
    }

    /// 仅重跑失败步骤的后台提交
    ///
    /// 没有失败步骤的行在提交前被丢弃；过滤后载荷为空则不发任何请求
    pub async fn generate_failed_parts_in_background(
        &self,
        items: &[FailedReportParts],
    ) -> crate::Result<()> {
        let payloads: Vec<GenerationRequestPayload> = items
            .iter()
            .filter(|item| !item.failed_steps.is_empty())
            .map(|item| GenerationRequestPayload::for_selected(&item.ticker, &item.failed_steps))
            .collect();

        if payloads.is_empty() {
            info!("📭 过滤后没有需要重跑的失败步骤，不发起请求");
            return Ok(());
        }

        self.submit_batch(payloads).await
    }

    /// 单标的串行序列：逐步调用，失败继续，成功步骤触发回调
    async fn run_sequence(
        &self,
        ticker: &Ticker,
        sequence: &[ReportType],
        on_done: &impl Fn(&Ticker),
    ) {
        for (step, report_type) in sequence.iter().enumerate() {
            match self.api.generate_report(ticker, *report_type).await {
                Ok(()) => {
                    info!(
                        "✓ [{}] 第 {}/{} 步完成: {}",
                        ticker,
                        step + 1,
                        sequence.len(),
                        report_type
                    );
                    on_done(ticker);
                }
                Err(e) => {
                    // 失败不中断：该步骤在输出状态中缺席，序列继续
                    error!(
                        "❌ [{}] 第 {}/{} 步失败: {} ({})",
                        ticker,
                        step + 1,
                        sequence.len(),
                        report_type,
                        e
                    );
                }
            }

            if step + 1 < sequence.len() {
                sleep(self.step_delay).await;
            }
        }
    }

    async fn submit_batch(&self, payloads: Vec<GenerationRequestPayload>) -> crate::Result<()> {
        info!("📤 提交后台生成请求: {} 行", payloads.len());
        self.api.submit_generation_requests(&payloads).await?;
        info!("✓ 后台生成请求已受理: {} 行", payloads.len());
        Ok(())
    }
}

/// 把选定集合按固定依赖顺序排列（去重后保持 ALL_IN_ORDER 的相对次序）
fn ordered_selection(selected: &[ReportType]) -> Vec<ReportType> {
    ReportType::ALL_IN_ORDER
        .into_iter()
        .filter(|t| selected.contains(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopApi;

    impl ReportApi for NoopApi {
        async fn generate_report(&self, _ticker: &Ticker, _report_type: ReportType) -> crate::Result<()> {
            Ok(())
        }

        async fn submit_generation_requests(
            &self,
            _payloads: &[GenerationRequestPayload],
        ) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sync_generation_with_empty_input_is_noop() {
        let orchestrator = ReportOrchestrator::new(NoopApi, Duration::ZERO);
        tokio_test::block_on(orchestrator.generate_reports_synchronously(
            &[],
            &[ReportType::FairValue],
            |_| {},
        ));
        assert!(!orchestrator.state().is_generating());
    }

    #[test]
    fn test_ordered_selection_follows_fixed_order() {
        // 乱序选择也按固定依赖顺序执行
        let selected = [
            ReportType::FinalSummary,
            ReportType::FinancialAnalysis,
            ReportType::FairValue,
        ];
        assert_eq!(
            ordered_selection(&selected),
            vec![
                ReportType::FinancialAnalysis,
                ReportType::FairValue,
                ReportType::FinalSummary
            ]
        );
    }

    #[test]
    fn test_generation_state_transitions() {
        let state = GenerationState::new();
        assert_eq!(state.phase(), GenerationPhase::Idle);
        state.begin();
        assert!(state.is_generating());
        state.finish();
        assert_eq!(state.phase(), GenerationPhase::Idle);
    }

    #[test]
    fn test_full_background_requests_all_flags_true() {
        let tickers = vec![
            Ticker::new("AAPL", "NASDAQ").unwrap(),
            Ticker::new("KO", "NYSE").unwrap(),
        ];
        let payloads =
            ReportOrchestrator::<NoopApi>::create_full_background_generation_requests(&tickers);
        assert_eq!(payloads.len(), 2);
        for payload in &payloads {
            assert_eq!(payload.selected_types().len(), 11);
        }
    }
}
