//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责报告生成的调度，是整个报告侧的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `report_generator` - 报告生成编排器
//! - 单标的全量串行生成（固定依赖顺序，步间限速）
//! - 多标的并发生成（标的间并发，标的内严格串行）
//! - 后台批量提交（永远一次数组体 POST）
//! - 仅失败步骤重跑（空载荷不发请求）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::ReportOrchestrator (调度 Vec<Ticker>)
//!     ↓
//! clients::ReportApi (能力层：单次报告调用 / 批量提交)
//! ```
//!
//! ## 设计原则
//!
//! 1. **失败继续**：单步失败只记日志，从不中断序列或其他标的
//! 2. **无取消**：序列一旦开始没有取消令牌，调用方只能阻止新任务启动
//! 3. **状态外显**：idle → running → idle 状态机可被调用方观察

pub mod report_generator;

pub use report_generator::{GenerationPhase, GenerationState, ReportOrchestrator};
