//! # Insights Core
//!
//! 投研报告生成与案例学习进度的核心库
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models / Store）
//! - `models/` - 纯数据类型（实体、载荷、派生视图）
//! - `store/` - 关系快照存储，持有唯一的共享状态，提供事务原语
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，只处理单个快照
//! - `services::progress` - 完成度归约能力
//! - `services::navigation` - 上一题/下一题导航能力
//! - `clients::ReportClient` - 下游报告生成 API 调用能力
//!
//! ### ③ 编排层（Orchestrator）
//! - `orchestrator/report_generator` - 报告生成编排器
//! - 固定依赖顺序、逐步推进、失败继续、批量后台提交
//!
//! ### ④ 接口层（Api）
//! - `api/` - 薄路由处理：按角色分发响应形态、双用途 PUT 分发
//!
//! ## 设计原则
//!
//! 1. **单一职责**：services 管单个能力，orchestrator 管调度
//! 2. **资源隔离**：只有 store 持有共享状态
//! 3. **向下依赖**：api → orchestrator/services → clients/store → models

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;

// 重新导出常用类型
pub use clients::{ReportApi, ReportClient};
pub use config::Config;
pub use error::{AppError, Result};
pub use models::report::{FailedReportParts, GenerationRequestPayload, ReportType, Ticker};
pub use orchestrator::{GenerationPhase, GenerationState, ReportOrchestrator};
pub use store::InMemoryCaseStudyStore;
