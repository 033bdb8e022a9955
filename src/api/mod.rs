//! 接口层（Api）
//!
//! 薄路由处理：取数 → 调能力层 → 按角色组装响应。
//! 不含业务规则，所有计算都委托给 services 与 store。

pub mod case_study_routes;

pub use case_study_routes::{
    get_exercise_view, update_case_study, Caller, CallerRole, CaseStudyResponse, UpdateOutcome,
};
