//! 业务能力层（Services）
//!
//! 每个模块只负责一种能力，入参是单个学生的案例快照，纯计算无副作用：
//!
//! - `progress` - 完成度归约能力
//! - `navigation` - 上一题/下一题导航能力

pub mod navigation;
pub mod progress;

pub use navigation::compute_navigation;
pub use progress::{compute_case_study_progress, compute_exercise_progress, compute_module_progress};
