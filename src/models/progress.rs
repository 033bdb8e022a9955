//! 派生视图类型
//!
//! 进度与导航视图每次请求由归约器现算，从不落库，
//! 序列化返回后即丢弃。

use serde::Serialize;

use crate::models::case_study::Attempt;

/// 单个练习的进度
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    pub exercise_id: String,
    pub order_number: i32,
    /// 是否有过任何尝试（不论状态）
    pub attempted: bool,
    /// 是否存在 completed 状态的尝试
    pub completed: bool,
    pub attempt_count: usize,
}

/// 单个模块的进度
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub order_number: i32,
    /// 所有有效练习均完成（空练习列表视为完成）
    pub completed: bool,
    pub exercises: Vec<ExerciseProgress>,
}

/// 整个案例的进度
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyProgress {
    pub case_study_id: String,
    pub completed: bool,
    pub modules: Vec<ModuleProgress>,
}

/// 导航结果：以某个"当前练习"为锚点的前后遍历
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResult {
    pub next_exercise_id: Option<String>,
    pub next_module_id: Option<String>,
    pub previous_exercise_id: Option<String>,
    pub previous_module_id: Option<String>,
    /// 当前练习是全案例第一个练习
    pub is_first_exercise: bool,
    /// 全案例不存在下一个练习（可进入最终提交的终态）
    pub is_complete: bool,
    /// 下一个练习在另一个模块中
    pub is_next_exercise_in_different_module: bool,
}

/// 学生角色的合并视图：进度 + 导航 + 当前练习的尝试记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedStudentView {
    pub progress: CaseStudyProgress,
    pub navigation: NavigationResult,
    pub current_exercise_attempts: Vec<Attempt>,
}
