//! 案例学习实体
//!
//! 关系快照：案例 → 模块 → 练习 → 尝试，外加报名与最终提交。
//! 所有实体带 `archive` 软删除标记；归档行对进度/导航完全不可见。
//! 过滤统一走 `active_*` 谓词方法，禁止在调用点散写 `!archive`。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 尝试状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Pending,
    Completed,
    Failed,
}

/// 练习尝试
///
/// 创建后不可变，仅 status 允许迁移；"completed" 是练习完成的唯一信号
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub attempt_number: u32,
    pub status: AttemptStatus,
    /// 发起尝试的学生
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub archive: bool,
}

/// 练习
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub title: String,
    /// 模块内致密且唯一的排序键
    pub order_number: i32,
    pub details: String,
    pub archive: bool,
    pub attempts: Vec<Attempt>,
}

impl Exercise {
    /// 未归档的尝试
    pub fn active_attempts(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter().filter(|a| !a.archive)
    }
}

/// 案例模块
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyModule {
    pub id: String,
    pub title: String,
    /// 案例内排序键
    pub order_number: i32,
    pub details: String,
    pub archive: bool,
    pub exercises: Vec<Exercise>,
}

impl CaseStudyModule {
    /// 未归档的练习
    pub fn active_exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter().filter(|e| !e.archive)
    }
}

/// 报名学生
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStudent {
    pub id: String,
    /// 被分配的学生 id
    pub assigned_student_id: String,
    pub archive: bool,
}

/// 报名记录：学生访问案例的前置条件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub archive: bool,
    pub students: Vec<EnrollmentStudent>,
}

impl Enrollment {
    pub fn active_students(&self) -> impl Iterator<Item = &EnrollmentStudent> {
        self.students.iter().filter(|s| !s.archive)
    }
}

/// 最终提交
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSubmission {
    pub id: String,
    pub student_id: String,
    pub created_at: DateTime<Utc>,
    pub archive: bool,
}

/// 阅读状态（JSON 状态块）
///
/// 只会从 false 置为 true，更新是幂等的
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadStatus {
    /// 案例级说明是否已读
    pub instructions_read: bool,
    /// 模块 id → 模块说明是否已读
    #[serde(default)]
    pub module_instructions_read: BTreeMap<String, bool>,
}

/// 案例
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub details: String,
    pub archive: bool,
    pub modules: Vec<CaseStudyModule>,
    pub enrollments: Vec<Enrollment>,
    pub final_submissions: Vec<FinalSubmission>,
    #[serde(default)]
    pub read_status: ReadStatus,
}

impl CaseStudy {
    /// 未归档的模块
    pub fn active_modules(&self) -> impl Iterator<Item = &CaseStudyModule> {
        self.modules.iter().filter(|m| !m.archive)
    }

    /// 未归档的报名记录
    pub fn active_enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.iter().filter(|e| !e.archive)
    }

    /// 学生是否在任一有效报名记录中
    pub fn is_student_enrolled(&self, student_id: &str) -> bool {
        self.active_enrollments()
            .flat_map(|e| e.active_students())
            .any(|s| s.assigned_student_id == student_id)
    }

    /// 在有效模块中查找有效练习，返回 (模块, 练习)
    pub fn find_active_exercise(&self, exercise_id: &str) -> Option<(&CaseStudyModule, &Exercise)> {
        self.active_modules().find_map(|module| {
            module
                .active_exercises()
                .find(|e| e.id == exercise_id)
                .map(|e| (module, e))
        })
    }
}
