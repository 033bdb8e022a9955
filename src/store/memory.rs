//! 关系快照存储
//!
//! 整个系统唯一持有共享状态的模块。对外提供：
//!
//! - 按 id 读取案例 / 提取单个学生的快照
//! - `transaction` 原语：克隆-修改-成功才换入，整体成功或整体不生效
//! - 案例归档级联：严格按 尝试 → 练习 → 模块 → 最终提交 →
//!   报名学生 → 报名记录 → 案例 的顺序，在一个事务内完成
//! - 幂等的"说明已读"更新

use crate::error::{AppError, Result};
use crate::models::case_study::CaseStudy;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::info;

/// 存储内部状态
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub case_studies: BTreeMap<String, CaseStudy>,
}

impl StoreState {
    /// 可变借用某个案例
    pub fn case_study_mut(&mut self, id: &str) -> Result<&mut CaseStudy> {
        self.case_studies
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("案例", id))
    }
}

/// "说明已读"更新的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionsTarget {
    /// 案例级说明
    CaseStudy,
    /// 模块级说明
    Module { module_id: String },
}

/// 内存实现的案例存储
#[derive(Debug, Default)]
pub struct InMemoryCaseStudyStore {
    state: RwLock<StoreState>,
}

impl InMemoryCaseStudyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入（或覆盖）一个案例
    pub fn insert_case_study(&self, case_study: CaseStudy) {
        let mut state = self.state.write().expect("存储锁中毒");
        state.case_studies.insert(case_study.id.clone(), case_study);
    }

    /// 按 id 读取未归档案例（返回克隆快照）
    pub fn case_study(&self, id: &str) -> Result<CaseStudy> {
        let state = self.state.read().expect("存储锁中毒");
        state
            .case_studies
            .get(id)
            .filter(|cs| !cs.archive)
            .cloned()
            .ok_or_else(|| AppError::not_found("案例", id))
    }

    /// 提取单个学生的案例快照：每个练习只保留该学生的尝试
    pub fn student_snapshot(&self, case_study_id: &str, student_id: &str) -> Result<CaseStudy> {
        let mut snapshot = self.case_study(case_study_id)?;
        for module in &mut snapshot.modules {
            for exercise in &mut module.exercises {
                exercise.attempts.retain(|a| a.created_by == student_id);
            }
        }
        Ok(snapshot)
    }

    /// 事务原语：闭包在状态克隆上执行，只有成功才整体换入
    ///
    /// 闭包返回 Err 时当前状态保持原样（全有或全无）
    pub fn transaction<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write().expect("存储锁中毒");
        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working;
        Ok(value)
    }

    /// 归档整个案例及其所有下级记录
    ///
    /// 顺序是持久层约定的一部分：尝试 → 练习 → 模块 → 最终提交 →
    /// 报名学生 → 报名记录 → 案例本体
    pub fn archive_case_study(&self, case_study_id: &str) -> Result<()> {
        self.transaction(|state| {
            let case_study = state.case_study_mut(case_study_id)?;
            archive_cascade(case_study);
            Ok(())
        })?;

        info!("🗄️ 案例 {} 已整体归档", case_study_id);
        Ok(())
    }

    /// 幂等的"说明已读"更新
    ///
    /// 只会把标志从 false 置为 true，重复调用不产生新的状态变化
    pub fn mark_instructions_read(
        &self,
        case_study_id: &str,
        target: InstructionsTarget,
    ) -> Result<()> {
        self.transaction(|state| {
            let case_study = state.case_study_mut(case_study_id)?;
            match target {
                InstructionsTarget::CaseStudy => {
                    case_study.read_status.instructions_read = true;
                }
                InstructionsTarget::Module { module_id } => {
                    if !case_study.modules.iter().any(|m| m.id == module_id) {
                        return Err(AppError::not_found("模块", module_id));
                    }
                    case_study
                        .read_status
                        .module_instructions_read
                        .insert(module_id, true);
                }
            }
            Ok(())
        })
    }
}

/// 在单个案例上执行归档级联（调用方负责事务边界）
pub fn archive_cascade(case_study: &mut CaseStudy) {
    // 1. 尝试
    for module in &mut case_study.modules {
        for exercise in &mut module.exercises {
            for attempt in &mut exercise.attempts {
                attempt.archive = true;
            }
        }
    }
    // 2. 练习
    for module in &mut case_study.modules {
        for exercise in &mut module.exercises {
            exercise.archive = true;
        }
    }
    // 3. 模块
    for module in &mut case_study.modules {
        module.archive = true;
    }
    // 4. 最终提交
    for submission in &mut case_study.final_submissions {
        submission.archive = true;
    }
    // 5. 报名学生
    for enrollment in &mut case_study.enrollments {
        for student in &mut enrollment.students {
            student.archive = true;
        }
    }
    // 6. 报名记录
    for enrollment in &mut case_study.enrollments {
        enrollment.archive = true;
    }
    // 7. 案例本体
    case_study.archive = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::case_study::{
        Attempt, AttemptStatus, CaseStudyModule, Enrollment, EnrollmentStudent, Exercise,
        FinalSubmission, ReadStatus,
    };
    use chrono::Utc;

    fn sample_case_study(id: &str) -> CaseStudy {
        CaseStudy {
            id: id.to_string(),
            title: "估值案例".to_string(),
            subject: "finance".to_string(),
            details: String::new(),
            archive: false,
            modules: vec![CaseStudyModule {
                id: "m1".to_string(),
                title: "模块 1".to_string(),
                order_number: 1,
                details: String::new(),
                archive: false,
                exercises: vec![Exercise {
                    id: "e1".to_string(),
                    title: "练习 1".to_string(),
                    order_number: 1,
                    details: String::new(),
                    archive: false,
                    attempts: vec![
                        Attempt {
                            id: "a1".to_string(),
                            attempt_number: 1,
                            status: AttemptStatus::Completed,
                            created_by: "s1".to_string(),
                            created_at: Utc::now(),
                            archive: false,
                        },
                        Attempt {
                            id: "a2".to_string(),
                            attempt_number: 1,
                            status: AttemptStatus::Pending,
                            created_by: "s2".to_string(),
                            created_at: Utc::now(),
                            archive: false,
                        },
                    ],
                }],
            }],
            enrollments: vec![Enrollment {
                id: "en1".to_string(),
                archive: false,
                students: vec![EnrollmentStudent {
                    id: "es1".to_string(),
                    assigned_student_id: "s1".to_string(),
                    archive: false,
                }],
            }],
            final_submissions: vec![FinalSubmission {
                id: "fs1".to_string(),
                student_id: "s1".to_string(),
                created_at: Utc::now(),
                archive: false,
            }],
            read_status: ReadStatus::default(),
        }
    }

    fn store_with_sample() -> InMemoryCaseStudyStore {
        let store = InMemoryCaseStudyStore::new();
        store.insert_case_study(sample_case_study("cs1"));
        store
    }

    #[test]
    fn test_student_snapshot_filters_attempts() {
        let store = store_with_sample();
        let snapshot = store.student_snapshot("cs1", "s1").unwrap();
        let attempts = &snapshot.modules[0].exercises[0].attempts;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].created_by, "s1");
    }

    #[test]
    fn test_archive_cascade_reaches_every_row() {
        let store = store_with_sample();
        store.archive_case_study("cs1").unwrap();

        // 归档后按常规读取已不可见
        assert!(store.case_study("cs1").is_err());

        // 直接检查内部状态：所有层级均已归档
        let state = store.state.read().unwrap();
        let cs = &state.case_studies["cs1"];
        assert!(cs.archive);
        assert!(cs.modules[0].archive);
        assert!(cs.modules[0].exercises[0].archive);
        assert!(cs.modules[0].exercises[0].attempts.iter().all(|a| a.archive));
        assert!(cs.final_submissions[0].archive);
        assert!(cs.enrollments[0].archive);
        assert!(cs.enrollments[0].students[0].archive);
    }

    #[test]
    fn test_transaction_failure_leaves_no_partial_archive() {
        let store = store_with_sample();

        // 模拟级联中途失败：先归档一部分，然后报错
        let result: Result<()> = store.transaction(|state| {
            let cs = state.case_study_mut("cs1")?;
            for module in &mut cs.modules {
                for exercise in &mut module.exercises {
                    exercise.archive = true;
                }
            }
            Err(AppError::Validation("注入的中途失败".to_string()))
        });
        assert!(result.is_err());

        // 状态必须完全未变
        let cs = store.case_study("cs1").unwrap();
        assert!(!cs.archive);
        assert!(!cs.modules[0].exercises[0].archive);
    }

    #[test]
    fn test_mark_instructions_read_is_idempotent() {
        let store = store_with_sample();

        store
            .mark_instructions_read("cs1", InstructionsTarget::CaseStudy)
            .unwrap();
        store
            .mark_instructions_read("cs1", InstructionsTarget::CaseStudy)
            .unwrap();

        let cs = store.case_study("cs1").unwrap();
        assert!(cs.read_status.instructions_read);

        store
            .mark_instructions_read(
                "cs1",
                InstructionsTarget::Module {
                    module_id: "m1".to_string(),
                },
            )
            .unwrap();
        let cs = store.case_study("cs1").unwrap();
        assert_eq!(cs.read_status.module_instructions_read.get("m1"), Some(&true));
    }

    #[test]
    fn test_mark_instructions_read_unknown_module() {
        let store = store_with_sample();
        let result = store.mark_instructions_read(
            "cs1",
            InstructionsTarget::Module {
                module_id: "missing".to_string(),
            },
        );
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
