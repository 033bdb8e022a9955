//! 完成度归约 - 业务能力层
//!
//! 输入必须是"已过滤到单个学生"的案例快照（每个练习只挂该学生的尝试）。
//!
//! 完成规则：
//! - 练习 completed ⇔ 存在至少一条 completed 状态的有效尝试
//! - 练习 attempted ⇔ 存在至少一条有效尝试（不论状态）
//! - 模块 completed ⇔ 所有有效练习均 completed（空列表视为完成）

use crate::models::case_study::{AttemptStatus, CaseStudy, CaseStudyModule, Exercise};
use crate::models::progress::{CaseStudyProgress, ExerciseProgress, ModuleProgress};

/// 归约单个练习的进度
pub fn compute_exercise_progress(exercise: &Exercise) -> ExerciseProgress {
    let attempt_count = exercise.active_attempts().count();
    let completed = exercise
        .active_attempts()
        .any(|a| a.status == AttemptStatus::Completed);

    ExerciseProgress {
        exercise_id: exercise.id.clone(),
        order_number: exercise.order_number,
        attempted: attempt_count > 0,
        completed,
        attempt_count,
    }
}

/// 归约单个模块的进度
pub fn compute_module_progress(module: &CaseStudyModule) -> ModuleProgress {
    let exercises: Vec<ExerciseProgress> =
        module.active_exercises().map(compute_exercise_progress).collect();

    // 空练习列表按空集全称量化视为完成
    let completed = exercises.iter().all(|e| e.completed);

    ModuleProgress {
        module_id: module.id.clone(),
        order_number: module.order_number,
        completed,
        exercises,
    }
}

/// 归约整个案例的进度
pub fn compute_case_study_progress(case_study: &CaseStudy) -> CaseStudyProgress {
    let modules: Vec<ModuleProgress> =
        case_study.active_modules().map(compute_module_progress).collect();

    let completed = modules.iter().all(|m| m.completed);

    CaseStudyProgress {
        case_study_id: case_study.id.clone(),
        completed,
        modules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::case_study::{Attempt, ReadStatus};
    use chrono::Utc;

    fn attempt(status: AttemptStatus, archive: bool) -> Attempt {
        Attempt {
            id: "a".to_string(),
            attempt_number: 1,
            status,
            created_by: "s1".to_string(),
            created_at: Utc::now(),
            archive,
        }
    }

    fn exercise(id: &str, order: i32, attempts: Vec<Attempt>) -> Exercise {
        Exercise {
            id: id.to_string(),
            title: format!("练习 {}", id),
            order_number: order,
            details: String::new(),
            archive: false,
            attempts,
        }
    }

    fn module(id: &str, order: i32, exercises: Vec<Exercise>) -> CaseStudyModule {
        CaseStudyModule {
            id: id.to_string(),
            title: format!("模块 {}", id),
            order_number: order,
            details: String::new(),
            archive: false,
            exercises,
        }
    }

    fn case_study(modules: Vec<CaseStudyModule>) -> CaseStudy {
        CaseStudy {
            id: "cs1".to_string(),
            title: "案例".to_string(),
            subject: "finance".to_string(),
            details: String::new(),
            archive: false,
            modules,
            enrollments: vec![],
            final_submissions: vec![],
            read_status: ReadStatus::default(),
        }
    }

    #[test]
    fn test_exercise_completed_requires_completed_attempt() {
        let pending = exercise("e1", 1, vec![attempt(AttemptStatus::Pending, false)]);
        let progress = compute_exercise_progress(&pending);
        assert!(progress.attempted);
        assert!(!progress.completed);

        let done = exercise(
            "e2",
            2,
            vec![
                attempt(AttemptStatus::Failed, false),
                attempt(AttemptStatus::Completed, false),
            ],
        );
        let progress = compute_exercise_progress(&done);
        assert!(progress.completed);
        assert_eq!(progress.attempt_count, 2);
    }

    #[test]
    fn test_archived_attempt_is_not_a_signal() {
        let ex = exercise("e1", 1, vec![attempt(AttemptStatus::Completed, true)]);
        let progress = compute_exercise_progress(&ex);
        assert!(!progress.attempted);
        assert!(!progress.completed);
    }

    #[test]
    fn test_module_completed_iff_all_exercises_completed() {
        let m = module(
            "m1",
            1,
            vec![
                exercise("e1", 1, vec![attempt(AttemptStatus::Completed, false)]),
                exercise("e2", 2, vec![attempt(AttemptStatus::Pending, false)]),
            ],
        );
        assert!(!compute_module_progress(&m).completed);

        let m = module(
            "m2",
            2,
            vec![exercise("e3", 1, vec![attempt(AttemptStatus::Completed, false)])],
        );
        assert!(compute_module_progress(&m).completed);
    }

    #[test]
    fn test_empty_module_is_vacuously_completed() {
        let m = module("m1", 1, vec![]);
        assert!(compute_module_progress(&m).completed);
    }

    #[test]
    fn test_archived_exercise_excluded_from_module_completion() {
        // 唯一未完成的练习被归档后，模块视为完成
        let m = module("m1", 1, {
            let mut pending = exercise("e1", 1, vec![attempt(AttemptStatus::Pending, false)]);
            pending.archive = true;
            vec![
                pending,
                exercise("e2", 2, vec![attempt(AttemptStatus::Completed, false)]),
            ]
        });
        let progress = compute_module_progress(&m);
        assert!(progress.completed);
        assert_eq!(progress.exercises.len(), 1);
    }

    #[test]
    fn test_case_study_progress_aggregates_modules() {
        let cs = case_study(vec![
            module(
                "m1",
                1,
                vec![exercise("e1", 1, vec![attempt(AttemptStatus::Completed, false)])],
            ),
            module("m2", 2, vec![exercise("e2", 1, vec![])]),
        ]);
        let progress = compute_case_study_progress(&cs);
        assert!(!progress.completed);
        assert_eq!(progress.modules.len(), 2);
        assert!(progress.modules[0].completed);
        assert!(!progress.modules[1].completed);
    }
}
