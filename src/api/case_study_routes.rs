//! 案例路由处理
//!
//! 两个与原有客户端兼容的端点行为：
//!
//! - GET：同一路由按调用者角色返回三种响应形态之一——学生得到
//!   进度 + 导航 + 尝试的合并视图，讲师/管理员得到原始实体记录。
//!   分发用显式的角色匹配表完成，不做运行期变形。
//! - PUT：同一路由承载两种互不相关的更新——请求体带 `type` 字段时是
//!   幂等的"说明已读"更新，否则是完整的案例更新。

use crate::error::{AppError, Result};
use crate::models::case_study::CaseStudy;
use crate::models::progress::ConsolidatedStudentView;
use crate::services::{compute_case_study_progress, compute_navigation};
use crate::store::{InMemoryCaseStudyStore, InstructionsTarget};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// 调用者角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    Student,
    Instructor,
    Admin,
}

/// 调用者身份
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub role: CallerRole,
}

/// 按角色区分的响应形态
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", content = "data", rename_all = "camelCase")]
pub enum CaseStudyResponse {
    /// 学生：合并视图（进度 + 导航 + 当前练习的尝试）
    Student(ConsolidatedStudentView),
    /// 讲师：原始实体记录
    Instructor(CaseStudy),
    /// 管理员：原始实体记录
    Admin(CaseStudy),
}

/// GET 练习视图：角色分发表
pub fn get_exercise_view(
    store: &InMemoryCaseStudyStore,
    case_study_id: &str,
    exercise_id: &str,
    caller: &Caller,
) -> Result<CaseStudyResponse> {
    match caller.role {
        CallerRole::Student => student_view(store, case_study_id, exercise_id, caller),
        CallerRole::Instructor => Ok(CaseStudyResponse::Instructor(store.case_study(case_study_id)?)),
        CallerRole::Admin => Ok(CaseStudyResponse::Admin(store.case_study(case_study_id)?)),
    }
}

/// 组装学生合并视图
fn student_view(
    store: &InMemoryCaseStudyStore,
    case_study_id: &str,
    exercise_id: &str,
    caller: &Caller,
) -> Result<CaseStudyResponse> {
    let snapshot = store.student_snapshot(case_study_id, &caller.user_id)?;

    // 报名校验先于一切计算
    if !snapshot.is_student_enrolled(&caller.user_id) {
        return Err(AppError::NotEnrolled {
            student_id: caller.user_id.clone(),
            case_study_id: case_study_id.to_string(),
        });
    }

    let navigation = compute_navigation(&snapshot, exercise_id)?;
    let progress = compute_case_study_progress(&snapshot);

    let (_, current_exercise) = snapshot
        .find_active_exercise(exercise_id)
        .ok_or_else(|| AppError::not_found("练习", exercise_id))?;
    let current_exercise_attempts = current_exercise.active_attempts().cloned().collect();

    Ok(CaseStudyResponse::Student(ConsolidatedStudentView {
        progress,
        navigation,
        current_exercise_attempts,
    }))
}

/// "说明已读"请求体（带 `type` 判别字段）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkInstructionsReadBody {
    #[serde(rename = "type")]
    target_type: String,
    module_id: Option<String>,
}

/// 完整案例更新请求体（不带 `type` 字段）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseStudyUpdateBody {
    title: Option<String>,
    subject: Option<String>,
    details: Option<String>,
}

/// PUT 的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// "说明已读"更新完成
    InstructionsMarked,
    /// 完整案例更新完成
    Updated,
}

/// PUT 案例：双用途分发
///
/// 判别依据是请求体中 `type` 字段的有无，与原有客户端保持兼容
pub fn update_case_study(
    store: &InMemoryCaseStudyStore,
    case_study_id: &str,
    body: &Value,
) -> Result<UpdateOutcome> {
    if body.get("type").is_some() {
        mark_instructions_read(store, case_study_id, body)
    } else {
        apply_full_update(store, case_study_id, body)
    }
}

fn mark_instructions_read(
    store: &InMemoryCaseStudyStore,
    case_study_id: &str,
    body: &Value,
) -> Result<UpdateOutcome> {
    let body: MarkInstructionsReadBody = serde_json::from_value(body.clone())
        .map_err(|e| AppError::Validation(format!("非法的已读更新请求体: {}", e)))?;

    let target = match body.target_type.as_str() {
        "case_study" => InstructionsTarget::CaseStudy,
        "module" => {
            let module_id = body.module_id.ok_or_else(|| {
                AppError::Validation("type=module 时必须提供 moduleId".to_string())
            })?;
            InstructionsTarget::Module { module_id }
        }
        other => {
            return Err(AppError::Validation(format!(
                "非法的 type 取值: {}（应为 case_study 或 module）",
                other
            )))
        }
    };

    store.mark_instructions_read(case_study_id, target)?;
    info!("📖 案例 {} 说明已读更新完成", case_study_id);
    Ok(UpdateOutcome::InstructionsMarked)
}

fn apply_full_update(
    store: &InMemoryCaseStudyStore,
    case_study_id: &str,
    body: &Value,
) -> Result<UpdateOutcome> {
    let body: CaseStudyUpdateBody = serde_json::from_value(body.clone())
        .map_err(|e| AppError::Validation(format!("非法的案例更新请求体: {}", e)))?;

    store.transaction(|state| {
        let case_study = state.case_study_mut(case_study_id)?;
        if case_study.archive {
            return Err(AppError::not_found("案例", case_study_id));
        }
        if let Some(title) = body.title {
            case_study.title = title;
        }
        if let Some(subject) = body.subject {
            case_study.subject = subject;
        }
        if let Some(details) = body.details {
            case_study.details = details;
        }
        Ok(())
    })?;

    info!("✏️ 案例 {} 更新完成", case_study_id);
    Ok(UpdateOutcome::Updated)
}
