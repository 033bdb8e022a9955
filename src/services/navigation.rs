//! 上一题/下一题导航 - 业务能力层
//!
//! 以 (模块 order_number, 练习 order_number) 构成全序，对单个"当前练习"
//! 计算跨模块的线性前后遍历。只考虑未归档的模块与练习。
//!
//! 相邻模块规则：前驱/后继只看最近的一个模块——若该模块没有任何练习，
//! 结果即为空，不再继续向外查找。

use crate::error::{AppError, Result};
use crate::models::case_study::{CaseStudy, CaseStudyModule, Exercise};
use crate::models::progress::NavigationResult;

/// 计算当前练习的导航结果
///
/// # 错误
/// 当练习 id 在 archive 过滤后无法定位时返回 NotFound
pub fn compute_navigation(case_study: &CaseStudy, current_exercise_id: &str) -> Result<NavigationResult> {
    let (current_module, current_exercise) = case_study
        .find_active_exercise(current_exercise_id)
        .ok_or_else(|| AppError::not_found("练习", current_exercise_id))?;

    let previous = find_previous(case_study, current_module, current_exercise);
    let next = find_next(case_study, current_module, current_exercise);

    let is_next_exercise_in_different_module = next
        .as_ref()
        .map(|(module_id, _)| module_id != &current_module.id)
        .unwrap_or(false);

    Ok(NavigationResult {
        next_exercise_id: next.as_ref().map(|(_, e)| e.clone()),
        next_module_id: next.as_ref().map(|(m, _)| m.clone()),
        previous_exercise_id: previous.as_ref().map(|(_, e)| e.clone()),
        previous_module_id: previous.as_ref().map(|(m, _)| m.clone()),
        is_first_exercise: previous.is_none(),
        is_complete: next.is_none(),
        is_next_exercise_in_different_module,
    })
}

/// 前驱：同模块内 order 最大的更小项；否则最近前驱模块的最后一个练习
fn find_previous(
    case_study: &CaseStudy,
    current_module: &CaseStudyModule,
    current_exercise: &Exercise,
) -> Option<(String, String)> {
    if let Some(prev) = current_module
        .active_exercises()
        .filter(|e| e.order_number < current_exercise.order_number)
        .max_by_key(|e| e.order_number)
    {
        return Some((current_module.id.clone(), prev.id.clone()));
    }

    let prev_module = case_study
        .active_modules()
        .filter(|m| m.order_number < current_module.order_number)
        .max_by_key(|m| m.order_number)?;

    prev_module
        .active_exercises()
        .max_by_key(|e| e.order_number)
        .map(|e| (prev_module.id.clone(), e.id.clone()))
}

/// 后继：同模块内 order 最小的更大项；否则最近后继模块的第一个练习
fn find_next(
    case_study: &CaseStudy,
    current_module: &CaseStudyModule,
    current_exercise: &Exercise,
) -> Option<(String, String)> {
    if let Some(next) = current_module
        .active_exercises()
        .filter(|e| e.order_number > current_exercise.order_number)
        .min_by_key(|e| e.order_number)
    {
        return Some((current_module.id.clone(), next.id.clone()));
    }

    let next_module = case_study
        .active_modules()
        .filter(|m| m.order_number > current_module.order_number)
        .min_by_key(|m| m.order_number)?;

    next_module
        .active_exercises()
        .min_by_key(|e| e.order_number)
        .map(|e| (next_module.id.clone(), e.id.clone()))
}
