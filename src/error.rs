//! 应用程序错误类型
//!
//! 错误分类对应四类失败：
//! - 实体不存在（或被 archive 过滤掉）
//! - 权限/报名校验失败
//! - 请求体校验失败
//! - 下游 API 调用失败

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 实体不存在（含被 archive 过滤的情况）
    #[error("未找到{entity}: {id}")]
    NotFound { entity: &'static str, id: String },

    /// 学生未报名目标案例
    #[error("学生 {student_id} 未报名案例 {case_study_id}")]
    NotEnrolled {
        student_id: String,
        case_study_id: String,
    },

    /// 请求体校验失败
    #[error("请求校验失败: {0}")]
    Validation(String),

    /// 下游 API 请求失败（网络错误）
    #[error("下游API请求失败 ({endpoint}): {source}")]
    Downstream {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 下游 API 返回非 2xx 状态
    #[error("下游API返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl AppError {
    /// 创建实体不存在错误
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// 创建下游请求失败错误
    pub fn downstream(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Downstream {
            endpoint: endpoint.into(),
            source,
        }
    }
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
