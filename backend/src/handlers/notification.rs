//! HTTP handlers for report preview and delivery endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::NotificationService;
use crate::AppState;
use shared::{calendar_date, validate_custom_content, ReportKind, MAX_MESSAGE_LEN};

// ============================================================================
// Request Types
// ============================================================================

/// Which report to build, as sent by the dashboard
#[derive(Debug, Deserialize, Validate)]
pub struct ReportParams {
    #[validate(length(min = 1, max = 32))]
    pub kind: String,
    /// Target day for delivery-due reports; today at the report offset when absent
    pub date: Option<NaiveDate>,
    /// Body of a custom announcement
    #[validate(length(max = 4096))]
    pub content: Option<String>,
}

impl ReportParams {
    /// Turn loose request fields into a report kind. `today` fills a missing date.
    pub fn into_kind(self, today: NaiveDate) -> AppResult<ReportKind> {
        match self.kind.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "unpaid" => Ok(ReportKind::Unpaid),
            "pending" => Ok(ReportKind::Pending),
            "delivery_due" | "delivery" => Ok(ReportKind::DeliveryDue {
                date: self.date.unwrap_or(today),
            }),
            "custom" => {
                let content = self.content.unwrap_or_default();
                validate_custom_content(&content).map_err(|reason| AppError::Validation {
                    field: "content".to_string(),
                    message: reason.to_string(),
                    message_vi: format!(
                        "Nội dung thông báo không được để trống và tối đa {} ký tự",
                        MAX_MESSAGE_LEN
                    ),
                })?;
                Ok(ReportKind::Custom { content })
            }
            _ => Err(AppError::Validation {
                field: "kind".to_string(),
                message: format!("Unknown report kind: {}", self.kind),
                message_vi: format!("Loại báo cáo không hợp lệ: {}", self.kind),
            }),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// A rendered report that was not sent
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub kind: String,
    pub text: String,
}

/// Send report response
#[derive(Debug, Serialize)]
pub struct SendReportResponse {
    pub success: bool,
    pub message: String,
    pub text: String,
}

// ============================================================================
// Handlers
// ============================================================================

fn service(state: &AppState) -> NotificationService {
    NotificationService::new(state.db.clone(), state.compiler, state.messenger.clone())
}

fn today(state: &AppState) -> NaiveDate {
    calendar_date(Utc::now(), &state.compiler.offset())
}

/// Render a report without sending it
/// GET /notifications/preview?kind=&date=&content=
pub async fn preview_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<PreviewResponse>> {
    params.validate()?;
    let kind = params.into_kind(today(&state))?;
    let text = service(&state).render_report(&kind).await?;

    Ok(Json(PreviewResponse {
        kind: kind.name().to_string(),
        text,
    }))
}

/// Render a report and deliver it to the shop's chat
/// POST /notifications/send
pub async fn send_report(
    State(state): State<AppState>,
    Json(params): Json<ReportParams>,
) -> AppResult<Json<SendReportResponse>> {
    params.validate()?;
    let kind = params.into_kind(today(&state))?;
    let receipt = service(&state).send_report(&kind).await?;

    Ok(Json(SendReportResponse {
        success: true,
        message: format!("Report {} sent", receipt.kind),
        text: receipt.text,
    }))
}
