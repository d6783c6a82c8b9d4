use crate::error::ApiError;
use crate::models::ReportStatus;
use crate::repo::ResolveAction;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RejectPhotoRequest {
    pub reason: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// `pending` (default) or `resolved`.
    pub status: Option<String>,
}

impl ReportListQuery {
    pub fn parse(&self) -> Result<ReportStatus, ApiError> {
        match self.status.as_deref() {
            None | Some("pending") => Ok(ReportStatus::Pending),
            Some("resolved") => Ok(ReportStatus::Resolved),
            Some(other) => Err(ApiError::Validation(format!(
                "unknown report status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ResolveReportRequest {
    /// `delete` or `dismiss`.
    pub action: String,
    pub admin_note: String,
}

impl ResolveReportRequest {
    pub fn parse_action(&self) -> Result<ResolveAction, ApiError> {
        match self.action.as_str() {
            "delete" => Ok(ResolveAction::Delete),
            "dismiss" => Ok(ResolveAction::Dismiss),
            "" => Err(ApiError::Validation("action is required".into())),
            other => Err(ApiError::Validation(format!(
                "unknown resolve action '{other}'"
            ))),
        }
    }
}
