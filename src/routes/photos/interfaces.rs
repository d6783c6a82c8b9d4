use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PUBLIC_LIMIT: i64 = 20;
pub const DEFAULT_OWN_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Out-of-range values fall back to the defaults rather than erroring.
    #[must_use]
    pub fn clamp(&self, default_limit: i64) -> (i64, i64) {
        let limit = match self.limit {
            Some(v) if v > 0 && v <= MAX_LIMIT => v,
            _ => default_limit,
        };
        let offset = match self.offset {
            Some(v) if v >= 0 => v,
            _ => 0,
        };
        (limit, offset)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdatePhotoRequest {
    pub description: String,
    pub is_public: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatus {
    pub liked: bool,
}
