use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stride_core::error::StrideError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<StrideError>() {
            match e {
                StrideError::NotInitialized => StatusCode::BAD_REQUEST,
                StrideError::TenantNotFound(_)
                | StrideError::StrategyNotFound(_)
                | StrideError::NoActiveStrategy(_)
                | StrideError::TaskNotFound(_)
                | StrideError::MilestoneNotFound(_)
                | StrideError::ScoreNotFound { .. } => StatusCode::NOT_FOUND,
                StrideError::TenantExists(_) | StrideError::StrategyExists(_) => {
                    StatusCode::CONFLICT
                }
                StrideError::InvalidSlug(_)
                | StrideError::InvalidMonth(_)
                | StrideError::InvalidUtcOffset(_)
                | StrideError::InvalidProgress(_) => StatusCode::BAD_REQUEST,
                StrideError::InvalidTransition { .. } | StrideError::InvalidTaskOrder(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                StrideError::FeedUnavailable(_) => StatusCode::BAD_GATEWAY,
                StrideError::Io(_) | StrideError::Yaml(_) | StrideError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn strategy_not_found_maps_to_404() {
        let err = AppError(StrideError::StrategyNotFound("summer".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn no_active_strategy_maps_to_404() {
        let err = AppError(StrideError::NoActiveStrategy("acme".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn score_not_found_maps_to_404() {
        let err = AppError(
            StrideError::ScoreNotFound {
                strategy: "summer".into(),
                year: 2025,
                month: 4,
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn tenant_exists_maps_to_409() {
        let err = AppError(StrideError::TenantExists("acme".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_month_maps_to_400() {
        let err = AppError(StrideError::InvalidMonth(13).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_slug_maps_to_400() {
        let err = AppError(StrideError::InvalidSlug("BAD SLUG".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_transition_maps_to_422() {
        let err = AppError(
            StrideError::InvalidTransition {
                from: "archived".into(),
                to: "paused".into(),
                reason: "no".into(),
            }
            .into(),
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn invalid_task_order_maps_to_422() {
        let err = AppError(StrideError::InvalidTaskOrder("dup".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn feed_unavailable_maps_to_502() {
        let err = AppError(StrideError::FeedUnavailable("down".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(StrideError::Io(io_err).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_stride_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_contains_error_field() {
        let err = AppError(StrideError::TenantNotFound("acme".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(
            ct.to_str().unwrap().contains("application/json"),
            "expected JSON content type, got {:?}",
            ct
        );
    }
}
