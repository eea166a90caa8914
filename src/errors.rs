use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::OrderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] OrderError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable name of the failure, so callers can phrase
    /// the right message without parsing text.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Domain(e) => match e {
                OrderError::NotFound => "not_found",
                OrderError::InvalidState { .. } => "invalid_state",
                OrderError::InvalidAddress { .. } => "invalid_address",
                OrderError::InvalidInput(_) => "invalid_input",
                OrderError::ReturnWindowExpired { .. } => "return_window_expired",
                OrderError::Busy => "busy",
                OrderError::Internal(_) => "internal",
            },
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e {
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::InvalidState { .. } => StatusCode::CONFLICT,
                OrderError::InvalidAddress { .. }
                | OrderError::InvalidInput(_)
                | OrderError::ReturnWindowExpired { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                OrderError::Busy => StatusCode::SERVICE_UNAVAILABLE,
                OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}", self);
            return HttpResponse::InternalServerError().json(json!({
                "error": self.kind(),
                "message": "Internal server error"
            }));
        }

        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string()
        });
        match self {
            AppError::Domain(OrderError::InvalidState { current }) => {
                body["current_status"] = json!(current);
            }
            AppError::Domain(OrderError::InvalidAddress { field }) => {
                body["field"] = json!(field);
            }
            AppError::Domain(OrderError::ReturnWindowExpired { elapsed_days }) => {
                body["elapsed_days"] = json!(elapsed_days);
            }
            _ => {}
        }

        let mut response = HttpResponse::build(status);
        if matches!(self, AppError::Domain(OrderError::Busy)) {
            response.insert_header(("Retry-After", "1"));
        }
        response.json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::from(OrderError::NotFound).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_state_returns_409() {
        let err: AppError = OrderError::InvalidState {
            current: OrderStatus::Shipped,
        }
        .into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "invalid_state");
    }

    #[test]
    fn policy_rejections_return_422() {
        for err in [
            OrderError::InvalidAddress { field: "city" },
            OrderError::InvalidInput("quantity".to_string()),
            OrderError::ReturnWindowExpired { elapsed_days: 40 },
        ] {
            assert_eq!(
                AppError::from(err).status_code(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
        }
    }

    #[test]
    fn busy_returns_503_with_retry_after() {
        let resp = AppError::from(OrderError::Busy).error_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            resp.headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok()),
            Some("1")
        );
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let domain: AppError = OrderError::Internal("oops".to_string()).into();
        assert_eq!(domain.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_display() {
        assert_eq!(
            AppError::BadRequest("msg".to_string()).to_string(),
            "Bad request: msg"
        );
    }

    #[test]
    fn domain_display_is_passed_through() {
        assert_eq!(
            AppError::from(OrderError::NotFound).to_string(),
            "Order not found"
        );
    }
}
