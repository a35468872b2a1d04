use checkout_engine::traits::{OrderGatewayError, VoucherError};
use serde::Deserialize;

use crate::MarketplaceApiError;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error", alias = "detail")]
    message: String,
}

/// The human-readable message of an error response. The API answers with `{"message": "..."}`; anything else is passed
/// through as it came.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) if !e.message.trim().is_empty() => e.message.trim().to_string(),
        _ => body.trim().to_string(),
    }
}

/// Maps a failed order-service call onto the engine's failure classes.
///
/// 401 and 403 mean the session must be re-authenticated, which aborts a checkout batch. Request-content rejections
/// (400, 404, 409, 422) are validation failures, 5xx responses are server failures.
pub fn classify_order_failure(err: MarketplaceApiError) -> OrderGatewayError {
    match err {
        MarketplaceApiError::QueryError { status, message } => match status {
            401 | 403 => OrderGatewayError::Unauthenticated(message),
            400 | 404 | 409 | 422 => OrderGatewayError::Validation(message),
            500..=599 => OrderGatewayError::Server { status, message },
            _ => OrderGatewayError::Other(format!("Unexpected status {status}. {message}")),
        },
        MarketplaceApiError::Transport(message) => OrderGatewayError::Transport(message),
        other => OrderGatewayError::Other(other.to_string()),
    }
}

pub fn classify_voucher_failure(code: &str, err: MarketplaceApiError) -> VoucherError {
    match err {
        MarketplaceApiError::QueryError { status, message } => match status {
            401 | 403 => VoucherError::Unauthenticated(message),
            404 | 410 => VoucherError::InvalidCode(code.to_string()),
            400 | 409 | 422 => VoucherError::NotApplicable { code: code.to_string(), reason: message },
            _ => VoucherError::Backend(format!("Error {status}. {message}")),
        },
        other => VoucherError::Backend(other.to_string()),
    }
}

#[cfg(test)]
mod test {
    use checkout_engine::traits::SubmissionFailureKind;

    use super::*;

    fn query_error(status: u16) -> MarketplaceApiError {
        MarketplaceApiError::QueryError { status, message: format!("status {status}") }
    }

    #[test]
    fn order_failures() {
        let kind = |status| classify_order_failure(query_error(status)).kind();
        assert_eq!(kind(401), SubmissionFailureKind::Unauthenticated);
        assert_eq!(kind(403), SubmissionFailureKind::Unauthenticated);
        assert_eq!(kind(422), SubmissionFailureKind::Validation);
        assert_eq!(kind(409), SubmissionFailureKind::Validation);
        assert_eq!(kind(503), SubmissionFailureKind::Server);
        assert_eq!(kind(302), SubmissionFailureKind::Other);
        let err = classify_order_failure(MarketplaceApiError::Transport("connection refused".into()));
        assert_eq!(err, OrderGatewayError::Transport("connection refused".into()));
        assert_eq!(err.kind(), SubmissionFailureKind::Other);
        let err = classify_order_failure(MarketplaceApiError::EmptyResponse);
        assert_eq!(err.kind(), SubmissionFailureKind::Other);
    }

    #[test]
    fn error_messages_come_from_the_json_body() {
        assert_eq!(error_message(r#"{"message": "Sản phẩm đã hết hàng", "code": 4221}"#), "Sản phẩm đã hết hàng");
        assert_eq!(error_message(r#"{"error": "token expired"}"#), "token expired");
        assert_eq!(error_message("<html>502 Bad Gateway</html>\n"), "<html>502 Bad Gateway</html>");
        assert_eq!(error_message(r#"{"message": ""}"#), r#"{"message": ""}"#);
        assert_eq!(error_message(r#"{"status": 500}"#), r#"{"status": 500}"#);
    }

    #[test]
    fn voucher_failures() {
        assert_eq!(classify_voucher_failure("TET", query_error(404)), VoucherError::InvalidCode("TET".into()));
        assert!(matches!(classify_voucher_failure("TET", query_error(422)), VoucherError::NotApplicable { .. }));
        assert!(matches!(classify_voucher_failure("TET", query_error(401)), VoucherError::Unauthenticated(_)));
        assert!(matches!(classify_voucher_failure("TET", query_error(500)), VoucherError::Backend(_)));
    }
}
