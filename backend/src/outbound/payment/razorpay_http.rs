//! Reqwest-backed Razorpay orders adapter.
//!
//! This adapter owns transport details only: basic-auth credentials, request
//! serialisation, timeout and HTTP error mapping, and JSON decoding into
//! [`GatewayOrder`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{CreateOrderDto, ErrorEnvelopeDto, OrderDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{GatewayOrder, OrderRequest};

/// Public API root.
pub const DEFAULT_RAZORPAY_BASE_URL: &str = "https://api.razorpay.com/v1/";

/// API key pair. The secret is wiped from memory on drop.
#[derive(Clone)]
pub struct RazorpayCredentials {
    key_id: String,
    key_secret: Zeroizing<String>,
}

impl RazorpayCredentials {
    /// Wrap a key id and secret.
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: Zeroizing::new(key_secret.into()),
        }
    }

    /// Public key id, also handed to browsers for the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl std::fmt::Debug for RazorpayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayCredentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

/// Gateway adapter performing HTTP calls against the Razorpay orders API.
pub struct RazorpayHttpGateway {
    client: Client,
    base_url: Url,
    credentials: RazorpayCredentials,
}

impl RazorpayHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// `base_url` must end with a slash so relative paths resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        credentials: RazorpayCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentGatewayError> {
        self.base_url
            .join(path)
            .map_err(|err| PaymentGatewayError::invalid_request(format!("bad gateway URL: {err}")))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        let response = request
            .basic_auth(
                self.credentials.key_id.as_str(),
                Some(self.credentials.key_secret.as_str()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_order(body.as_ref())
    }
}

#[async_trait]
impl PaymentGateway for RazorpayHttpGateway {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        let url = self.endpoint("orders")?;
        let order = self
            .send(self.client.post(url).json(&CreateOrderDto::from(request)))
            .await?;
        debug!(order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentGatewayError> {
        validate_order_id(order_id)?;
        let url = self.endpoint(&format!("orders/{order_id}"))?;
        self.send(self.client.get(url)).await
    }
}

/// Order ids are interpolated into the request path, so only the characters
/// the gateway issues are accepted.
fn validate_order_id(order_id: &str) -> Result<(), PaymentGatewayError> {
    let valid = !order_id.is_empty()
        && order_id.len() <= 64
        && order_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PaymentGatewayError::invalid_request(
            "order id must be alphanumeric",
        ))
    }
}

fn parse_order(body: &[u8]) -> Result<GatewayOrder, PaymentGatewayError> {
    let decoded: OrderDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid order payload: {error}"))
    })?;
    Ok(decoded.into())
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let detail = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| {
            let code = envelope.error.code.unwrap_or_default();
            envelope
                .error
                .description
                .map(|description| format!("{code} {description}").trim().to_owned())
        })
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => PaymentGatewayError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_client_error() => PaymentGatewayError::invalid_request(message),
        _ => PaymentGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Razorpay mapping helpers.

    use super::*;
    use crate::domain::OrderStatus;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "InvalidRequest")]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "InvalidRequest")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"upstream unavailable");
        let matched = match expected {
            "RateLimited" => matches!(error, PaymentGatewayError::RateLimited { .. }),
            "Timeout" => matches!(error, PaymentGatewayError::Timeout { .. }),
            "InvalidRequest" => matches!(error, PaymentGatewayError::InvalidRequest { .. }),
            "Transport" => matches!(error, PaymentGatewayError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[test]
    fn error_envelope_description_is_surfaced() {
        let body = br#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The id provided does not exist"}}"#;
        let error = map_status_error(StatusCode::BAD_REQUEST, body);
        assert!(
            error
                .to_string()
                .contains("BAD_REQUEST_ERROR The id provided does not exist"),
            "{error}"
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn parses_order_entity() {
        let body = r#"{
            "id": "order_IluGWxBm9U8zJ8",
            "entity": "order",
            "amount": 49900,
            "amount_paid": 49900,
            "amount_due": 0,
            "currency": "INR",
            "receipt": "6c1f0b3e-2a51-4b8e-9b0e-1f3f5a7d9c21",
            "status": "paid",
            "attempts": 1,
            "notes": [],
            "created_at": 1642662092
        }"#;
        let order = parse_order(body.as_bytes()).expect("order decodes");
        assert_eq!(order.id, "order_IluGWxBm9U8zJ8");
        assert_eq!(order.amount, 49_900);
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.payer, None);
    }

    #[test]
    fn payer_is_read_from_order_notes() {
        let body = r#"{"id":"order_2","amount":100,"currency":"INR","receipt":"r","status":"created","notes":{"user_id":"0e3c5b2a-7d11-4f0e-9a55-3c1f2b9d8e70"}}"#;
        let order = parse_order(body.as_bytes()).expect("order decodes");
        assert_eq!(
            order.payer.as_deref(),
            Some("0e3c5b2a-7d11-4f0e-9a55-3c1f2b9d8e70")
        );
    }

    #[test]
    fn create_body_carries_payer_note() {
        let payer = crate::domain::UserId::random();
        let request = crate::domain::OrderRequest::for_course(
            &crate::domain::CourseId::random(),
            crate::domain::Price::new(10),
            &payer,
        );
        let body = serde_json::to_value(CreateOrderDto::from(&request)).expect("serialises");
        assert_eq!(body["notes"]["user_id"], payer.as_uuid().to_string());
        assert_eq!(body["amount"], 1_000);
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let body = r#"{"id":"order_1","amount":1,"currency":"INR","receipt":null,"status":"refunded"}"#;
        let error = parse_order(body.as_bytes()).expect_err("unknown status");
        assert!(matches!(error, PaymentGatewayError::Decode { .. }));
    }

    #[rstest]
    #[case("order_Abc123", true)]
    #[case("", false)]
    #[case("../payments", false)]
    #[case("order?id=1", false)]
    fn order_ids_are_validated(#[case] id: &str, #[case] valid: bool) {
        assert_eq!(validate_order_id(id).is_ok(), valid);
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let credentials = RazorpayCredentials::new("rzp_test_key", "top-secret");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("rzp_test_key"));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn endpoints_resolve_beneath_base_url() {
        let gateway = RazorpayHttpGateway::new(
            Url::parse(DEFAULT_RAZORPAY_BASE_URL).expect("base URL"),
            RazorpayCredentials::new("id", "secret"),
            Duration::from_secs(5),
        )
        .expect("client builds");
        let url = gateway.endpoint("orders/order_1").expect("joined");
        assert_eq!(url.as_str(), "https://api.razorpay.com/v1/orders/order_1");
    }
}
