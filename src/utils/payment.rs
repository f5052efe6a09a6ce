use crate::types::PaymentContext;
use hmac::{Hmac, Mac};
use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha512;

pub struct SendPaystackRequestPayload<'a> {
    pub route: String,
    pub body: Option<String>,
    pub expected_status_code: StatusCode,
    pub method: Method,
    pub query: Option<&'a [(&'a str, &'a str)]>,
}

#[derive(Debug)]
pub enum Error {
    RequestNotSent,
    InvalidHttpResponseStatusCode,
    FailedToDecodeResponse,
}

pub async fn send_paystack_request<'a, R: DeserializeOwned>(
    payment: &PaymentContext,
    payload: SendPaystackRequestPayload<'a>,
) -> Result<R, Error> {
    let url = format!("{}{}", payment.api_endpoint, payload.route);
    let client = reqwest::Client::new();
    let mut req = client
        .request(payload.method, url)
        .bearer_auth(&payment.secret_key)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(query) = payload.query {
        req = req.query(query);
    }

    if let Some(body) = payload.body {
        req = req.body(body);
    }

    let res = req.send().await.map_err(|err| {
        tracing::error!("Failed to send Paystack request: {}", err);
        Error::RequestNotSent
    })?;

    let http_response_status_code = res.status();

    if http_response_status_code != payload.expected_status_code {
        tracing::error!(
            "Got unexpected http response status: {}",
            http_response_status_code
        );
        return Err(Error::InvalidHttpResponseStatusCode);
    }

    let data = res.text().await.map_err(|err| {
        tracing::error!("Failed to read Paystack response body: {}", err);
        Error::FailedToDecodeResponse
    })?;

    tracing::trace!("Response received from paystack server: {}", data);

    serde_json::de::from_str::<R>(&data).map_err(|err| {
        tracing::error!("Failed to decode Paystack response: {}", err);
        Error::FailedToDecodeResponse
    })
}

#[derive(Serialize)]
pub struct InitializeTransactionPayload<M: Serialize> {
    pub email: String,
    /// Minor units.
    pub amount: i64,
    pub reference: String,
    pub metadata: M,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Deserialize)]
struct InitializeTransactionResponse {
    status: bool,
    data: InitializedTransaction,
}

pub async fn initialize_transaction<M: Serialize>(
    payment: &PaymentContext,
    payload: InitializeTransactionPayload<M>,
) -> Result<InitializedTransaction, Error> {
    let body = serde_json::to_string(&payload).map_err(|err| {
        tracing::error!("Failed to encode transaction payload: {}", err);
        Error::RequestNotSent
    })?;

    let res = send_paystack_request::<InitializeTransactionResponse>(
        payment,
        SendPaystackRequestPayload {
            route: String::from("/transaction/initialize"),
            body: Some(body),
            expected_status_code: StatusCode::OK,
            method: Method::POST,
            query: None,
        },
    )
    .await?;

    if !res.status {
        tracing::error!(
            "Paystack refused to initialize transaction {}",
            payload.reference
        );
        return Err(Error::InvalidHttpResponseStatusCode);
    }

    Ok(res.data)
}

/// Checks `signature` (hex) against the HMAC-SHA512 of `body` keyed with `secret_key`.
pub fn verify_signature(secret_key: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };

    let Ok(mut mac) = Hmac::<Sha512>::new_from_slice(secret_key.as_bytes()) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

pub fn sign(secret_key: &str, body: &[u8]) -> Option<String> {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret_key.as_bytes()).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn payment_context(api_endpoint: String) -> PaymentContext {
        PaymentContext {
            api_endpoint,
            secret_key: "sk_test_secret".to_string(),
            callback_url: None,
        }
    }

    #[test]
    fn signatures_verify_only_for_the_signed_body() {
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign("sk_test_secret", body).unwrap();

        assert!(verify_signature("sk_test_secret", &signature, body));
        assert!(!verify_signature("sk_other", &signature, body));
        assert!(!verify_signature(
            "sk_test_secret",
            &signature,
            br#"{"event":"charge.failed"}"#
        ));
        assert!(!verify_signature("sk_test_secret", "zz-not-hex", body));
    }

    #[tokio::test]
    async fn initialize_transaction_returns_the_authorization_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transaction/initialize"))
            .and(header("authorization", "Bearer sk_test_secret"))
            .and(body_partial_json(json!({
                "email": "ada@example.com",
                "amount": 250000,
                "reference": "ref-1",
                "metadata": { "order_id": "order-1" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Authorization URL created",
                "data": {
                    "authorization_url": "https://checkout.example/abc",
                    "access_code": "abc",
                    "reference": "ref-1"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let initialized = initialize_transaction(
            &payment_context(server.uri()),
            InitializeTransactionPayload {
                email: "ada@example.com".to_string(),
                amount: 250000,
                reference: "ref-1".to_string(),
                metadata: json!({ "order_id": "order-1" }),
                callback_url: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(
            initialized.authorization_url,
            "https://checkout.example/abc"
        );
        assert_eq!(initialized.reference, "ref-1");
    }

    #[tokio::test]
    async fn unexpected_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transaction/initialize"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": false,
                "message": "Invalid key"
            })))
            .mount(&server)
            .await;

        let result = initialize_transaction(
            &payment_context(server.uri()),
            InitializeTransactionPayload {
                email: "ada@example.com".to_string(),
                amount: 100,
                reference: "ref-2".to_string(),
                metadata: json!({}),
                callback_url: None,
            },
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidHttpResponseStatusCode)));
    }
}
