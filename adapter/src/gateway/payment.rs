use async_trait::async_trait;
use kernel::{
    gateway::{PaymentGateway, PaymentHandle},
    model::id::BookingId,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    config::PaymentConfig,
    error::{AppError, AppResult},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiatePaymentRequest {
    booking_id: BookingId,
    amount: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitiatePaymentResponse {
    payment_id: String,
    redirect_url: String,
}

pub struct HttpPaymentGateway {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(cfg: &PaymentConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| AppError::UpstreamError(format!("payment client setup failed: {e}")))?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate_payment(
        &self,
        booking_id: BookingId,
        amount: Decimal,
    ) -> AppResult<PaymentHandle> {
        let mut req = self
            .client
            .post(format!("{}/payments", self.endpoint))
            .json(&InitiatePaymentRequest { booking_id, amount });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("payment gateway unreachable: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(%booking_id, %status, body, "payment gateway rejected the request");
            return Err(AppError::UpstreamError(format!(
                "payment gateway rejected the request with {status}"
            )));
        }

        let InitiatePaymentResponse {
            payment_id,
            redirect_url,
        } = res
            .json()
            .await
            .map_err(|e| AppError::UpstreamError(format!("malformed payment gateway reply: {e}")))?;

        tracing::info!(%booking_id, payment_id, "payment initiated");
        Ok(PaymentHandle {
            payment_id,
            redirect_url,
        })
    }
}
