use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

use crate::model::id::BookingId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandle {
    pub payment_id: String,
    pub redirect_url: String,
}

/// External payment step invoked while a reservation is being made.
///
/// Failures must be reported as `AppError::UpstreamError`; the caller rolls
/// the reservation back.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate_payment(&self, booking_id: BookingId, amount: Decimal)
        -> AppResult<PaymentHandle>;
}
