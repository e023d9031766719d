use crate::domain::models::payment::Payment;
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// Thin wrapper over the hosted payment provider. Charges are authorized at
/// booking time by the provider's frontend SDK; this service only captures
/// and refunds against the amounts we recorded.
pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    async fn post(&self, path: &str, body: &ChargePayload) -> Result<Value, AppError> {
        let res = self.client.post(format!("{}/{}", self.api_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment provider connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment provider failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        res.json().await.map_err(|e| {
            error!("Payment provider returned malformed JSON: {}", e);
            AppError::Internal
        })
    }
}

#[derive(Serialize)]
struct ChargePayload {
    payment_id: String,
    amount_cents: i64,
    currency: String,
}

impl ChargePayload {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id.clone(),
            amount_cents: payment.amount_cents,
            currency: "USD".to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn capture(&self, payment: &Payment) -> Result<String, AppError> {
        let body = self.post("capture", &ChargePayload::from(payment)).await?;
        body.get("charge_ref")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or(AppError::InternalWithMsg("Payment provider response missing charge_ref".to_string()))
    }

    async fn refund(&self, payment: &Payment) -> Result<(), AppError> {
        self.post("refund", &ChargePayload::from(payment)).await?;
        Ok(())
    }
}
