//! Thin typed client over the gateway's REST endpoints.
//!
//! Business rules live server-side; this module only shapes requests and
//! decodes responses. Money movement attaches a fresh `Idempotency-Key` so
//! the payment service can deduplicate a retried submission.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::pipeline::Pipeline;
use crate::request::Request;

/// Header consumed by the payment service to deduplicate retried transfers.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Base URLs of the services reached through the gateway.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub account_base: String,
    pub payment_base: String,
}

/// An internal transfer submission.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOrder {
    pub customer_id: u64,
    pub from_account: String,
    pub to_account: String,
    pub amount: f64,
    pub currency: String,
}

/// The payment service's acknowledgement of a transfer.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub status: String,
}

/// Typed gateway calls, all routed through one [`Pipeline`].
pub struct Gateway {
    pipeline: Pipeline,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(pipeline: Pipeline, config: GatewayConfig) -> Self {
        Self { pipeline, config }
    }

    /// Current balance of an account.
    pub async fn balance(&self, account: &str) -> Result<f64, Error> {
        let url = format!("{}/api/v1/accounts/{account}/balance", self.config.account_base);
        self.pipeline.send(Request::get(url)).await?.json()
    }

    /// Submits an internal transfer. Each submission carries its own
    /// idempotency key — retrying after a timeout means calling this again,
    /// and the backend decides whether it already executed.
    pub async fn internal_transfer(&self, order: &TransferOrder) -> Result<PaymentReceipt, Error> {
        let url = format!("{}/api/v1/payments/internal-transfer", self.config.payment_base);
        let req = Request::post(url)
            .json(serde_json::to_vec(order)?)
            .header(IDEMPOTENCY_HEADER, Uuid::new_v4().to_string());
        self.pipeline.send(req).await?.json()
    }

    /// Current status of a previously submitted payment.
    pub async fn payment_status(&self, payment_id: &str) -> Result<String, Error> {
        let url = format!("{}/api/v1/payments/{payment_id}/status", self.config.payment_base);
        Ok(self.pipeline.send(Request::get(url)).await?.text())
    }
}
