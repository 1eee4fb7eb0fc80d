use crate::domain::checkout::{CheckoutOutcome, CheckoutRequest};
use crate::domain::ports::PaymentGatewayBox;
use crate::error::Result;
use tracing::{info, warn};

/// Payment redirect workflow: prepares a validated request and forwards it
/// to the external checkout. Every outcome, including a processor error,
/// returns control to the caller.
pub struct CheckoutService {
    gateway: PaymentGatewayBox,
}

impl CheckoutService {
    pub fn new(gateway: PaymentGatewayBox) -> Self {
        Self { gateway }
    }

    pub async fn initiate(&self, request: &CheckoutRequest) -> Result<CheckoutOutcome> {
        let prepared = request.prepare();
        info!(
            reference = %prepared.reference,
            amount_minor = prepared.amount_minor,
            currency = %prepared.currency,
            "starting checkout"
        );

        let outcome = self.gateway.checkout(prepared).await?;
        match &outcome {
            CheckoutOutcome::Success { transaction_ref } => {
                info!(reference = %transaction_ref, "checkout succeeded");
            }
            CheckoutOutcome::Cancelled => info!("checkout cancelled by user"),
            CheckoutOutcome::Failed { message } => {
                warn!(%message, "checkout reported an error");
            }
        }
        Ok(outcome)
    }
}
