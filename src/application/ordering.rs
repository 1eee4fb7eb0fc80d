use crate::domain::checkout::{CheckoutOutcome, CheckoutRequest};
use crate::domain::draft::OrderDraft;
use crate::domain::identity::Identity;
use crate::domain::order::{NewOrder, Order, OrderStatus, PaymentMethod};
use crate::domain::ports::OrderStoreBox;
use crate::error::Result;
use tracing::{info, warn};
use uuid::Uuid;

/// What a submission produced.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Pay-on-arrival: the order row is already persisted.
    Placed(Order),
    /// Online: control moves to the external checkout; the order row is
    /// recorded by [`OrderingService::record_checkout`] once the outcome
    /// is known.
    CheckoutRequired(PendingOnlineOrder),
}

/// An online order whose checkout outcome is still pending.
#[derive(Debug, Clone)]
pub struct PendingOnlineOrder {
    pub order: NewOrder,
    pub request: CheckoutRequest,
}

/// Order composition workflow: turns a draft into a persisted order row or
/// a checkout handoff.
pub struct OrderingService {
    orders: OrderStoreBox,
}

impl OrderingService {
    pub fn new(orders: OrderStoreBox) -> Self {
        Self { orders }
    }

    /// Submits the draft. The draft's ticket serializes submissions, so a
    /// second tap while one is in flight is rejected before any network
    /// call. On a transport failure the draft returns to drafting with all
    /// input intact and the backend message propagates unchanged.
    pub async fn submit(
        &self,
        identity: &Identity,
        draft: &mut OrderDraft,
    ) -> Result<SubmitOutcome> {
        let ticket = draft.begin_submit()?;

        let order = NewOrder {
            customer_id: identity.id,
            hotel_id: draft.item().hotel_id,
            item_id: draft.item().item_id,
            item_type: draft.item().item_type,
            quantity: draft.quantity(),
            total_price: draft.total(),
            status: OrderStatus::Pending,
            payment_method: draft.payment_method(),
        };

        match draft.payment_method() {
            PaymentMethod::Arrival => match self.orders.insert(order).await {
                Ok(placed) => {
                    draft.complete(ticket);
                    info!(
                        order = %placed.id,
                        item = %placed.item_type,
                        quantity = placed.quantity,
                        total = %placed.total_price,
                        "order placed for payment on arrival"
                    );
                    Ok(SubmitOutcome::Placed(placed))
                }
                Err(e) => {
                    draft.fail(ticket);
                    warn!(error = %e, "order insert failed");
                    Err(e)
                }
            },
            PaymentMethod::Online => {
                let request = match CheckoutRequest::from_form(draft.form()) {
                    Ok(request) => request,
                    Err(e) => {
                        draft.fail(ticket);
                        return Err(e);
                    }
                };
                draft.hand_off(ticket);
                info!(amount_minor = request.amount_minor(), "handing off to checkout");
                Ok(SubmitOutcome::CheckoutRequired(PendingOnlineOrder {
                    order,
                    request,
                }))
            }
        }
    }

    /// Records the durable order row for an online payment once its
    /// checkout outcome is known. Only a successful checkout produces a
    /// row; a cancelled or failed one leaves nothing behind.
    pub async fn record_checkout(
        &self,
        pending: PendingOnlineOrder,
        outcome: &CheckoutOutcome,
    ) -> Result<Option<Order>> {
        match outcome {
            CheckoutOutcome::Success { transaction_ref } => {
                let placed = self.orders.insert(pending.order).await?;
                info!(
                    order = %placed.id,
                    reference = %transaction_ref,
                    "online payment confirmed, order recorded"
                );
                Ok(Some(placed))
            }
            CheckoutOutcome::Cancelled => {
                info!("checkout cancelled, no order recorded");
                Ok(None)
            }
            CheckoutOutcome::Failed { message } => {
                warn!(%message, "checkout failed, no order recorded");
                Ok(None)
            }
        }
    }

    /// The customer's orders, newest first.
    pub async fn history(&self, identity: &Identity) -> Result<Vec<Order>> {
        self.orders.list_for_customer(identity.id).await
    }

    /// Cancels one of the customer's orders while it is still pending.
    /// Returns false when the order was already confirmed, delivered or
    /// cancelled.
    pub async fn cancel(&self, identity: &Identity, order_id: Uuid) -> Result<bool> {
        let cancelled = self.orders.cancel_pending(order_id, identity.id).await?;
        if cancelled {
            info!(order = %order_id, "order cancelled");
        } else {
            warn!(order = %order_id, "order no longer pending, cancel refused");
        }
        Ok(cancelled)
    }
}
