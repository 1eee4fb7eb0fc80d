use crate::domain::catalog::{ItemKind, MenuItem};
use crate::domain::money::{UnitPrice, round2};
use crate::domain::order::PaymentMethod;
use crate::error::{CoreError, Result};
use rust_decimal::Decimal;

/// The catalog item a draft was built from, denormalized so the ordering
/// screen needs no further catalog reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSelection {
    pub item_id: i64,
    pub item_type: ItemKind,
    pub item_name: String,
    pub unit_price: UnitPrice,
    pub image_url: Option<String>,
    pub hotel_id: i64,
    pub hotel_name: Option<String>,
}

impl ItemSelection {
    pub fn from_menu_item(item: &MenuItem, hotel_name: Option<String>) -> Self {
        Self {
            item_id: item.id(),
            item_type: item.kind(),
            item_name: item.name().to_string(),
            unit_price: item.unit_price(),
            image_url: item.image_url().map(str::to_string),
            hotel_id: item.hotel_id(),
            hotel_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    Drafting,
    Submitting,
    Completed,
    HandedOff,
}

/// User-editable payment details for the online path. `amount` tracks the
/// computed total as a 2-decimal string until the user edits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentForm {
    pub email: String,
    pub amount: String,
    pub currency: String,
}

/// Issued by [`OrderDraft::begin_submit`]; must be presented back to apply
/// the submission outcome. Tickets from a superseded draft generation are
/// ignored, so a completion arriving after the screen moved on cannot
/// corrupt the current draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

const DEFAULT_CURRENCY: &str = "NGN";

/// One in-memory, pre-submission order. Quantity starts at 1 and is clamped
/// there on decrement; the total is always recomputed from unit price and
/// quantity, never read from a stored field.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    item: ItemSelection,
    quantity: u32,
    payment_method: PaymentMethod,
    form: PaymentForm,
    phase: DraftPhase,
    generation: u64,
}

impl OrderDraft {
    pub fn new(item: ItemSelection, email: Option<&str>, currency: Option<&str>) -> Self {
        let mut draft = Self {
            item,
            quantity: 1,
            payment_method: PaymentMethod::Arrival,
            form: PaymentForm {
                email: email.unwrap_or_default().to_string(),
                amount: String::new(),
                currency: currency.unwrap_or(DEFAULT_CURRENCY).to_string(),
            },
            phase: DraftPhase::Drafting,
            generation: 0,
        };
        draft.sync_amount();
        draft
    }

    pub fn item(&self) -> &ItemSelection {
        &self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn form(&self) -> &PaymentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PaymentForm {
        &mut self.form
    }

    /// Total price for display and persistence: unit price times quantity,
    /// rounded to 2 decimal places.
    pub fn total(&self) -> Decimal {
        round2(self.item.unit_price.value() * Decimal::from(self.quantity))
    }

    pub fn increment(&mut self) {
        if self.phase == DraftPhase::Drafting {
            self.quantity += 1;
            self.sync_amount();
        }
    }

    /// Decrementing at quantity 1 is a no-op.
    pub fn decrement(&mut self) {
        if self.phase == DraftPhase::Drafting && self.quantity > 1 {
            self.quantity -= 1;
            self.sync_amount();
        }
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        if self.phase == DraftPhase::Drafting {
            self.payment_method = method;
        }
    }

    /// Starts a submission. Rejected while another submission is in flight
    /// or once the draft reached a terminal phase.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket> {
        match self.phase {
            DraftPhase::Drafting => {
                self.phase = DraftPhase::Submitting;
                Ok(SubmitTicket {
                    generation: self.generation,
                })
            }
            DraftPhase::Submitting => Err(CoreError::Validation(
                "a submission is already in flight".to_string(),
            )),
            DraftPhase::Completed | DraftPhase::HandedOff => Err(CoreError::Validation(
                "this order has already been submitted".to_string(),
            )),
        }
    }

    /// The submission succeeded; the draft is finished.
    pub fn complete(&mut self, ticket: SubmitTicket) {
        if self.accepts(ticket) {
            self.phase = DraftPhase::Completed;
        }
    }

    /// The submission failed; back to drafting with all input intact.
    pub fn fail(&mut self, ticket: SubmitTicket) {
        if self.accepts(ticket) {
            self.phase = DraftPhase::Drafting;
        }
    }

    /// Control moved to the external checkout; the draft is finished.
    pub fn hand_off(&mut self, ticket: SubmitTicket) {
        if self.accepts(ticket) {
            self.phase = DraftPhase::HandedOff;
        }
    }

    /// Starts over with a new item. Any outstanding ticket goes stale.
    pub fn reset(&mut self, item: ItemSelection) {
        self.generation += 1;
        self.item = item;
        self.quantity = 1;
        self.payment_method = PaymentMethod::Arrival;
        self.phase = DraftPhase::Drafting;
        self.sync_amount();
    }

    fn accepts(&self, ticket: SubmitTicket) -> bool {
        self.phase == DraftPhase::Submitting && ticket.generation == self.generation
    }

    fn sync_amount(&mut self) {
        self.form.amount = format!("{:.2}", self.total());
    }
}
