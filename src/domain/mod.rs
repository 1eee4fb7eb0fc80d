//! Typed records, value objects and the outbound ports used by the
//! workflow layer. Rows coming back from the remote backend are converted
//! into these types at the gateway boundary; nothing duck-typed crosses it.

pub mod catalog;
pub mod checkout;
pub mod draft;
pub mod identity;
pub mod locale;
pub mod money;
pub mod order;
pub mod ports;
pub mod profile;
