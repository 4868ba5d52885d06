//! Invoice calculation and reconciliation engine.
//!
//! This crate turns a family's enrollment snapshot into a billing statement,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//!
//! ```text
//! token ──locator──▶ family id
//! family + students + catalog + settings ──fees──▶ FeeSchedule
//! FeeSchedule + adjustments + payments ──reconcile──▶ InvoiceResult
//! ```

pub mod engine;
pub mod fees;
pub mod invoice;
pub mod locator;
pub mod reconcile;

pub use engine::{InvoiceInputs, InvoiceOptions, calculate_invoice};
pub use fees::{FeeSchedule, compute_line_items};
pub use invoice::{InvoiceResult, LineItem, LineItemKind, PaymentStatus, SurchargeQuote};
pub use locator::{FamilyToken, TokenIndex, hash_for_family, resolve};
pub use reconcile::reconcile;
