//! Async task primitives shared by latest-wins request pipelines.
//!
//! * [`Slot`] is a single-value mailbox where a newer message replaces an
//!   unread older one, so producers never block and memory never grows.
//! * [`GenerationToken`] pairs a generation number with a cancellation token
//!   so superseded work can be abandoned by generation.
//! * [`spawn`] routes task creation through one place with a [`TaskClass`]
//!   attached for tracing.

mod class;
mod slot;
mod spawn;
mod token;

pub use class::TaskClass;
pub use slot::{OfferOutcome, Slot, SlotClosed, SlotReceiver, SlotSender};
pub use spawn::spawn;
pub use token::GenerationToken;
