use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Outcome from offering a value to a [`Slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
	/// Slot was empty; the value is now pending.
	Stored,
	/// An unread value was discarded in favour of the new one.
	Replaced,
}

/// Error returned when offering to a closed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotClosed;

impl std::fmt::Display for SlotClosed {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("slot is closed")
	}
}

impl std::error::Error for SlotClosed {}

struct SlotState<T> {
	value: Option<T>,
	closed: bool,
}

struct SlotInner<T> {
	state: Mutex<SlotState<T>>,
	notify_recv: Notify,
}

/// Capacity-one mailbox with drop-oldest overflow.
///
/// Offers never wait: a value that has not been received yet is overwritten
/// by the next offer. Only the most recent value is guaranteed delivery.
pub struct Slot<T> {
	inner: Arc<SlotInner<T>>,
}

/// Producer handle. Cheap to clone; any number of producers may offer.
pub struct SlotSender<T> {
	inner: Arc<SlotInner<T>>,
}

/// Consumer handle.
pub struct SlotReceiver<T> {
	inner: Arc<SlotInner<T>>,
}

impl<T> Clone for SlotSender<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Default for Slot<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Slot<T> {
	/// Creates an empty, open slot.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(SlotInner {
				state: Mutex::new(SlotState { value: None, closed: false }),
				notify_recv: Notify::new(),
			}),
		}
	}

	/// Returns a sender handle.
	pub fn sender(&self) -> SlotSender<T> {
		SlotSender {
			inner: Arc::clone(&self.inner),
		}
	}

	/// Returns a receiver handle.
	pub fn receiver(&self) -> SlotReceiver<T> {
		SlotReceiver {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> SlotSender<T> {
	/// Stores `value`, discarding any unread predecessor. Never waits.
	pub fn offer(&self, value: T) -> Result<OfferOutcome, SlotClosed> {
		let mut state = self.inner.state.lock();
		if state.closed {
			return Err(SlotClosed);
		}
		let replaced = state.value.replace(value).is_some();
		drop(state);
		self.inner.notify_recv.notify_one();
		Ok(if replaced { OfferOutcome::Replaced } else { OfferOutcome::Stored })
	}

	/// Closes the slot. An unread value is discarded; receivers observe `None`.
	pub fn close(&self) {
		let mut state = self.inner.state.lock();
		if state.closed {
			return;
		}
		state.closed = true;
		let discarded = state.value.take().is_some();
		drop(state);
		tracing::trace!(discarded, "worker.slot.close");
		self.inner.notify_recv.notify_one();
	}

	/// Returns whether the slot has been closed.
	pub fn is_closed(&self) -> bool {
		self.inner.state.lock().closed
	}
}

impl<T> SlotReceiver<T> {
	/// Waits for the next value. Returns `None` once the slot is closed.
	pub async fn recv(&self) -> Option<T> {
		loop {
			// `notify_one` stores a permit when nobody waits, so a wakeup
			// between the check and the await is not lost.
			let notified = self.inner.notify_recv.notified();
			{
				let mut state = self.inner.state.lock();
				if let Some(value) = state.value.take() {
					return Some(value);
				}
				if state.closed {
					return None;
				}
			}
			notified.await;
		}
	}

	/// Takes the pending value without waiting.
	pub fn try_recv(&self) -> Option<T> {
		self.inner.state.lock().value.take()
	}
}
