//! Command senders: the actors that issue commands and receive replies.
//!
//! The engine treats a sender as opaque apart from its name and the ability
//! to receive text. Two implementations ship with the crate:
//! [`ChannelSender`] forwards replies into an mpsc channel drained by the
//! host's writer, [`CapturingSender`] buffers them in memory.

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// An actor that issues commands and receives feedback.
pub trait CommandSender: Send + Sync {
    /// Display name, used in logs and by handlers.
    fn name(&self) -> &str;

    /// Deliver one line of feedback to the sender.
    fn send_message(&self, text: &str);
}

/// Sender that forwards every reply into an unbounded channel.
pub struct ChannelSender {
    name: String,
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSender {
    pub fn new(name: impl Into<String>, tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            name: name.into(),
            tx,
        }
    }
}

impl CommandSender for ChannelSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, text: &str) {
        if self.tx.send(text.to_string()).is_err() {
            tracing::warn!(sender = %self.name, "Reply dropped: output channel closed");
        }
    }
}

/// Sender that buffers every reply for later inspection.
pub struct CapturingSender {
    name: String,
    buf: Mutex<Vec<String>>,
}

impl CapturingSender {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buf: Mutex::new(Vec::new()),
        }
    }

    /// Copy of every reply received so far.
    pub fn messages(&self) -> Vec<String> {
        self.buf.lock().clone()
    }

    /// Drain the buffered replies.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.buf.lock())
    }
}

impl CommandSender for CapturingSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, text: &str) {
        self.buf.lock().push(text.to_string());
    }
}
