//! Byte counts to progress percentages.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use voxagent_core::ProgressFn;

/// `sent / total` as a rounded percentage clamped to 0..=100.
/// An empty transfer counts as complete.
pub fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (sent as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Progress callback forwarding increasing percentages over a channel.
///
/// The transfer calls this synchronously from inside the request body, so
/// the job collection is updated by whoever drains the receiver.
pub fn forwarding_progress(sender: UnboundedSender<u8>) -> ProgressFn {
    let last_sent = Arc::new(AtomicU8::new(0));
    Arc::new(move |sent, total| {
        let percent = percent_of(sent, total);
        if last_sent.fetch_max(percent, Ordering::AcqRel) < percent {
            // Receiver gone means the job sequence already finished.
            let _ = sender.send(percent);
        }
    })
}
