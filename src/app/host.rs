//! Signaling between the widget and its host: outbound lifecycle events and
//! inbound pause/play control.

/// Outbound, fire-and-forget notifications to the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Emitted once, after the widget initialized and started rendering.
    Playing,
    /// Emitted on every applied surface resize.
    Resized { width: u32, height: u32 },
}

/// Inbound control from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Stop requesting further frames.
    Pause,
    /// Resume the frame loop.
    Play,
}

/// Outbound notification port. Sends are advisory only: a failed or
/// disconnected receiver must never interrupt the render loop, so
/// `try_send` has no error to propagate.
pub trait HostNotifier {
    fn try_send(&self, event: HostEvent);
}

/// Sends host events over a flume channel, swallowing send failures.
pub struct ChannelNotifier {
    sender: flume::Sender<HostEvent>,
}

impl ChannelNotifier {
    /// Builds a notifier plus the receiver the host listens on.
    #[must_use]
    pub fn new() -> (Self, flume::Receiver<HostEvent>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }
}

impl HostNotifier for ChannelNotifier {
    fn try_send(&self, event: HostEvent) {
        // A gone host is not an error; the widget keeps rendering.
        let _ = self.sender.try_send(event);
    }
}

/// Notifier for embeddings without a host listening.
pub struct NullNotifier;

impl HostNotifier for NullNotifier {
    fn try_send(&self, _event: HostEvent) {}
}
