use stellarlink_shared::OutboundMessage;

/// Capability for handing messages to the relay server.
///
/// Queueing, serialization and transport live behind this trait; the sync
/// layer only decides *what* to send and *when*. Sends are fire-and-forget.
pub trait MessageSender {
    fn send(&mut self, message: OutboundMessage);
}
