use core::net::IpAddr;

use crate::err::CaptureError;
use crate::Pdu;

/// Transport for sending crafted packets & polling for their
/// responses.
///
/// The crate defines only the seam; raw socket backends implement it
/// externally. `recv` implementations are expected to test candidate
/// buffers with [`Pdu::matches_response`] on the given chain.
pub trait PacketSender {
    /// Sends a serialized link layer frame out of the given interface.
    fn send_l2(&mut self, interface: &str, data: &[u8]) -> Result<(), CaptureError>;

    /// Sends a serialized network layer packet to the given address
    /// (the OS picks the route & link layer).
    fn send_l3(&mut self, data: &[u8], destination: IpAddr) -> Result<(), CaptureError>;

    /// Waits up to `timeout_ms` for a frame that is a response to
    /// `chain`. Returns the raw frame bytes, or `None` on timeout.
    fn recv(&mut self, chain: &Pdu, timeout_ms: u64) -> Result<Option<Vec<u8>>, CaptureError>;
}
