use core::net::Ipv4Addr;
use std::collections::BTreeMap;

/// Key of a followed TCP flow, normalized so the side that sent the
/// initial SYN is the client.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TcpStreamId {
    pub client_addr: Ipv4Addr,
    pub server_addr: Ipv4Addr,
    pub client_port: u16,
    pub server_port: u16,
}

/// Per direction reassembly state.
#[derive(Clone, Debug, Default)]
pub(crate) struct StreamDirection {
    /// Initial sequence number (of the SYN).
    init_seq: u32,
    /// Contiguous payload received so far (append only).
    payload: Vec<u8>,
    /// Segments ahead of the contiguous payload, keyed by their
    /// sequence offset relative to `init_seq`.
    pending: BTreeMap<u32, Vec<u8>>,
}

impl StreamDirection {
    pub(crate) fn start(&mut self, init_seq: u32) {
        self.init_seq = init_seq;
        self.payload.clear();
        self.pending.clear();
    }

    /// Relative offset of the next byte the direction waits for (the
    /// SYN consumes sequence number `init_seq`).
    fn next_rel(&self) -> u32 {
        1 + self.payload.len() as u32
    }

    /// Feeds a data segment. Returns true if the contiguous payload
    /// grew.
    pub(crate) fn add_segment(&mut self, seq: u32, data: &[u8]) -> bool {
        if data.is_empty() {
            return false;
        }
        let rel = seq.wrapping_sub(self.init_seq);
        let next = self.next_rel();
        let end = rel.wrapping_add(data.len() as u32);

        if rel == next {
            self.payload.extend_from_slice(data);
        } else if end.wrapping_sub(next) as i32 <= 0 {
            // entirely before the contiguous payload
            return false;
        } else if (rel.wrapping_sub(next) as i32) < 0 {
            // overlaps the already received payload; the earlier bytes win
            self.payload
                .extend_from_slice(&data[next.wrapping_sub(rel) as usize..]);
        } else {
            // ahead of the payload, hold it (first writer wins)
            self.pending.entry(rel).or_insert_with(|| data.to_vec());
            return false;
        }

        // the payload grew, drain everything that became contiguous
        loop {
            let (&rel, _) = match self.pending.first_key_value() {
                Some(entry) => entry,
                None => break,
            };
            let next = self.next_rel();
            let buffered = if (rel.wrapping_sub(next) as i32) <= 0 {
                self.pending.remove(&rel).unwrap()
            } else {
                break;
            };
            let end = rel.wrapping_add(buffered.len() as u32);
            if (end.wrapping_sub(next) as i32) > 0 {
                self.payload
                    .extend_from_slice(&buffered[next.wrapping_sub(rel) as usize..]);
            }
        }
        true
    }

    #[inline]
    pub(crate) fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// A followed TCP flow: both directions' reconstructed payloads.
#[derive(Clone, Debug)]
pub struct TcpStream {
    pub(crate) id: TcpStreamId,
    pub(crate) client: StreamDirection,
    pub(crate) server: StreamDirection,
    pub(crate) syn_ack_seen: bool,
    pub(crate) finished: bool,
}

impl TcpStream {
    pub(crate) fn new(id: TcpStreamId, client_init_seq: u32) -> TcpStream {
        let mut client = StreamDirection::default();
        client.start(client_init_seq);
        TcpStream {
            id,
            client,
            server: StreamDirection::default(),
            syn_ack_seen: false,
            finished: false,
        }
    }

    #[inline]
    pub fn id(&self) -> &TcpStreamId {
        &self.id
    }

    /// Contiguous bytes sent by the client so far (append only).
    #[inline]
    pub fn client_payload(&self) -> &[u8] {
        self.client.payload()
    }

    /// Contiguous bytes sent by the server so far (append only).
    #[inline]
    pub fn server_payload(&self) -> &[u8] {
        self.server.payload()
    }

    /// True once a FIN was seen in either direction.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn direction() -> StreamDirection {
        let mut dir = StreamDirection::default();
        dir.start(1000);
        dir
    }

    #[test]
    fn in_order_growth() {
        let mut dir = direction();
        assert!(dir.add_segment(1001, b"hello "));
        assert!(dir.add_segment(1007, b"world"));
        assert_eq!(b"hello world", dir.payload());
    }

    #[test]
    fn out_of_order_is_held() {
        let mut dir = direction();
        assert!(!dir.add_segment(1007, b"world"));
        assert_eq!(b"", dir.payload());
        assert!(dir.add_segment(1001, b"hello "));
        assert_eq!(b"hello world", dir.payload());
    }

    #[test]
    fn old_data_is_dropped() {
        let mut dir = direction();
        dir.add_segment(1001, b"abcdef");
        // a full retransmission changes nothing
        assert!(!dir.add_segment(1001, b"abcdef"));
        assert_eq!(b"abcdef", dir.payload());
    }

    #[test]
    fn overlap_first_writer_wins() {
        let mut dir = direction();
        dir.add_segment(1001, b"abcd");
        // overlapping retransmission with different bytes: only the
        // tail past the received payload is appended
        assert!(dir.add_segment(1003, b"XXef"));
        assert_eq!(b"abcdef", dir.payload());
    }

    #[test]
    fn sequence_wraparound() {
        let mut dir = StreamDirection::default();
        dir.start(u32::MAX - 2);
        assert!(dir.add_segment(u32::MAX - 1, b"ab"));
        // the next expected sequence wrapped around to 0
        assert!(dir.add_segment(0, b"cd"));
        assert_eq!(b"abcd", dir.payload());
    }

    #[test]
    fn held_overlap_is_trimmed_when_drained() {
        let mut dir = direction();
        assert!(!dir.add_segment(1005, b"efgh"));
        assert!(dir.add_segment(1001, b"abcdXX"));
        // buffered segment starts before the new payload end; only the
        // missing tail is taken
        assert_eq!(b"abcdXXgh", dir.payload());
    }
}
