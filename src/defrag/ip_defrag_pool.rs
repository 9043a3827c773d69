use std::collections::HashMap;

use crate::defrag::{IpDefragBuf, IpDefragError, IpFragId};
use crate::{dispatch, AnyLayer, IpFragOffset, LayerType, Pdu};

/// State of one packet being reconstructed.
#[derive(Clone, Debug)]
struct IpDefragStream {
    buf: IpDefragBuf,
    /// Header of the zero offset fragment (used for the reassembled
    /// packet).
    first_header: Option<crate::Ipv4Header>,
    /// Time the stream was created, in the caller's millisecond clock.
    created_ms: u64,
}

/// Reassembles fragmented IPv4 packets from a stream of parsed chains.
///
/// The pool holds one buffer per fragment key. Timestamps are supplied
/// by the caller (milliseconds on any monotonic clock), keeping the
/// pool itself deterministic & clock free.
///
/// ```
/// use wirecraft::{IpDefragPool, Ipv4Header, Pdu};
///
/// let mut pool = IpDefragPool::new();
/// # let chain = Pdu::from(Ipv4Header::new(
/// #     core::net::Ipv4Addr::LOCALHOST,
/// #     core::net::Ipv4Addr::LOCALHOST,
/// # ));
/// // feed parsed chains; completed packets fall out
/// if let Some(packet) = pool.process(&chain, 0).unwrap() {
///     println!("reassembled {} bytes", packet.len());
/// }
/// ```
#[derive(Default)]
pub struct IpDefragPool {
    active: HashMap<IpFragId, IpDefragStream>,
    timeout_ms: Option<u64>,
    max_fragments_per_stream: Option<usize>,
    on_timeout: Option<Box<dyn FnMut(&IpFragId)>>,
    on_overflow: Option<Box<dyn FnMut(&IpFragId)>>,
}

impl IpDefragPool {
    pub fn new() -> IpDefragPool {
        IpDefragPool::default()
    }

    /// Discard streams that have not completed within the given number
    /// of milliseconds (checked on every [`IpDefragPool::process`]).
    pub fn set_timeout_ms(&mut self, timeout_ms: Option<u64>) {
        self.timeout_ms = timeout_ms;
    }

    /// Discard streams accumulating more than the given number of
    /// fragments.
    pub fn set_max_fragments_per_stream(&mut self, max: Option<usize>) {
        self.max_fragments_per_stream = max;
    }

    /// Callback invoked with the key of every expired stream.
    pub fn set_timeout_callback(&mut self, callback: impl FnMut(&IpFragId) + 'static) {
        self.on_timeout = Some(Box::new(callback));
    }

    /// Callback invoked with the key of every stream dropped for
    /// exceeding the fragment cap.
    pub fn set_overflow_callback(&mut self, callback: impl FnMut(&IpFragId) + 'static) {
        self.on_overflow = Some(Box::new(callback));
    }

    /// Number of packets currently being reconstructed.
    pub fn active_stream_count(&self) -> usize {
        self.active.len()
    }

    /// Drops all pending reconstruction state.
    pub fn clear_streams(&mut self) {
        self.active.clear();
    }

    /// Feeds one parsed chain into the pool.
    ///
    /// Chains without a fragmented IPv4 layer pass through untouched
    /// (`Ok(None)`). When a packet completes, the reassembled chain is
    /// returned: the first fragment's header with offset 0 & the
    /// more-fragments flag cleared, and the payload re-parsed through
    /// the IP protocol dispatch table.
    pub fn process(&mut self, chain: &Pdu, now_ms: u64) -> Result<Option<Pdu>, IpDefragError> {
        self.expire_streams(now_ms);

        let ip_pdu = match chain.find(LayerType::Ipv4) {
            Some(pdu) => pdu,
            None => return Ok(None),
        };
        let header = match &ip_pdu.layer {
            AnyLayer::Ipv4(header) if header.is_fragmented() => header,
            _ => return Ok(None),
        };
        let payload = match ip_pdu.child().map(|c| &c.layer) {
            Some(AnyLayer::Raw(raw)) => raw.payload.clone(),
            Some(_) | None => ip_pdu
                .child()
                .map(|c| c.serialize().unwrap_or_default())
                .unwrap_or_default(),
        };

        let frag_id = IpFragId::from_header(header);
        let stream = self
            .active
            .entry(frag_id.clone())
            .or_insert_with(|| IpDefragStream {
                buf: IpDefragBuf::new(),
                first_header: None,
                created_ms: now_ms,
            });
        let offset = header.fragment_offset.byte_offset();
        if offset == 0 {
            stream.first_header = Some(header.clone());
        }
        if let Err(err) = stream.buf.add(offset, &payload, header.more_fragments) {
            self.active.remove(&frag_id);
            return Err(err);
        }

        if let Some(max) = self.max_fragments_per_stream {
            if stream.buf.fragment_count() > max {
                self.active.remove(&frag_id);
                if let Some(callback) = &mut self.on_overflow {
                    callback(&frag_id);
                }
                return Ok(None);
            }
        }

        if !stream.buf.is_complete() || stream.first_header.is_none() {
            return Ok(None);
        }

        let stream = self.active.remove(&frag_id).unwrap();
        let mut header = stream.first_header.unwrap();
        header.fragment_offset = IpFragOffset::ZERO;
        header.more_fragments = false;
        let data = stream.buf.take_data();
        let mut result = Pdu::new(header.clone());
        if !data.is_empty() {
            result.set_child(dispatch::child_from_ip_number(header.protocol, &data));
        }
        Ok(Some(result))
    }

    fn expire_streams(&mut self, now_ms: u64) {
        let timeout = match self.timeout_ms {
            Some(timeout) => timeout,
            None => return,
        };
        let expired: Vec<IpFragId> = self
            .active
            .iter()
            .filter(|(_, stream)| now_ms.saturating_sub(stream.created_ms) >= timeout)
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            self.active.remove(&id);
            if let Some(callback) = &mut self.on_timeout {
                callback(&id);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Ipv4Header, UdpHeader};
    use core::net::Ipv4Addr;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Splits an UDP datagram into IPv4 fragments of `frag_size`
    /// payload bytes.
    fn make_fragments(payload: &[u8], frag_size: usize) -> Vec<Pdu> {
        let full = (Ipv4Header::new(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        ) / UdpHeader::new(4000, 4001)
            / payload)
            .serialize()
            .unwrap();
        let inner = &full[20..];
        let mut fragments = Vec::new();
        for (i, chunk) in inner.chunks(frag_size).enumerate() {
            let mut ip = Ipv4Header::new(
                Ipv4Addr::new(10, 0, 0, 1),
                Ipv4Addr::new(10, 0, 0, 2),
            );
            ip.identification = 0x42;
            ip.protocol = crate::IpNumber::UDP;
            ip.dont_fragment = false;
            ip.more_fragments = (i + 1) * frag_size < inner.len();
            ip.fragment_offset =
                crate::IpFragOffset::try_new(((i * frag_size) / 8) as u16).unwrap();
            let bytes = (ip / chunk).serialize().unwrap();
            fragments.push(Ipv4Header::parse(&bytes).unwrap());
        }
        fragments
    }

    #[test]
    fn reverse_order_reassembly() {
        let payload = vec![0xabu8; 2000];
        let mut fragments = make_fragments(&payload, 1480);
        assert_eq!(2, fragments.len());
        fragments.reverse();

        let mut pool = IpDefragPool::new();
        let mut results = Vec::new();
        for fragment in &fragments {
            if let Some(packet) = pool.process(fragment, 0).unwrap() {
                results.push(packet);
            }
        }
        assert_eq!(1, results.len());
        assert_eq!(0, pool.active_stream_count());

        let packet = &results[0];
        let ip = match &packet.layer {
            AnyLayer::Ipv4(ip) => ip,
            _ => panic!(),
        };
        assert_eq!(0, ip.fragment_offset.value());
        assert!(!ip.more_fragments);
        let udp = packet.find(LayerType::Udp).expect("udp layer reparsed");
        let data = udp.child().unwrap();
        assert_eq!(payload.len(), data.len());
        assert_eq!(payload, udp.child().unwrap().serialize().unwrap());
    }

    #[test]
    fn any_permutation_reassembles() {
        let payload: Vec<u8> = (0..1024u32).map(|i| i as u8).collect();
        let fragments = make_fragments(&payload, 256);
        assert!(fragments.len() > 3);

        // rotate through a few permutations
        for rotation in 0..fragments.len() {
            let mut pool = IpDefragPool::new();
            let mut emitted = 0;
            for i in 0..fragments.len() {
                let fragment = &fragments[(i + rotation) % fragments.len()];
                if pool.process(fragment, 0).unwrap().is_some() {
                    emitted += 1;
                }
            }
            assert_eq!(1, emitted);
        }
    }

    #[test]
    fn unfragmented_packets_pass_through() {
        let chain = (Ipv4Header::new(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST)
            / UdpHeader::new(1, 2)
            / &b"x"[..])
            .serialize()
            .unwrap();
        let parsed = Ipv4Header::parse(&chain).unwrap();
        let mut pool = IpDefragPool::new();
        assert_eq!(None, pool.process(&parsed, 0).unwrap());
        assert_eq!(0, pool.active_stream_count());
    }

    #[test]
    fn timeout_expires_streams() {
        let payload = vec![1u8; 64];
        let fragments = make_fragments(&payload, 32);
        let expired = Rc::new(RefCell::new(Vec::new()));
        let mut pool = IpDefragPool::new();
        pool.set_timeout_ms(Some(100));
        let sink = expired.clone();
        pool.set_timeout_callback(move |id| sink.borrow_mut().push(id.clone()));

        pool.process(&fragments[0], 0).unwrap();
        assert_eq!(1, pool.active_stream_count());
        // the next packet arrives after the timeout
        pool.process(&fragments[1], 200).unwrap();
        assert_eq!(1, expired.borrow().len());
        assert_eq!(0x42, expired.borrow()[0].identification);
    }

    #[test]
    fn fragment_cap_drops_stream() {
        let payload = vec![1u8; 128];
        let fragments = make_fragments(&payload, 32);
        let overflowed = Rc::new(RefCell::new(0));
        let mut pool = IpDefragPool::new();
        pool.set_max_fragments_per_stream(Some(3));
        let sink = overflowed.clone();
        pool.set_overflow_callback(move |_| *sink.borrow_mut() += 1);

        for fragment in &fragments {
            pool.process(fragment, 0).unwrap();
        }
        assert_eq!(1, *overflowed.borrow());
    }
}
