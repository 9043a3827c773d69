use std::collections::HashMap;

use crate::stream::{TcpStream, TcpStreamId};
use crate::{AnyLayer, LayerType, Pdu};

/// Follows TCP flows across a sequence of parsed chains and
/// reconstructs the payload byte streams of both directions.
///
/// A flow starts with a SYN (without ACK); segments for unknown flows
/// are ignored. The data callback fires whenever either direction's
/// contiguous payload grows, the end callback once when a FIN is seen
/// (after which the stream is marked finished).
#[derive(Default)]
pub struct TcpStreamFollower {
    streams: HashMap<TcpStreamId, TcpStream>,
    on_data: Option<Box<dyn FnMut(&TcpStream)>>,
    on_end: Option<Box<dyn FnMut(&TcpStream)>>,
}

impl TcpStreamFollower {
    pub fn new() -> TcpStreamFollower {
        TcpStreamFollower::default()
    }

    /// Callback invoked whenever a stream's contiguous payload grows.
    pub fn set_data_callback(&mut self, callback: impl FnMut(&TcpStream) + 'static) {
        self.on_data = Some(Box::new(callback));
    }

    /// Callback invoked once per stream when a FIN is seen.
    pub fn set_end_callback(&mut self, callback: impl FnMut(&TcpStream) + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    /// Number of flows currently being followed.
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// The state of a followed flow.
    pub fn stream(&self, id: &TcpStreamId) -> Option<&TcpStream> {
        self.streams.get(id)
    }

    /// Drops all flow state.
    pub fn clear_streams(&mut self) {
        self.streams.clear();
    }

    /// Feeds one parsed chain into the follower.
    pub fn process(&mut self, chain: &Pdu) {
        let ip_pdu = match chain.find(LayerType::Ipv4) {
            Some(pdu) => pdu,
            None => return,
        };
        let ip = match &ip_pdu.layer {
            AnyLayer::Ipv4(ip) => ip,
            _ => return,
        };
        let tcp_pdu = match ip_pdu.find(LayerType::Tcp) {
            Some(pdu) => pdu,
            None => return,
        };
        let tcp = match &tcp_pdu.layer {
            AnyLayer::Tcp(tcp) => tcp,
            _ => return,
        };
        let payload: &[u8] = match tcp_pdu.child().map(|c| &c.layer) {
            Some(AnyLayer::Raw(raw)) => &raw.payload,
            _ => &[],
        };

        if tcp.syn && !tcp.ack {
            // new flow, the SYN sender is the client
            let id = TcpStreamId {
                client_addr: ip.source,
                server_addr: ip.destination,
                client_port: tcp.source_port,
                server_port: tcp.destination_port,
            };
            self.streams
                .insert(id.clone(), TcpStream::new(id, tcp.sequence_number));
            return;
        }

        let client_to_server = TcpStreamId {
            client_addr: ip.source,
            server_addr: ip.destination,
            client_port: tcp.source_port,
            server_port: tcp.destination_port,
        };
        let server_to_client = TcpStreamId {
            client_addr: ip.destination,
            server_addr: ip.source,
            client_port: tcp.destination_port,
            server_port: tcp.source_port,
        };
        let (id, from_client) = if self.streams.contains_key(&client_to_server) {
            (client_to_server, true)
        } else if self.streams.contains_key(&server_to_client) {
            (server_to_client, false)
        } else {
            return;
        };
        let stream = self.streams.get_mut(&id).unwrap();
        if stream.finished {
            return;
        }

        if tcp.syn && tcp.ack && !from_client {
            stream.server.start(tcp.sequence_number);
            stream.syn_ack_seen = true;
        }

        let grew = if from_client {
            stream.client.add_segment(tcp.sequence_number, payload)
        } else if stream.syn_ack_seen {
            stream.server.add_segment(tcp.sequence_number, payload)
        } else {
            false
        };
        if grew {
            if let Some(callback) = &mut self.on_data {
                callback(stream);
            }
        }

        if tcp.fin {
            if let Some(callback) = &mut self.on_end {
                callback(stream);
            }
            stream.finished = true;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Ipv4Header, TcpHeader};
    use core::net::Ipv4Addr;
    use std::cell::RefCell;
    use std::rc::Rc;

    const CLIENT: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const SERVER: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

    fn segment(
        from_client: bool,
        seq: u32,
        ack: Option<u32>,
        syn: bool,
        fin: bool,
        payload: &[u8],
    ) -> Pdu {
        let (src, dst, sport, dport) = if from_client {
            (CLIENT, SERVER, 40000u16, 80u16)
        } else {
            (SERVER, CLIENT, 80, 40000)
        };
        let mut tcp = TcpHeader::new(sport, dport);
        tcp.sequence_number = seq;
        tcp.syn = syn;
        tcp.fin = fin;
        if let Some(ack) = ack {
            tcp.ack = true;
            tcp.acknowledgment_number = ack;
        }
        let bytes = (Ipv4Header::new(src, dst) / tcp / payload).serialize().unwrap();
        Ipv4Header::parse(&bytes).unwrap()
    }

    #[test]
    fn handshake_and_data() {
        let mut follower = TcpStreamFollower::new();
        let updates = Rc::new(RefCell::new(Vec::new()));
        let sink = updates.clone();
        follower.set_data_callback(move |stream| {
            sink.borrow_mut().push((
                stream.client_payload().to_vec(),
                stream.server_payload().to_vec(),
            ));
        });

        follower.process(&segment(true, 1000, None, true, false, b""));
        follower.process(&segment(false, 5000, Some(1001), true, false, b""));
        follower.process(&segment(true, 1001, Some(5001), false, false, b"GET /"));
        follower.process(&segment(false, 5001, Some(1006), false, false, b"200 OK"));

        assert_eq!(1, follower.stream_count());
        let updates = updates.borrow();
        assert_eq!(2, updates.len());
        assert_eq!((b"GET /".to_vec(), b"".to_vec()), updates[0]);
        assert_eq!((b"GET /".to_vec(), b"200 OK".to_vec()), updates[1]);
    }

    #[test]
    fn payloads_are_append_only_across_out_of_order_delivery() {
        let mut follower = TcpStreamFollower::new();
        let lengths = Rc::new(RefCell::new(Vec::new()));
        let sink = lengths.clone();
        follower.set_data_callback(move |stream| {
            sink.borrow_mut().push(stream.client_payload().len());
        });

        follower.process(&segment(true, 1000, None, true, false, b""));
        follower.process(&segment(false, 5000, Some(1001), true, false, b""));
        // second chunk first, then the first chunk
        follower.process(&segment(true, 1006, Some(5001), false, false, b"world"));
        follower.process(&segment(true, 1001, Some(5001), false, false, b"hello"));

        let id = TcpStreamId {
            client_addr: CLIENT,
            server_addr: SERVER,
            client_port: 40000,
            server_port: 80,
        };
        assert_eq!(
            b"helloworld",
            follower.stream(&id).unwrap().client_payload()
        );
        // monotonically growing
        let lengths = lengths.borrow();
        assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn fin_ends_the_stream() {
        let mut follower = TcpStreamFollower::new();
        let ended = Rc::new(RefCell::new(0));
        let sink = ended.clone();
        follower.set_end_callback(move |_| *sink.borrow_mut() += 1);

        follower.process(&segment(true, 1000, None, true, false, b""));
        follower.process(&segment(false, 5000, Some(1001), true, false, b""));
        follower.process(&segment(true, 1001, Some(5001), false, true, b""));
        assert_eq!(1, *ended.borrow());

        let id = TcpStreamId {
            client_addr: CLIENT,
            server_addr: SERVER,
            client_port: 40000,
            server_port: 80,
        };
        assert!(follower.stream(&id).unwrap().is_finished());

        // segments after the FIN are ignored
        follower.process(&segment(true, 1002, Some(5001), false, false, b"late"));
        assert_eq!(b"", follower.stream(&id).unwrap().client_payload());
    }

    #[test]
    fn unknown_flows_are_ignored() {
        let mut follower = TcpStreamFollower::new();
        follower.process(&segment(true, 1001, Some(1), false, false, b"data"));
        assert_eq!(0, follower.stream_count());
    }
}
