use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::err::CaptureError;
use crate::{dispatch, LinkType, Packet, RawData, Timestamp};

/// One captured frame before dissection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawFrame {
    pub data: Vec<u8>,
    pub timestamp: Timestamp,
}

/// A source of captured frames.
///
/// The crate ships a pcap file implementation
/// ([`crate::PcapReader`]); live OS capture backends implement this
/// trait externally.
pub trait CaptureSource {
    /// Link type of the frames the source yields.
    fn link_type(&self) -> LinkType;

    /// Blocks until the next frame is available. `Ok(None)` signals
    /// the end of the capture.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, CaptureError>;

    /// Makes an outstanding (and every future) [`CaptureSource::next_frame`]
    /// return promptly.
    fn break_loop(&mut self);

    /// Installs a capture filter. Sources that can not filter accept
    /// and ignore the expression.
    fn set_filter(&mut self, _bpf: &str) -> Result<(), CaptureError> {
        Ok(())
    }
}

/// Cloneable handle used to interrupt a running [`Sniffer`] loop from
/// another thread.
#[derive(Clone, Debug, Default)]
pub struct SnifferHandle {
    stop: Arc<AtomicBool>,
}

impl SnifferHandle {
    /// Requests the sniff loop to stop after the frame currently being
    /// waited for.
    pub fn stop_sniff(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Callback driven packet source: pulls frames from a
/// [`CaptureSource`], dissects them & hands the resulting packets to a
/// callback.
pub struct Sniffer<S> {
    source: S,
    stop: Arc<AtomicBool>,
}

impl<S: CaptureSource> Sniffer<S> {
    pub fn new(source: S) -> Sniffer<S> {
        Sniffer {
            source,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for stopping the loop (e.g. from a signal handler or
    /// another thread).
    pub fn stop_handle(&self) -> SnifferHandle {
        SnifferHandle {
            stop: self.stop.clone(),
        }
    }

    /// The wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Runs the capture loop until the source is exhausted, the
    /// callback returns `false` or [`SnifferHandle::stop_sniff`] is
    /// called. Frames whose root layer can not be decoded are passed on
    /// as raw chains.
    pub fn sniff_loop(
        &mut self,
        mut callback: impl FnMut(Packet) -> bool,
    ) -> Result<(), CaptureError> {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                self.source.break_loop();
                return Ok(());
            }
            let frame = match self.source.next_frame()? {
                Some(frame) => frame,
                None => return Ok(()),
            };
            let pdu = dispatch::parse_link(self.source.link_type(), &frame.data)
                .unwrap_or_else(|_| RawData::parse(&frame.data));
            if !callback(Packet::new(pdu, frame.timestamp)) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// In-memory source for tests.
    struct VecSource {
        frames: Vec<RawFrame>,
        broken: bool,
    }

    impl CaptureSource for VecSource {
        fn link_type(&self) -> LinkType {
            LinkType::ETHERNET
        }

        fn next_frame(&mut self) -> Result<Option<RawFrame>, CaptureError> {
            if self.broken || self.frames.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.frames.remove(0)))
            }
        }

        fn break_loop(&mut self) {
            self.broken = true;
        }
    }

    fn frames(count: usize) -> Vec<RawFrame> {
        (0..count)
            .map(|i| RawFrame {
                data: vec![0u8; 14],
                timestamp: Timestamp::new(i as u64, 0),
            })
            .collect()
    }

    #[test]
    fn loop_until_eof() {
        let mut sniffer = Sniffer::new(VecSource {
            frames: frames(3),
            broken: false,
        });
        let mut seen = 0;
        sniffer
            .sniff_loop(|packet| {
                assert_eq!(seen, packet.timestamp().seconds);
                seen += 1;
                true
            })
            .unwrap();
        assert_eq!(3, seen);
    }

    #[test]
    fn callback_can_stop_the_loop() {
        let mut sniffer = Sniffer::new(VecSource {
            frames: frames(10),
            broken: false,
        });
        let mut seen = 0;
        sniffer
            .sniff_loop(|_| {
                seen += 1;
                seen < 2
            })
            .unwrap();
        assert_eq!(2, seen);
    }

    #[test]
    fn stop_handle_interrupts() {
        let mut sniffer = Sniffer::new(VecSource {
            frames: frames(10),
            broken: false,
        });
        let handle = sniffer.stop_handle();
        let mut seen = 0;
        sniffer
            .sniff_loop(|_| {
                seen += 1;
                handle.stop_sniff();
                true
            })
            .unwrap();
        assert_eq!(1, seen);
        // the loop told the source to unblock
        assert!(sniffer.source_mut().broken);
    }
}
