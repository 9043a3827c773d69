use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::capture::{CaptureSource, RawFrame};
use crate::err::CaptureError;
use crate::{dispatch, LinkType, Packet, RawData, Timestamp};

/// Magic numbers of classic pcap files.
const MAGIC_MICROS: u32 = 0xa1b2_c3d4;
const MAGIC_NANOS: u32 = 0xa1b2_3c4d;

/// Reader for classic pcap capture files (microsecond & nanosecond
/// variants, either byte order).
///
/// Frames are parsed through the link type dispatch table; frames whose
/// root layer can not be decoded yield a raw chain instead of an error.
pub struct PcapReader<R> {
    reader: R,
    big_endian: bool,
    nanosecond: bool,
    snaplen: u32,
    link_type: LinkType,
    stopped: bool,
}

impl<R: Read> PcapReader<R> {
    /// Reads & validates the pcap file header.
    pub fn new(mut reader: R) -> Result<PcapReader<R>, CaptureError> {
        let mut header = [0u8; 24];
        reader.read_exact(&mut header)?;
        let magic = LittleEndian::read_u32(&header[..4]);
        let (big_endian, nanosecond) = match magic {
            MAGIC_MICROS => (false, false),
            MAGIC_NANOS => (false, true),
            _ => match BigEndian::read_u32(&header[..4]) {
                MAGIC_MICROS => (true, false),
                MAGIC_NANOS => (true, true),
                other => return Err(CaptureError::BadMagic { magic: other }),
            },
        };
        let read_u32 = |data: &[u8]| {
            if big_endian {
                BigEndian::read_u32(data)
            } else {
                LittleEndian::read_u32(data)
            }
        };
        Ok(PcapReader {
            reader,
            big_endian,
            nanosecond,
            snaplen: read_u32(&header[16..20]),
            link_type: LinkType(read_u32(&header[20..24]) as u16),
            stopped: false,
        })
    }

    /// Snapshot length of the capture.
    pub fn snaplen(&self) -> u32 {
        self.snaplen
    }

    /// Link type of the capture.
    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Reads the next packet. `Ok(None)` signals the end of the file.
    pub fn next_packet(&mut self) -> Result<Option<Packet>, CaptureError> {
        let frame = match self.next_frame()? {
            Some(frame) => frame,
            None => return Ok(None),
        };
        let pdu = dispatch::parse_link(self.link_type, &frame.data)
            .unwrap_or_else(|_| RawData::parse(&frame.data));
        Ok(Some(Packet::new(pdu, frame.timestamp)))
    }

    fn read_u32(&self, data: &[u8]) -> u32 {
        if self.big_endian {
            BigEndian::read_u32(data)
        } else {
            LittleEndian::read_u32(data)
        }
    }
}

impl<R: Read> CaptureSource for PcapReader<R> {
    fn link_type(&self) -> LinkType {
        self.link_type
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, CaptureError> {
        if self.stopped {
            return Ok(None);
        }
        let mut record = [0u8; 16];
        // a clean EOF before a record header ends the capture
        match self.reader.read(&mut record[..1])? {
            0 => return Ok(None),
            _ => self.reader.read_exact(&mut record[1..])?,
        }
        let ts_sec = self.read_u32(&record[0..4]);
        let ts_frac = self.read_u32(&record[4..8]);
        let caplen = self.read_u32(&record[8..12]);

        let mut data = vec![0u8; caplen as usize];
        self.reader.read_exact(&mut data).map_err(|err| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                CaptureError::TruncatedRecord {
                    caplen,
                    available: 0,
                }
            } else {
                CaptureError::Io(err)
            }
        })?;

        let microseconds = if self.nanosecond {
            ts_frac / 1000
        } else {
            ts_frac
        };
        Ok(Some(RawFrame {
            data,
            timestamp: Timestamp::new(u64::from(ts_sec), microseconds),
        }))
    }

    fn break_loop(&mut self) {
        self.stopped = true;
    }
}
