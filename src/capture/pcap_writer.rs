use std::io::Write;

use crate::err::CaptureError;
use crate::{LinkType, Packet, Pdu, Timestamp};

/// Writer for classic pcap capture files (little endian, microsecond
/// timestamps, version 2.4).
///
/// The link type is fixed when the file is opened; chains longer than
/// the snapshot length are truncated in the file (with the original
/// length recorded in the record header).
pub struct PcapWriter<W> {
    writer: W,
    snaplen: u32,
}

impl<W: Write> PcapWriter<W> {
    /// Writes the pcap file header.
    pub fn new(mut writer: W, link_type: LinkType, snaplen: u32) -> Result<PcapWriter<W>, CaptureError> {
        let mut header = [0u8; 24];
        header[0..4].copy_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
        header[4..6].copy_from_slice(&2u16.to_le_bytes()); // version major
        header[6..8].copy_from_slice(&4u16.to_le_bytes()); // version minor
        header[16..20].copy_from_slice(&snaplen.to_le_bytes());
        header[20..24].copy_from_slice(&u32::from(link_type.0).to_le_bytes());
        writer.write_all(&header)?;
        Ok(PcapWriter { writer, snaplen })
    }

    /// Serializes a chain & appends it as one record.
    pub fn write_pdu(&mut self, pdu: &Pdu, timestamp: Timestamp) -> Result<(), CaptureError> {
        let data = pdu
            .serialize()
            .map_err(|_| CaptureError::InvalidInterface {
                name: "serialization failed".to_string(),
            })?;
        self.write_raw(&data, timestamp)
    }

    /// Appends a packet as one record.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<(), CaptureError> {
        self.write_pdu(packet.pdu(), packet.timestamp())
    }

    /// Appends already serialized frame bytes as one record.
    pub fn write_raw(&mut self, data: &[u8], timestamp: Timestamp) -> Result<(), CaptureError> {
        let caplen = (data.len() as u32).min(self.snaplen);
        let mut record = [0u8; 16];
        record[0..4].copy_from_slice(&(timestamp.seconds as u32).to_le_bytes());
        record[4..8].copy_from_slice(&timestamp.microseconds.to_le_bytes());
        record[8..12].copy_from_slice(&caplen.to_le_bytes());
        record[12..16].copy_from_slice(&(data.len() as u32).to_le_bytes());
        self.writer.write_all(&record)?;
        self.writer.write_all(&data[..caplen as usize])?;
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), CaptureError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_layout() {
        let mut out = Vec::new();
        PcapWriter::new(&mut out, LinkType::IEEE802_11_RADIOTAP, 256).unwrap();
        assert_eq!(24, out.len());
        assert_eq!([0xd4, 0xc3, 0xb2, 0xa1], out[0..4]);
        assert_eq!(256, u32::from_le_bytes(out[16..20].try_into().unwrap()));
        assert_eq!(127, u32::from_le_bytes(out[20..24].try_into().unwrap()));
    }

    #[test]
    fn snaplen_truncates_records() {
        let mut out = Vec::new();
        {
            let mut writer = PcapWriter::new(&mut out, LinkType::ETHERNET, 4).unwrap();
            writer
                .write_raw(&[1, 2, 3, 4, 5, 6, 7, 8], Timestamp::ZERO)
                .unwrap();
        }
        let record = &out[24..];
        assert_eq!(4, u32::from_le_bytes(record[8..12].try_into().unwrap()));
        assert_eq!(8, u32::from_le_bytes(record[12..16].try_into().unwrap()));
        assert_eq!(&[1, 2, 3, 4], &record[16..]);
    }
}
