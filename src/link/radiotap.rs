use crate::checksum::crc32;
use crate::err::{ContentError, Layer, LenError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{dot11, Pdu, RawData};

/// Channel field of a [`RadioTapHeader`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RadioTapChannel {
    /// Frequency in MHz.
    pub frequency: u16,
    /// Channel type bits (CCK, OFDM, 2 GHz, 5 GHz, ...).
    pub channel_type: u16,
}

/// Extended channel field of a [`RadioTapHeader`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RadioTapXChannel {
    pub flags: u32,
    pub frequency: u16,
    pub channel: u8,
    pub max_power: u8,
}

/// MCS field of a [`RadioTapHeader`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RadioTapMcs {
    pub known: u8,
    pub flags: u8,
    pub index: u8,
}

/// RadioTap capture header (little endian, present-bitmap driven).
///
/// Fields are stored unpacked; the present bitmap, the inter-field
/// alignment padding and the length field are recomputed on every
/// serialization, so inserting a field automatically reshuffles the
/// padding of the fields after it.
///
/// When the frame flags announce an FCS the trailing 4 bytes of the
/// frame are consumed on parse and recomputed (CRC32 over the 802.11
/// frame) on serialization.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RadioTapHeader {
    /// TSFT timer of the radio in microseconds.
    pub tsft: Option<u64>,
    /// Frame flags (see the `frame_flags` module).
    pub flags: Option<u8>,
    /// Data rate in 500 kbit/s units.
    pub rate: Option<u8>,
    pub channel: Option<RadioTapChannel>,
    /// FHSS hop set & hop pattern.
    pub fhss: Option<(u8, u8)>,
    pub dbm_signal: Option<i8>,
    pub dbm_noise: Option<i8>,
    pub lock_quality: Option<u16>,
    pub tx_attenuation: Option<u16>,
    pub db_tx_attenuation: Option<u16>,
    pub dbm_tx_power: Option<i8>,
    pub antenna: Option<u8>,
    pub db_signal: Option<u8>,
    pub db_noise: Option<u8>,
    pub rx_flags: Option<u16>,
    pub tx_flags: Option<u16>,
    pub rts_retries: Option<u8>,
    pub data_retries: Option<u8>,
    pub xchannel: Option<RadioTapXChannel>,
    pub mcs: Option<RadioTapMcs>,
    /// Unparsed bytes between the known fields & the announced header
    /// length, preserved verbatim.
    pub extra: Vec<u8>,
    /// Frame check sequence found after the 802.11 frame (recomputed on
    /// serialization).
    pub fcs: Option<u32>,
}

/// Bits of the [`RadioTapHeader::flags`] field.
pub mod frame_flags {
    pub const CFP: u8 = 0x01;
    pub const SHORT_PREAMBLE: u8 = 0x02;
    pub const WEP: u8 = 0x04;
    pub const FRAGMENTATION: u8 = 0x08;
    pub const FCS: u8 = 0x10;
    pub const DATA_PAD: u8 = 0x20;
    pub const FAILED_FCS: u8 = 0x40;
    pub const SHORT_GI: u8 = 0x80;
}

/// (size, alignment) of each present-bitmap field, indexed by bit.
const FIELD_LAYOUT: [(usize, usize); 20] = [
    (8, 8), // 0 TSFT
    (1, 1), // 1 flags
    (1, 1), // 2 rate
    (4, 2), // 3 channel
    (2, 2), // 4 FHSS
    (1, 1), // 5 dBm antenna signal
    (1, 1), // 6 dBm antenna noise
    (2, 2), // 7 lock quality
    (2, 2), // 8 TX attenuation
    (2, 2), // 9 dB TX attenuation
    (1, 1), // 10 dBm TX power
    (1, 1), // 11 antenna
    (1, 1), // 12 dB antenna signal
    (1, 1), // 13 dB antenna noise
    (2, 2), // 14 RX flags
    (2, 2), // 15 TX flags
    (1, 1), // 16 RTS retries
    (1, 1), // 17 data retries
    (8, 4), // 18 XChannel
    (3, 1), // 19 MCS
];

impl RadioTapHeader {
    /// Size of the fixed part (version, pad, length, one present word).
    pub const MIN_LEN: usize = 8;

    pub fn new() -> RadioTapHeader {
        RadioTapHeader::default()
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::RadioTapHeader);
        let version = stream.read_u8()?;
        if version != 0 {
            return Err(ContentError::RadioTapUnexpectedVersion { version }.into());
        }
        stream.skip(1)?; // pad
        let length = usize::from(stream.read_u16_le()?);
        if length < RadioTapHeader::MIN_LEN {
            return Err(ContentError::RadioTapLenTooSmall {
                length: length as u16,
            }
            .into());
        }
        if length > data.len() {
            return Err(LenError {
                required_len: length,
                len: data.len(),
                layer: Layer::RadioTapHeader,
                layer_start_offset: 0,
            }
            .into());
        }

        // present bitmap; additional words (announced via the top bit)
        // would select fields this dissector does not know
        let present = stream.read_u32_le()?;
        let unknown = present & !0x000f_ffff;
        if unknown != 0 {
            let bit = unknown.trailing_zeros() as u8;
            return Err(ContentError::RadioTapUnknownField { bit }.into());
        }

        let mut header = RadioTapHeader::default();
        for bit in 0u8..20 {
            if 0 == present & (1 << bit) {
                continue;
            }
            let (_, align) = FIELD_LAYOUT[usize::from(bit)];
            let misalign = stream.position() % align;
            if misalign != 0 {
                stream.skip(align - misalign)?;
            }
            match bit {
                0 => header.tsft = Some(stream.read_u64_le()?),
                1 => header.flags = Some(stream.read_u8()?),
                2 => header.rate = Some(stream.read_u8()?),
                3 => {
                    header.channel = Some(RadioTapChannel {
                        frequency: stream.read_u16_le()?,
                        channel_type: stream.read_u16_le()?,
                    })
                }
                4 => header.fhss = Some((stream.read_u8()?, stream.read_u8()?)),
                5 => header.dbm_signal = Some(stream.read_u8()? as i8),
                6 => header.dbm_noise = Some(stream.read_u8()? as i8),
                7 => header.lock_quality = Some(stream.read_u16_le()?),
                8 => header.tx_attenuation = Some(stream.read_u16_le()?),
                9 => header.db_tx_attenuation = Some(stream.read_u16_le()?),
                10 => header.dbm_tx_power = Some(stream.read_u8()? as i8),
                11 => header.antenna = Some(stream.read_u8()?),
                12 => header.db_signal = Some(stream.read_u8()?),
                13 => header.db_noise = Some(stream.read_u8()?),
                14 => header.rx_flags = Some(stream.read_u16_le()?),
                15 => header.tx_flags = Some(stream.read_u16_le()?),
                16 => header.rts_retries = Some(stream.read_u8()?),
                17 => header.data_retries = Some(stream.read_u8()?),
                18 => {
                    header.xchannel = Some(RadioTapXChannel {
                        flags: stream.read_u32_le()?,
                        frequency: stream.read_u16_le()?,
                        channel: stream.read_u8()?,
                        max_power: stream.read_u8()?,
                    })
                }
                19 => {
                    header.mcs = Some(RadioTapMcs {
                        known: stream.read_u8()?,
                        flags: stream.read_u8()?,
                        index: stream.read_u8()?,
                    })
                }
                _ => unreachable!(),
            }
        }
        if stream.position() > length {
            return Err(LenError {
                required_len: stream.position(),
                len: length,
                layer: Layer::RadioTapHeader,
                layer_start_offset: 0,
            }
            .into());
        }
        header.extra = data[stream.position()..length].to_vec();

        let mut frame = &data[length..];
        let has_fcs = header.flags.map(|f| 0 != f & frame_flags::FCS).unwrap_or(false);
        if has_fcs {
            if frame.len() < 4 {
                return Err(LenError {
                    required_len: 4,
                    len: frame.len(),
                    layer: Layer::RadioTapHeader,
                    layer_start_offset: length,
                }
                .into());
            }
            let (body, fcs) = frame.split_at(frame.len() - 4);
            header.fcs = Some(u32::from_le_bytes([fcs[0], fcs[1], fcs[2], fcs[3]]));
            frame = body;
        }

        let mut pdu = Pdu::new(header);
        if !frame.is_empty() {
            pdu.set_child(dot11::parse(frame).unwrap_or_else(|_| RawData::parse(frame)));
        }
        Ok(pdu)
    }

    fn present_word(&self) -> u32 {
        let mut present = 0u32;
        let set = [
            self.tsft.is_some(),
            self.flags.is_some(),
            self.rate.is_some(),
            self.channel.is_some(),
            self.fhss.is_some(),
            self.dbm_signal.is_some(),
            self.dbm_noise.is_some(),
            self.lock_quality.is_some(),
            self.tx_attenuation.is_some(),
            self.db_tx_attenuation.is_some(),
            self.dbm_tx_power.is_some(),
            self.antenna.is_some(),
            self.db_signal.is_some(),
            self.db_noise.is_some(),
            self.rx_flags.is_some(),
            self.tx_flags.is_some(),
            self.rts_retries.is_some(),
            self.data_retries.is_some(),
            self.xchannel.is_some(),
            self.mcs.is_some(),
        ];
        for (bit, is_set) in set.iter().enumerate() {
            if *is_set {
                present |= 1 << bit;
            }
        }
        present
    }

    pub fn header_len(&self) -> usize {
        let present = self.present_word();
        let mut len = RadioTapHeader::MIN_LEN;
        for (bit, (size, align)) in FIELD_LAYOUT.iter().enumerate() {
            if 0 != present & (1 << bit) {
                len += (align - len % align) % align;
                len += size;
            }
        }
        len + self.extra.len()
    }

    #[inline]
    pub fn trailer_len(&self) -> usize {
        if self.fcs.is_some() {
            4
        } else {
            0
        }
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        {
            let mut stream = OutputStream::new(&mut buf[..header_len], Layer::RadioTapHeader);
            stream.write_u8(0)?; // version
            stream.write_u8(0)?; // pad
            stream.write_u16_le(header_len as u16)?;
            stream.write_u32_le(self.present_word())?;

            let mut pad_to = |stream: &mut OutputStream<'_>, align: usize| {
                let misalign = stream.position() % align;
                if misalign != 0 {
                    stream.fill(align - misalign, 0)
                } else {
                    Ok(())
                }
            };
            if let Some(tsft) = self.tsft {
                pad_to(&mut stream, 8)?;
                stream.write_u64_le(tsft)?;
            }
            if let Some(flags) = self.flags {
                stream.write_u8(flags)?;
            }
            if let Some(rate) = self.rate {
                stream.write_u8(rate)?;
            }
            if let Some(channel) = self.channel {
                pad_to(&mut stream, 2)?;
                stream.write_u16_le(channel.frequency)?;
                stream.write_u16_le(channel.channel_type)?;
            }
            if let Some((hop_set, hop_pattern)) = self.fhss {
                pad_to(&mut stream, 2)?;
                stream.write_u8(hop_set)?;
                stream.write_u8(hop_pattern)?;
            }
            if let Some(dbm_signal) = self.dbm_signal {
                stream.write_u8(dbm_signal as u8)?;
            }
            if let Some(dbm_noise) = self.dbm_noise {
                stream.write_u8(dbm_noise as u8)?;
            }
            if let Some(lock_quality) = self.lock_quality {
                pad_to(&mut stream, 2)?;
                stream.write_u16_le(lock_quality)?;
            }
            if let Some(tx_attenuation) = self.tx_attenuation {
                pad_to(&mut stream, 2)?;
                stream.write_u16_le(tx_attenuation)?;
            }
            if let Some(db_tx_attenuation) = self.db_tx_attenuation {
                pad_to(&mut stream, 2)?;
                stream.write_u16_le(db_tx_attenuation)?;
            }
            if let Some(dbm_tx_power) = self.dbm_tx_power {
                stream.write_u8(dbm_tx_power as u8)?;
            }
            if let Some(antenna) = self.antenna {
                stream.write_u8(antenna)?;
            }
            if let Some(db_signal) = self.db_signal {
                stream.write_u8(db_signal)?;
            }
            if let Some(db_noise) = self.db_noise {
                stream.write_u8(db_noise)?;
            }
            if let Some(rx_flags) = self.rx_flags {
                pad_to(&mut stream, 2)?;
                stream.write_u16_le(rx_flags)?;
            }
            if let Some(tx_flags) = self.tx_flags {
                pad_to(&mut stream, 2)?;
                stream.write_u16_le(tx_flags)?;
            }
            if let Some(rts_retries) = self.rts_retries {
                stream.write_u8(rts_retries)?;
            }
            if let Some(data_retries) = self.data_retries {
                stream.write_u8(data_retries)?;
            }
            if let Some(xchannel) = self.xchannel {
                pad_to(&mut stream, 4)?;
                stream.write_u32_le(xchannel.flags)?;
                stream.write_u16_le(xchannel.frequency)?;
                stream.write_u8(xchannel.channel)?;
                stream.write_u8(xchannel.max_power)?;
            }
            if let Some(mcs) = self.mcs {
                stream.write_u8(mcs.known)?;
                stream.write_u8(mcs.flags)?;
                stream.write_u8(mcs.index)?;
            }
            stream.write_bytes(&self.extra)?;
        }
        if self.fcs.is_some() {
            // the FCS is an auto field: recomputed over the frame bytes
            let frame_len = child.map(|c| c.len).unwrap_or(0);
            let fcs = crc32(&buf[header_len..header_len + frame_len]);
            let trailer_start = buf.len() - 4;
            buf[trailer_start..].copy_from_slice(&fcs.to_le_bytes());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;

    /// version/pad/len/present + tsft + flags + rate + pad + channel +
    /// dbm signal + antenna
    fn sample() -> Vec<u8> {
        vec![
            0x00, 0x00, 0x20, 0x00, // version, pad, length 32
            0x2f, 0x08, 0x00, 0x00, // present: tsft, flags, rate, channel, dbm, antenna
            0x10, 0x32, 0x54, 0x76, 0x98, 0xba, 0xdc, 0xfe, // tsft
            0x00, // flags
            0x04, // rate
            0x6c, 0x09, // frequency 2412
            0xa0, 0x00, // channel type
            0xde, // dbm signal (-34)
            0x00, // antenna
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // extra slack
        ]
    }

    #[test]
    fn parse_fields() {
        let data = sample();
        let pdu = RadioTapHeader::parse(&data).unwrap();
        let radiotap = match &pdu.layer {
            crate::AnyLayer::RadioTap(header) => header,
            _ => panic!(),
        };
        assert_eq!(Some(0xfedc_ba98_7654_3210), radiotap.tsft);
        assert_eq!(Some(0x00), radiotap.flags);
        assert_eq!(Some(4), radiotap.rate);
        assert_eq!(
            Some(RadioTapChannel {
                frequency: 2412,
                channel_type: 0x00a0
            }),
            radiotap.channel
        );
        assert_eq!(Some(-34), radiotap.dbm_signal);
        assert_eq!(Some(0), radiotap.antenna);
        assert_eq!(8, radiotap.extra.len());
        assert_eq!(32, pdu.header_len());
    }

    #[test]
    fn round_trip() {
        let data = sample();
        let pdu = RadioTapHeader::parse(&data).unwrap();
        assert_eq!(data, pdu.serialize().unwrap());
    }

    #[test]
    fn alignment_is_recomputed_on_insert() {
        let data = sample();
        let pdu = RadioTapHeader::parse(&data).unwrap();
        let mut radiotap = match pdu.layer {
            crate::AnyLayer::RadioTap(header) => header,
            _ => panic!(),
        };
        radiotap.extra.clear();
        let before = radiotap.header_len();
        // dropping the tsft field removes its 8 bytes (the fields after
        // it happen to stay aligned)
        radiotap.tsft = None;
        assert_eq!(before - 8, radiotap.header_len());
        // adding a lock quality field appends 2 aligned bytes
        radiotap.lock_quality = Some(1);
        let bytes = Pdu::from(radiotap.clone()).serialize().unwrap();
        assert_eq!(radiotap.header_len(), bytes.len());
        let reparsed = RadioTapHeader::parse(&bytes).unwrap();
        assert_eq!(crate::AnyLayer::RadioTap(radiotap), reparsed.layer);
    }

    #[test]
    fn rejects_unknown_present_bit() {
        let mut data = sample();
        data[6] = 0x10; // bit 20
        assert_matches!(
            RadioTapHeader::parse(&data).unwrap_err().content_error(),
            Some(ContentError::RadioTapUnknownField { bit: 20 })
        );
    }

    #[test]
    fn rejects_bad_version() {
        let mut data = sample();
        data[0] = 1;
        assert!(RadioTapHeader::parse(&data).is_err());
    }
}
