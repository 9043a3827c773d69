use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Pdu, RawData};

/// EAPOL packet carrying the legacy RC4 key descriptor.
///
/// The length field of the common EAPOL header is derived from the
/// body when left at 0 (parsed packets keep the on-wire value).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EapolRc4 {
    pub version: u8,
    /// Packet type of the common header (3 = key).
    pub packet_type: u8,
    /// Body length field of the common header; 0 lets the serializer
    /// derive it from the actual body.
    pub length: u16,
    pub key_length: u16,
    pub replay_counter: u64,
    pub key_iv: [u8; 16],
    /// High bit of the index byte.
    pub key_flag: bool,
    /// Key index (7 bits).
    pub key_index: u8,
    pub key_sign: [u8; 16],
    /// Key bytes (only stored when the body length matches the key
    /// length field).
    pub key: Vec<u8>,
}

impl EapolRc4 {
    /// Key descriptor type selecting the RC4 variant.
    pub const KEY_DESCRIPTOR_RC4: u8 = 1;

    /// Size of the common EAPOL header.
    pub const EAPOL_HEADER_LEN: usize = 4;

    /// Size of the RC4 descriptor body (without the key).
    pub const DESCRIPTOR_LEN: usize = 44;

    pub fn new() -> EapolRc4 {
        EapolRc4 {
            version: 1,
            packet_type: 3,
            length: 0,
            key_length: 0,
            replay_counter: 0,
            key_iv: [0; 16],
            key_flag: false,
            key_index: 0,
            key_sign: [0; 16],
            key: Vec::new(),
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::EapolHeader);
        let version = stream.read_u8()?;
        let packet_type = stream.read_u8()?;
        let length = stream.read_u16_be()?;
        stream.skip(1)?; // descriptor type (checked by the dispatcher)
        let key_length = stream.read_u16_be()?;
        let replay_counter = stream.read_u64_be()?;
        let key_iv = stream.read_array()?;
        let index = stream.read_u8()?;
        let key_sign = stream.read_array()?;
        let rest = stream.rest();
        let (key, trailer) = if rest.len() == usize::from(key_length) {
            (rest.to_vec(), &[][..])
        } else {
            (Vec::new(), rest)
        };
        let mut pdu = Pdu::new(EapolRc4 {
            version,
            packet_type,
            length,
            key_length,
            replay_counter,
            key_iv,
            key_flag: 0 != index & 0x80,
            key_index: index & 0x7f,
            key_sign,
            key,
        });
        if !trailer.is_empty() {
            pdu.set_child(RawData::parse(trailer));
        }
        Ok(pdu)
    }

    pub fn header_len(&self) -> usize {
        EapolRc4::EAPOL_HEADER_LEN + EapolRc4::DESCRIPTOR_LEN + self.key.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let length = if self.length != 0 {
            self.length
        } else {
            (buf.len() - EapolRc4::EAPOL_HEADER_LEN) as u16
        };
        let key_length = if self.key.is_empty() {
            self.key_length
        } else {
            self.key.len() as u16
        };
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::EapolHeader);
        stream.write_u8(self.version)?;
        stream.write_u8(self.packet_type)?;
        stream.write_u16_be(length)?;
        stream.write_u8(EapolRc4::KEY_DESCRIPTOR_RC4)?;
        stream.write_u16_be(key_length)?;
        stream.write_u64_be(self.replay_counter)?;
        stream.write_bytes(&self.key_iv)?;
        stream.write_u8(if self.key_flag { 0x80 } else { 0 } | (self.key_index & 0x7f))?;
        stream.write_bytes(&self.key_sign)?;
        stream.write_bytes(&self.key)
    }
}

impl Default for EapolRc4 {
    fn default() -> EapolRc4 {
        EapolRc4::new()
    }
}

/// EAPOL packet carrying the RSN (WPA2) or WPA key descriptor.
///
/// The WPA key data length is derived from the stored key data, the
/// common header length from the body when left at 0. Trailing bytes
/// after the announced key data are preserved as a raw child layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EapolRsn {
    pub version: u8,
    /// Packet type of the common header (3 = key).
    pub packet_type: u8,
    /// Body length field of the common header; 0 lets the serializer
    /// derive it from the actual body.
    pub length: u16,
    /// 2 for RSN, 254 for the pre-standard WPA form.
    pub descriptor_type: u8,
    /// Key descriptor version (3 bits of the key info field).
    pub descriptor_version: u8,
    /// True for pairwise keys, false for group keys.
    pub key_type: bool,
    /// Key index (2 bits).
    pub key_index: u8,
    pub install: bool,
    pub key_ack: bool,
    pub key_mic: bool,
    pub secure: bool,
    pub error: bool,
    pub request: bool,
    pub encrypted: bool,
    pub key_length: u16,
    pub replay_counter: u64,
    pub nonce: [u8; 32],
    pub key_iv: [u8; 16],
    /// Receive sequence counter.
    pub rsc: u64,
    pub id: u64,
    pub mic: [u8; 16],
    /// WPA key data (its length field is derived from this).
    pub key: Vec<u8>,
}

impl EapolRsn {
    /// Key descriptor type of the RSN variant.
    pub const KEY_DESCRIPTOR_RSN: u8 = 2;

    /// Key descriptor type of the pre-standard WPA variant.
    pub const KEY_DESCRIPTOR_WPA: u8 = 254;

    /// Size of the common EAPOL header.
    pub const EAPOL_HEADER_LEN: usize = 4;

    /// Size of the RSN descriptor body (without the key data).
    pub const DESCRIPTOR_LEN: usize = 95;

    pub fn new() -> EapolRsn {
        EapolRsn {
            version: 1,
            packet_type: 3,
            length: 0,
            descriptor_type: EapolRsn::KEY_DESCRIPTOR_RSN,
            descriptor_version: 2,
            key_type: false,
            key_index: 0,
            install: false,
            key_ack: false,
            key_mic: false,
            secure: false,
            error: false,
            request: false,
            encrypted: false,
            key_length: 0,
            replay_counter: 0,
            nonce: [0; 32],
            key_iv: [0; 16],
            rsc: 0,
            id: 0,
            mic: [0; 16],
            key: Vec::new(),
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::EapolHeader);
        let version = stream.read_u8()?;
        let packet_type = stream.read_u8()?;
        let length = stream.read_u16_be()?;
        let descriptor_type = stream.read_u8()?;
        let key_info = stream.read_u16_be()?;
        let key_length = stream.read_u16_be()?;
        let replay_counter = stream.read_u64_be()?;
        let nonce = stream.read_array()?;
        let key_iv = stream.read_array()?;
        let rsc = stream.read_u64_be()?;
        let id = stream.read_u64_be()?;
        let mic = stream.read_array()?;
        let wpa_length = usize::from(stream.read_u16_be()?);
        let key = stream.read_bytes(wpa_length.min(stream.remaining()))?.to_vec();
        let trailer = stream.rest();

        let mut pdu = Pdu::new(EapolRsn {
            version,
            packet_type,
            length,
            descriptor_type,
            descriptor_version: (key_info & 0x7) as u8,
            key_type: 0 != key_info & 0x0008,
            key_index: ((key_info >> 4) & 0x3) as u8,
            install: 0 != key_info & 0x0040,
            key_ack: 0 != key_info & 0x0080,
            key_mic: 0 != key_info & 0x0100,
            secure: 0 != key_info & 0x0200,
            error: 0 != key_info & 0x0400,
            request: 0 != key_info & 0x0800,
            encrypted: 0 != key_info & 0x1000,
            key_length,
            replay_counter,
            nonce,
            key_iv,
            rsc,
            id,
            mic,
            key,
        });
        if !trailer.is_empty() {
            // unknown trailing bytes are kept, not discarded
            pdu.set_child(RawData::parse(trailer));
        }
        Ok(pdu)
    }

    fn key_info(&self) -> u16 {
        u16::from(self.descriptor_version & 0x7)
            | (u16::from(self.key_type) << 3)
            | (u16::from(self.key_index & 0x3) << 4)
            | (u16::from(self.install) << 6)
            | (u16::from(self.key_ack) << 7)
            | (u16::from(self.key_mic) << 8)
            | (u16::from(self.secure) << 9)
            | (u16::from(self.error) << 10)
            | (u16::from(self.request) << 11)
            | (u16::from(self.encrypted) << 12)
    }

    pub fn header_len(&self) -> usize {
        EapolRsn::EAPOL_HEADER_LEN + EapolRsn::DESCRIPTOR_LEN + self.key.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let length = if self.length != 0 {
            self.length
        } else {
            (buf.len() - EapolRsn::EAPOL_HEADER_LEN) as u16
        };
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::EapolHeader);
        stream.write_u8(self.version)?;
        stream.write_u8(self.packet_type)?;
        stream.write_u16_be(length)?;
        stream.write_u8(self.descriptor_type)?;
        stream.write_u16_be(self.key_info())?;
        stream.write_u16_be(self.key_length)?;
        stream.write_u64_be(self.replay_counter)?;
        stream.write_bytes(&self.nonce)?;
        stream.write_bytes(&self.key_iv)?;
        stream.write_u64_be(self.rsc)?;
        stream.write_u64_be(self.id)?;
        stream.write_bytes(&self.mic)?;
        stream.write_u16_be(self.key.len() as u16)?;
        stream.write_bytes(&self.key)
    }
}

impl Default for EapolRsn {
    fn default() -> EapolRsn {
        EapolRsn::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnyLayer, LayerType};

    fn handshake_message_1() -> EapolRsn {
        let mut eapol = EapolRsn::new();
        eapol.version = 2;
        eapol.key_type = true;
        eapol.key_ack = true;
        eapol.key_length = 16;
        eapol.replay_counter = 1;
        eapol.nonce = [0xaa; 32];
        eapol
    }

    #[test]
    fn rsn_round_trip() {
        let bytes = Pdu::from(handshake_message_1()).serialize().unwrap();
        assert_eq!(99, bytes.len());
        // the header length field covers the descriptor body
        assert_eq!(95, u16::from_be_bytes([bytes[2], bytes[3]]));
        let pdu = crate::dispatch::parse_link(crate::LinkType::ETHERNET, &{
            let mut frame = Vec::new();
            frame.extend_from_slice(&[0u8; 12]);
            frame.extend_from_slice(&[0x88, 0x8e]);
            frame.extend_from_slice(&bytes);
            frame
        })
        .unwrap();
        assert_eq!(LayerType::EapolRsn, pdu.child().unwrap().layer_type());

        let parsed = EapolRsn::parse(&bytes).unwrap();
        let eapol = match &parsed.layer {
            AnyLayer::EapolRsn(eapol) => eapol,
            _ => panic!(),
        };
        let mut expected = handshake_message_1();
        // the parsed form carries the on-wire length field
        expected.length = 95;
        assert_eq!(&expected, eapol);
        assert_eq!(bytes, parsed.serialize().unwrap());
    }

    #[test]
    fn unknown_trailer_is_kept() {
        let mut bytes = Pdu::from(handshake_message_1()).serialize().unwrap();
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let pdu = EapolRsn::parse(&bytes).unwrap();
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
        assert_eq!(8, pdu.child().unwrap().len());
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn rc4_round_trip() {
        let mut eapol = EapolRc4::new();
        eapol.replay_counter = 3;
        eapol.key_flag = true;
        eapol.key_index = 1;
        eapol.key = vec![0x11; 5];
        let bytes = Pdu::from(eapol.clone()).serialize().unwrap();
        assert_eq!(4 + 44 + 5, bytes.len());
        let parsed = EapolRc4::parse(&bytes).unwrap();
        let mut expected = eapol;
        // the key length & body length fields are derived on write
        expected.key_length = 5;
        expected.length = 49;
        assert_eq!(AnyLayer::EapolRc4(expected), parsed.layer);
    }
}
