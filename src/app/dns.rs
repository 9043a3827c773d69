use core::net::{Ipv4Addr, Ipv6Addr};
use std::collections::HashMap;

use crate::err::{ContentError, InvalidArgError, Layer, LenError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::Pdu;

/// Resource record type of a DNS question or record.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DnsRecordType(pub u16);

impl DnsRecordType {
    pub const A: DnsRecordType = DnsRecordType(1);
    pub const NS: DnsRecordType = DnsRecordType(2);
    pub const CNAME: DnsRecordType = DnsRecordType(5);
    pub const SOA: DnsRecordType = DnsRecordType(6);
    pub const PTR: DnsRecordType = DnsRecordType(12);
    pub const MX: DnsRecordType = DnsRecordType(15);
    pub const TXT: DnsRecordType = DnsRecordType(16);
    pub const AAAA: DnsRecordType = DnsRecordType(28);
}

impl core::fmt::Debug for DnsRecordType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            DnsRecordType::A => write!(f, "A"),
            DnsRecordType::NS => write!(f, "NS"),
            DnsRecordType::CNAME => write!(f, "CNAME"),
            DnsRecordType::SOA => write!(f, "SOA"),
            DnsRecordType::PTR => write!(f, "PTR"),
            DnsRecordType::MX => write!(f, "MX"),
            DnsRecordType::TXT => write!(f, "TXT"),
            DnsRecordType::AAAA => write!(f, "AAAA"),
            _ => write!(f, "TYPE{}", self.0),
        }
    }
}

/// The "internet" record class.
pub const DNS_CLASS_IN: u16 = 1;

/// A question of a [`DnsMessage`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnsQuestion {
    /// Absolute domain name in dotted form (compression pointers are
    /// resolved while parsing).
    pub name: String,
    pub record_type: DnsRecordType,
    pub record_class: u16,
}

/// Payload of a resource record. Record types without a typed
/// representation are preserved verbatim in `Raw`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DnsRecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    CName(String),
    Ns(String),
    Ptr(String),
    Mx {
        preference: u16,
        exchange: String,
    },
    Soa {
        primary_ns: String,
        mailbox: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum_ttl: u32,
    },
    /// Character strings of a TXT record.
    Txt(Vec<Vec<u8>>),
    Raw(Vec<u8>),
}

/// A resource record of a [`DnsMessage`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnsResourceRecord {
    pub name: String,
    pub record_type: DnsRecordType,
    pub record_class: u16,
    pub ttl: u32,
    pub data: DnsRecordData,
}

/// DNS message: header, questions and the answer, authority &
/// additional record sections.
///
/// Compressed label pointers are resolved to absolute dotted names
/// while parsing (with loop detection). The serializer re-introduces
/// pointers wherever a name suffix has already been written; the
/// compression is deterministic but not guaranteed to reproduce the
/// pointer choices of other implementations byte for byte.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DnsMessage {
    pub id: u16,
    /// QR bit (false = query, true = response).
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    /// Reserved Z bit.
    pub z: bool,
    pub authenticated_data: bool,
    pub checking_disabled: bool,
    pub response_code: u8,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsResourceRecord>,
    pub authorities: Vec<DnsResourceRecord>,
    pub additionals: Vec<DnsResourceRecord>,
}

impl DnsMessage {
    /// Serialized size of the message header in bytes.
    pub const HEADER_LEN: usize = 12;

    /// Maximum length of a single label in bytes.
    pub const MAX_LABEL_LEN: usize = 63;

    /// Maximum length of an encoded name in bytes.
    pub const MAX_NAME_LEN: usize = 255;

    /// Creates a query for the given name & record type.
    pub fn query(id: u16, name: &str, record_type: DnsRecordType) -> DnsMessage {
        DnsMessage {
            id,
            recursion_desired: true,
            questions: vec![DnsQuestion {
                name: name.to_string(),
                record_type,
                record_class: DNS_CLASS_IN,
            }],
            ..DnsMessage::default()
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::DnsMessage);
        let id = stream.read_u16_be()?;
        let flags = stream.read_u16_be()?;
        let question_count = stream.read_u16_be()?;
        let answer_count = stream.read_u16_be()?;
        let authority_count = stream.read_u16_be()?;
        let additional_count = stream.read_u16_be()?;

        let mut pos = stream.position();
        let mut questions = Vec::new();
        for _ in 0..question_count {
            let name = decode_name(data, &mut pos)?;
            let mut fields = InputStream::new(&data[pos..], Layer::DnsMessage);
            questions.push(DnsQuestion {
                name,
                record_type: DnsRecordType(fields.read_u16_be()?),
                record_class: fields.read_u16_be()?,
            });
            pos += 4;
        }
        let mut sections = [Vec::new(), Vec::new(), Vec::new()];
        for (section, count) in sections
            .iter_mut()
            .zip([answer_count, authority_count, additional_count])
        {
            for _ in 0..count {
                section.push(decode_record(data, &mut pos)?);
            }
        }
        let [answers, authorities, additionals] = sections;

        Ok(Pdu::new(DnsMessage {
            id,
            response: 0 != flags & 0x8000,
            opcode: ((flags >> 11) & 0xf) as u8,
            authoritative: 0 != flags & 0x0400,
            truncated: 0 != flags & 0x0200,
            recursion_desired: 0 != flags & 0x0100,
            recursion_available: 0 != flags & 0x0080,
            z: 0 != flags & 0x0040,
            authenticated_data: 0 != flags & 0x0020,
            checking_disabled: 0 != flags & 0x0010,
            response_code: (flags & 0xf) as u8,
            questions,
            answers,
            authorities,
            additionals,
        }))
    }

    /// Encodes the whole message (applying name compression).
    pub fn encode(&self) -> Result<Vec<u8>, InvalidArgError> {
        let mut encoder = NameEncoder::default();
        let mut out = Vec::with_capacity(DnsMessage::HEADER_LEN);
        let flags = (u16::from(self.response) << 15)
            | (u16::from(self.opcode & 0xf) << 11)
            | (u16::from(self.authoritative) << 10)
            | (u16::from(self.truncated) << 9)
            | (u16::from(self.recursion_desired) << 8)
            | (u16::from(self.recursion_available) << 7)
            | (u16::from(self.z) << 6)
            | (u16::from(self.authenticated_data) << 5)
            | (u16::from(self.checking_disabled) << 4)
            | u16::from(self.response_code & 0xf);
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&flags.to_be_bytes());
        for count in [
            self.questions.len(),
            self.answers.len(),
            self.authorities.len(),
            self.additionals.len(),
        ] {
            out.extend_from_slice(&(count as u16).to_be_bytes());
        }
        for question in &self.questions {
            encoder.write_name(&mut out, &question.name)?;
            out.extend_from_slice(&question.record_type.0.to_be_bytes());
            out.extend_from_slice(&question.record_class.to_be_bytes());
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            encoder.write_name(&mut out, &record.name)?;
            out.extend_from_slice(&record.record_type.0.to_be_bytes());
            out.extend_from_slice(&record.record_class.to_be_bytes());
            out.extend_from_slice(&record.ttl.to_be_bytes());
            let rdlength_at = out.len();
            out.extend_from_slice(&[0, 0]);
            let data_start = out.len();
            match &record.data {
                DnsRecordData::A(addr) => out.extend_from_slice(&addr.octets()),
                DnsRecordData::Aaaa(addr) => out.extend_from_slice(&addr.octets()),
                DnsRecordData::CName(name)
                | DnsRecordData::Ns(name)
                | DnsRecordData::Ptr(name) => encoder.write_name(&mut out, name)?,
                DnsRecordData::Mx {
                    preference,
                    exchange,
                } => {
                    out.extend_from_slice(&preference.to_be_bytes());
                    encoder.write_name(&mut out, exchange)?;
                }
                DnsRecordData::Soa {
                    primary_ns,
                    mailbox,
                    serial,
                    refresh,
                    retry,
                    expire,
                    minimum_ttl,
                } => {
                    encoder.write_name(&mut out, primary_ns)?;
                    encoder.write_name(&mut out, mailbox)?;
                    for value in [serial, refresh, retry, expire, minimum_ttl] {
                        out.extend_from_slice(&value.to_be_bytes());
                    }
                }
                DnsRecordData::Txt(strings) => {
                    for string in strings {
                        out.push(string.len().min(255) as u8);
                        out.extend_from_slice(&string[..string.len().min(255)]);
                    }
                }
                DnsRecordData::Raw(bytes) => out.extend_from_slice(bytes),
            }
            let rdlength = (out.len() - data_start) as u16;
            out[rdlength_at..rdlength_at + 2].copy_from_slice(&rdlength.to_be_bytes());
        }
        Ok(out)
    }

    pub fn header_len(&self) -> usize {
        // names may compress, the size is the size of the encoding
        self.encode().map(|bytes| bytes.len()).unwrap_or(0)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let bytes = self.encode().map_err(|_| SerializeError::PayloadTooLarge {
            layer: Layer::DnsMessage,
            actual: 0,
            max: DnsMessage::MAX_NAME_LEN,
        })?;
        OutputStream::new(buf, Layer::DnsMessage).write_bytes(&bytes)
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        match DnsMessage::parse(data) {
            Ok(pdu) => match &pdu.layer {
                crate::AnyLayer::Dns(reply) if reply.id == self.id && reply.response => {
                    ResponseMatch::Match
                }
                _ => ResponseMatch::No,
            },
            Err(_) => ResponseMatch::No,
        }
    }
}

/// Decodes a (possibly compressed) name starting at `pos`, advancing
/// `pos` past its in-place encoding.
fn decode_name(data: &[u8], pos: &mut usize) -> Result<String, ParseError> {
    let mut name = String::new();
    let mut cursor = *pos;
    let mut jumped = false;
    let mut jumps = 0usize;
    loop {
        let len = *data.get(cursor).ok_or_else(|| name_len_error(data))?;
        match len {
            0 => {
                if !jumped {
                    *pos = cursor + 1;
                }
                return Ok(name);
            }
            len if len & 0xc0 == 0xc0 => {
                let low = *data.get(cursor + 1).ok_or_else(|| name_len_error(data))?;
                if !jumped {
                    *pos = cursor + 2;
                }
                jumped = true;
                jumps += 1;
                // each pointer must make progress; a generous cap
                // suffices to reject cycles
                if jumps > 127 {
                    return Err(ContentError::DnsPointerLoop.into());
                }
                cursor = (usize::from(len & 0x3f) << 8) | usize::from(low);
            }
            len if len & 0xc0 != 0 => {
                // 0x40/0x80 label types were never standardized
                return Err(ContentError::DnsLabelTooLong { len: len.into() }.into());
            }
            len => {
                let len = usize::from(len);
                let label = data
                    .get(cursor + 1..cursor + 1 + len)
                    .ok_or_else(|| name_len_error(data))?;
                if !name.is_empty() {
                    name.push('.');
                }
                name.push_str(&String::from_utf8_lossy(label));
                if name.len() > DnsMessage::MAX_NAME_LEN {
                    return Err(ContentError::DnsNameTooLong { len: name.len() }.into());
                }
                cursor += 1 + len;
                if !jumped {
                    *pos = cursor;
                }
            }
        }
    }
}

fn decode_record(data: &[u8], pos: &mut usize) -> Result<DnsResourceRecord, ParseError> {
    let name = decode_name(data, pos)?;
    let mut fields = InputStream::new(&data[*pos..], Layer::DnsMessage);
    let record_type = DnsRecordType(fields.read_u16_be()?);
    let record_class = fields.read_u16_be()?;
    let ttl = fields.read_u32_be()?;
    let rdlength = usize::from(fields.read_u16_be()?);
    let data_start = *pos + 10;
    let rdata = data
        .get(data_start..data_start + rdlength)
        .ok_or_else(|| name_len_error(data))?;
    *pos = data_start + rdlength;

    let record_data = match record_type {
        DnsRecordType::A if rdlength == 4 => {
            DnsRecordData::A(Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]))
        }
        DnsRecordType::AAAA if rdlength == 16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(rdata);
            DnsRecordData::Aaaa(Ipv6Addr::from(octets))
        }
        DnsRecordType::CNAME => {
            let mut cursor = data_start;
            DnsRecordData::CName(decode_name(data, &mut cursor)?)
        }
        DnsRecordType::NS => {
            let mut cursor = data_start;
            DnsRecordData::Ns(decode_name(data, &mut cursor)?)
        }
        DnsRecordType::PTR => {
            let mut cursor = data_start;
            DnsRecordData::Ptr(decode_name(data, &mut cursor)?)
        }
        DnsRecordType::MX if rdlength >= 3 => {
            let mut cursor = data_start + 2;
            DnsRecordData::Mx {
                preference: u16::from_be_bytes([rdata[0], rdata[1]]),
                exchange: decode_name(data, &mut cursor)?,
            }
        }
        DnsRecordType::SOA => {
            let mut cursor = data_start;
            let primary_ns = decode_name(data, &mut cursor)?;
            let mailbox = decode_name(data, &mut cursor)?;
            let mut numbers = InputStream::new(
                data.get(cursor..).ok_or_else(|| name_len_error(data))?,
                Layer::DnsMessage,
            );
            DnsRecordData::Soa {
                primary_ns,
                mailbox,
                serial: numbers.read_u32_be()?,
                refresh: numbers.read_u32_be()?,
                retry: numbers.read_u32_be()?,
                expire: numbers.read_u32_be()?,
                minimum_ttl: numbers.read_u32_be()?,
            }
        }
        DnsRecordType::TXT => {
            let mut strings = Vec::new();
            let mut rest = rdata;
            while let Some((&len, tail)) = rest.split_first() {
                let len = usize::from(len).min(tail.len());
                strings.push(tail[..len].to_vec());
                rest = &tail[len..];
            }
            DnsRecordData::Txt(strings)
        }
        _ => DnsRecordData::Raw(rdata.to_vec()),
    };
    Ok(DnsResourceRecord {
        name,
        record_type,
        record_class,
        ttl,
        data: record_data,
    })
}

fn name_len_error(data: &[u8]) -> ParseError {
    LenError {
        required_len: data.len() + 1,
        len: data.len(),
        layer: Layer::DnsMessage,
        layer_start_offset: 0,
    }
    .into()
}

/// Tracks the offsets of already written name suffixes so later names
/// can point at them.
#[derive(Default)]
struct NameEncoder {
    suffixes: HashMap<String, u16>,
}

impl NameEncoder {
    fn write_name(&mut self, out: &mut Vec<u8>, name: &str) -> Result<(), InvalidArgError> {
        let mut rest = name;
        loop {
            if rest.is_empty() {
                out.push(0);
                return Ok(());
            }
            if let Some(&offset) = self.suffixes.get(rest) {
                out.extend_from_slice(&(0xc000u16 | offset).to_be_bytes());
                return Ok(());
            }
            let offset = out.len();
            if offset <= 0x3fff {
                self.suffixes.insert(rest.to_string(), offset as u16);
            }
            let (label, tail) = match rest.split_once('.') {
                Some((label, tail)) => (label, tail),
                None => (rest, ""),
            };
            if label.is_empty() {
                return Err(InvalidArgError::DnsEmptyLabel);
            }
            if label.len() > DnsMessage::MAX_LABEL_LEN {
                return Err(InvalidArgError::DnsLabelTooLong { len: label.len() });
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
            rest = tail;
        }
    }
}
