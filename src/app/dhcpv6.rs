use core::net::Ipv6Addr;

use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{OptionList, Pdu, TaggedOption};

/// Message type of a [`Dhcpv6Message`].
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dhcpv6MessageType(pub u8);

impl Dhcpv6MessageType {
    pub const SOLICIT: Dhcpv6MessageType = Dhcpv6MessageType(1);
    pub const ADVERTISE: Dhcpv6MessageType = Dhcpv6MessageType(2);
    pub const REQUEST: Dhcpv6MessageType = Dhcpv6MessageType(3);
    pub const CONFIRM: Dhcpv6MessageType = Dhcpv6MessageType(4);
    pub const RENEW: Dhcpv6MessageType = Dhcpv6MessageType(5);
    pub const REBIND: Dhcpv6MessageType = Dhcpv6MessageType(6);
    pub const REPLY: Dhcpv6MessageType = Dhcpv6MessageType(7);
    pub const RELEASE: Dhcpv6MessageType = Dhcpv6MessageType(8);
    pub const DECLINE: Dhcpv6MessageType = Dhcpv6MessageType(9);
    pub const RECONFIGURE: Dhcpv6MessageType = Dhcpv6MessageType(10);
    pub const INFORMATION_REQUEST: Dhcpv6MessageType = Dhcpv6MessageType(11);
    pub const RELAY_FORW: Dhcpv6MessageType = Dhcpv6MessageType(12);
    pub const RELAY_REPL: Dhcpv6MessageType = Dhcpv6MessageType(13);

    /// True for the two relay agent message types (which use a
    /// different fixed header).
    pub fn is_relay(self) -> bool {
        self == Dhcpv6MessageType::RELAY_FORW || self == Dhcpv6MessageType::RELAY_REPL
    }
}

impl core::fmt::Debug for Dhcpv6MessageType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Dhcpv6MessageType::SOLICIT => write!(f, "SOLICIT"),
            Dhcpv6MessageType::ADVERTISE => write!(f, "ADVERTISE"),
            Dhcpv6MessageType::REQUEST => write!(f, "REQUEST"),
            Dhcpv6MessageType::REPLY => write!(f, "REPLY"),
            Dhcpv6MessageType::RELAY_FORW => write!(f, "RELAY-FORW"),
            Dhcpv6MessageType::RELAY_REPL => write!(f, "RELAY-REPL"),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Option codes of a [`Dhcpv6Message`].
pub mod dhcpv6_option {
    pub const CLIENT_ID: u16 = 1;
    pub const SERVER_ID: u16 = 2;
    pub const IA_NA: u16 = 3;
    pub const IA_TA: u16 = 4;
    pub const IA_ADDR: u16 = 5;
    pub const OPTION_REQUEST: u16 = 6;
    pub const PREFERENCE: u16 = 7;
    pub const ELAPSED_TIME: u16 = 8;
    pub const RELAY_MESSAGE: u16 = 9;
    pub const AUTHENTICATION: u16 = 11;
    pub const SERVER_UNICAST: u16 = 12;
    pub const STATUS_CODE: u16 = 13;
    pub const RAPID_COMMIT: u16 = 14;
    pub const USER_CLASS: u16 = 15;
    pub const VENDOR_CLASS: u16 = 16;
    pub const VENDOR_INFO: u16 = 17;
    pub const INTERFACE_ID: u16 = 18;
    pub const RECONFIGURE_MSG: u16 = 19;
    pub const RECONFIGURE_ACCEPT: u16 = 20;
}

/// DHCP unique identifier (client/server id option payload).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Duid {
    /// DUID-LLT: link layer address plus time.
    LinkLayerTime {
        hw_type: u16,
        time: u32,
        addr: Vec<u8>,
    },
    /// DUID-EN: enterprise number plus opaque id.
    EnterpriseNumber { enterprise: u32, id: Vec<u8> },
    /// DUID-LL: link layer address.
    LinkLayer { hw_type: u16, addr: Vec<u8> },
    /// Any other DUID encoding.
    Raw { duid_type: u16, data: Vec<u8> },
}

impl Duid {
    pub fn parse(data: &[u8]) -> Option<Duid> {
        if data.len() < 2 {
            return None;
        }
        let duid_type = u16::from_be_bytes([data[0], data[1]]);
        let rest = &data[2..];
        Some(match duid_type {
            1 if rest.len() >= 6 => Duid::LinkLayerTime {
                hw_type: u16::from_be_bytes([rest[0], rest[1]]),
                time: u32::from_be_bytes([rest[2], rest[3], rest[4], rest[5]]),
                addr: rest[6..].to_vec(),
            },
            2 if rest.len() >= 4 => Duid::EnterpriseNumber {
                enterprise: u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]),
                id: rest[4..].to_vec(),
            },
            3 if rest.len() >= 2 => Duid::LinkLayer {
                hw_type: u16::from_be_bytes([rest[0], rest[1]]),
                addr: rest[2..].to_vec(),
            },
            _ => Duid::Raw {
                duid_type,
                data: rest.to_vec(),
            },
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Duid::LinkLayerTime {
                hw_type,
                time,
                addr,
            } => {
                out.extend_from_slice(&1u16.to_be_bytes());
                out.extend_from_slice(&hw_type.to_be_bytes());
                out.extend_from_slice(&time.to_be_bytes());
                out.extend_from_slice(addr);
            }
            Duid::EnterpriseNumber { enterprise, id } => {
                out.extend_from_slice(&2u16.to_be_bytes());
                out.extend_from_slice(&enterprise.to_be_bytes());
                out.extend_from_slice(id);
            }
            Duid::LinkLayer { hw_type, addr } => {
                out.extend_from_slice(&3u16.to_be_bytes());
                out.extend_from_slice(&hw_type.to_be_bytes());
                out.extend_from_slice(addr);
            }
            Duid::Raw { duid_type, data } => {
                out.extend_from_slice(&duid_type.to_be_bytes());
                out.extend_from_slice(data);
            }
        }
        out
    }
}

/// Identity association for non-temporary addresses (IA_NA option).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IaNa {
    pub iaid: u32,
    pub t1: u32,
    pub t2: u32,
    /// Encapsulated options (IA_ADDR & friends), kept raw.
    pub options: Vec<u8>,
}

/// Fixed part of a [`Dhcpv6Message`]: client/server messages carry a
/// 3 byte transaction id, relay messages a hop count & two addresses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Dhcpv6Transaction {
    ClientServer { transaction_id: [u8; 3] },
    Relay {
        hop_count: u8,
        link_addr: Ipv6Addr,
        peer_addr: Ipv6Addr,
    },
}

/// DHCPv6 message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dhcpv6Message {
    pub msg_type: Dhcpv6MessageType,
    pub transaction: Dhcpv6Transaction,
    pub options: OptionList<u16>,
}

impl Dhcpv6Message {
    pub fn new(msg_type: Dhcpv6MessageType, transaction_id: [u8; 3]) -> Dhcpv6Message {
        Dhcpv6Message {
            msg_type,
            transaction: Dhcpv6Transaction::ClientServer { transaction_id },
            options: OptionList::new(),
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dhcpv6Message);
        let msg_type = Dhcpv6MessageType(stream.read_u8()?);
        let transaction = if msg_type.is_relay() {
            Dhcpv6Transaction::Relay {
                hop_count: stream.read_u8()?,
                link_addr: Ipv6Addr::from(stream.read_array::<16>()?),
                peer_addr: Ipv6Addr::from(stream.read_array::<16>()?),
            }
        } else {
            Dhcpv6Transaction::ClientServer {
                transaction_id: stream.read_array()?,
            }
        };
        let mut options = OptionList::new();
        while stream.remaining() > 0 {
            let code = stream.read_u16_be()?;
            let len = usize::from(stream.read_u16_be()?);
            options.push(TaggedOption::new(code, stream.read_bytes(len)?.to_vec()));
        }
        Ok(Pdu::new(Dhcpv6Message {
            msg_type,
            transaction,
            options,
        }))
    }

    pub fn header_len(&self) -> usize {
        let fixed = match self.transaction {
            Dhcpv6Transaction::ClientServer { .. } => 4,
            Dhcpv6Transaction::Relay { .. } => 34,
        };
        fixed
            + self
                .options
                .iter()
                .map(|o| 4 + o.data.len())
                .sum::<usize>()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dhcpv6Message);
        stream.write_u8(self.msg_type.0)?;
        match &self.transaction {
            Dhcpv6Transaction::ClientServer { transaction_id } => {
                stream.write_bytes(transaction_id)?
            }
            Dhcpv6Transaction::Relay {
                hop_count,
                link_addr,
                peer_addr,
            } => {
                stream.write_u8(*hop_count)?;
                stream.write_bytes(&link_addr.octets())?;
                stream.write_bytes(&peer_addr.octets())?;
            }
        }
        for option in &self.options {
            stream.write_u16_be(option.kind)?;
            stream.write_u16_be(option.data.len() as u16)?;
            stream.write_bytes(&option.data)?;
        }
        Ok(())
    }

    /// Replaces the first option with the given code (appending it if
    /// not yet present).
    pub fn set_option(&mut self, kind: u16, data: Vec<u8>) {
        match self.options.find_first_mut(kind) {
            Some(option) => option.data = data,
            None => self.options.push(TaggedOption::new(kind, data)),
        }
    }

    pub fn client_id(&self) -> Option<Duid> {
        Duid::parse(&self.options.find_first(dhcpv6_option::CLIENT_ID)?.data)
    }

    pub fn set_client_id(&mut self, duid: &Duid) {
        self.set_option(dhcpv6_option::CLIENT_ID, duid.encode());
    }

    pub fn server_id(&self) -> Option<Duid> {
        Duid::parse(&self.options.find_first(dhcpv6_option::SERVER_ID)?.data)
    }

    pub fn set_server_id(&mut self, duid: &Duid) {
        self.set_option(dhcpv6_option::SERVER_ID, duid.encode());
    }

    pub fn elapsed_time(&self) -> Option<u16> {
        let data = &self.options.find_first(dhcpv6_option::ELAPSED_TIME)?.data;
        let bytes: [u8; 2] = data.as_slice().try_into().ok()?;
        Some(u16::from_be_bytes(bytes))
    }

    pub fn set_elapsed_time(&mut self, hundredths: u16) {
        self.set_option(
            dhcpv6_option::ELAPSED_TIME,
            hundredths.to_be_bytes().to_vec(),
        );
    }

    /// Requested option codes (option request option).
    pub fn option_request(&self) -> Option<Vec<u16>> {
        let data = &self.options.find_first(dhcpv6_option::OPTION_REQUEST)?.data;
        if data.len() % 2 != 0 {
            return None;
        }
        Some(
            data.chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect(),
        )
    }

    pub fn set_option_request(&mut self, codes: &[u16]) {
        self.set_option(
            dhcpv6_option::OPTION_REQUEST,
            codes.iter().flat_map(|c| c.to_be_bytes()).collect(),
        );
    }

    pub fn preference(&self) -> Option<u8> {
        self.options
            .find_first(dhcpv6_option::PREFERENCE)?
            .data
            .first()
            .copied()
    }

    pub fn rapid_commit(&self) -> bool {
        self.options.find_first(dhcpv6_option::RAPID_COMMIT).is_some()
    }

    pub fn set_rapid_commit(&mut self) {
        if !self.rapid_commit() {
            self.options
                .push(TaggedOption::new(dhcpv6_option::RAPID_COMMIT, Vec::new()));
        }
    }

    /// Status code option: numeric code plus UTF-8 message.
    pub fn status_code(&self) -> Option<(u16, String)> {
        let data = &self.options.find_first(dhcpv6_option::STATUS_CODE)?.data;
        if data.len() < 2 {
            return None;
        }
        Some((
            u16::from_be_bytes([data[0], data[1]]),
            String::from_utf8_lossy(&data[2..]).into_owned(),
        ))
    }

    pub fn ia_na(&self) -> Option<IaNa> {
        let data = &self.options.find_first(dhcpv6_option::IA_NA)?.data;
        if data.len() < 12 {
            return None;
        }
        Some(IaNa {
            iaid: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
            t1: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            t2: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
            options: data[12..].to_vec(),
        })
    }

    pub fn set_ia_na(&mut self, ia: &IaNa) {
        let mut data = Vec::with_capacity(12 + ia.options.len());
        data.extend_from_slice(&ia.iaid.to_be_bytes());
        data.extend_from_slice(&ia.t1.to_be_bytes());
        data.extend_from_slice(&ia.t2.to_be_bytes());
        data.extend_from_slice(&ia.options);
        self.set_option(dhcpv6_option::IA_NA, data);
    }

    pub fn relay_message(&self) -> Option<&[u8]> {
        Some(&self.options.find_first(dhcpv6_option::RELAY_MESSAGE)?.data)
    }

    pub fn interface_id(&self) -> Option<&[u8]> {
        Some(&self.options.find_first(dhcpv6_option::INTERFACE_ID)?.data)
    }
}
