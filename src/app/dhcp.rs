use core::net::Ipv4Addr;

use crate::err::{ContentError, Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{HwAddress, MacAddr, OptionList, Pdu, TaggedOption};

/// Value of the DHCP message type option (option 53).
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DhcpMessageType(pub u8);

impl DhcpMessageType {
    pub const DISCOVER: DhcpMessageType = DhcpMessageType(1);
    pub const OFFER: DhcpMessageType = DhcpMessageType(2);
    pub const REQUEST: DhcpMessageType = DhcpMessageType(3);
    pub const DECLINE: DhcpMessageType = DhcpMessageType(4);
    pub const ACK: DhcpMessageType = DhcpMessageType(5);
    pub const NAK: DhcpMessageType = DhcpMessageType(6);
    pub const RELEASE: DhcpMessageType = DhcpMessageType(7);
    pub const INFORM: DhcpMessageType = DhcpMessageType(8);
}

impl core::fmt::Debug for DhcpMessageType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            DhcpMessageType::DISCOVER => write!(f, "DISCOVER"),
            DhcpMessageType::OFFER => write!(f, "OFFER"),
            DhcpMessageType::REQUEST => write!(f, "REQUEST"),
            DhcpMessageType::DECLINE => write!(f, "DECLINE"),
            DhcpMessageType::ACK => write!(f, "ACK"),
            DhcpMessageType::NAK => write!(f, "NAK"),
            DhcpMessageType::RELEASE => write!(f, "RELEASE"),
            DhcpMessageType::INFORM => write!(f, "INFORM"),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Option codes of the typed helpers on [`DhcpMessage`].
pub mod dhcp_option {
    pub const PAD: u8 = 0;
    pub const SUBNET_MASK: u8 = 1;
    pub const ROUTERS: u8 = 3;
    pub const DOMAIN_NAME_SERVERS: u8 = 6;
    pub const DOMAIN_NAME: u8 = 15;
    pub const BROADCAST_ADDRESS: u8 = 28;
    pub const REQUESTED_IP_ADDRESS: u8 = 50;
    pub const IP_ADDRESS_LEASE_TIME: u8 = 51;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const SERVER_IDENTIFIER: u8 = 54;
    pub const PARAMETER_REQUEST_LIST: u8 = 55;
    pub const RENEWAL_TIME: u8 = 58;
    pub const REBINDING_TIME: u8 = 59;
    pub const END: u8 = 255;
}

/// DHCPv4 message, layered on the fixed 236 byte BOOTP frame followed
/// by the magic cookie & the option stream.
///
/// The option list preserves order & duplicates; pad options are kept
/// so parsed messages re-serialize byte exact. The end option (255) is
/// written automatically.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhcpMessage {
    /// 1 = BOOTREQUEST, 2 = BOOTREPLY.
    pub op: u8,
    /// Hardware type (1 = Ethernet).
    pub htype: u8,
    /// Hardware address length.
    pub hlen: u8,
    pub hops: u8,
    /// Transaction id.
    pub xid: u32,
    pub secs: u16,
    pub flags: u16,
    /// Client address (when already bound).
    pub ciaddr: Ipv4Addr,
    /// "Your" address offered by the server.
    pub yiaddr: Ipv4Addr,
    /// Next server address.
    pub siaddr: Ipv4Addr,
    /// Relay agent address.
    pub giaddr: Ipv4Addr,
    /// Client hardware address (zero padded to 16 bytes).
    pub chaddr: [u8; 16],
    /// Server host name (zero padded).
    pub sname: [u8; 64],
    /// Boot file name (zero padded).
    pub file: [u8; 128],
    pub options: OptionList<u8>,
    /// True if the option stream is terminated with the end option
    /// (always the case for crafted messages).
    pub end_option: bool,
    /// Padding bytes after the end option.
    pub trailing: Vec<u8>,
}

impl Default for DhcpMessage {
    fn default() -> DhcpMessage {
        DhcpMessage {
            op: 1,
            htype: 1,
            hlen: 6,
            hops: 0,
            xid: 0,
            secs: 0,
            flags: 0,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr: [0; 16],
            sname: [0; 64],
            file: [0; 128],
            options: OptionList::new(),
            end_option: true,
            trailing: Vec::new(),
        }
    }
}

impl DhcpMessage {
    /// Size of the fixed BOOTP frame in bytes.
    pub const BOOTP_LEN: usize = 236;

    /// The magic cookie announcing the option stream.
    pub const MAGIC_COOKIE: u32 = 0x6382_5363;

    /// Creates a discover message for the given client hardware address.
    pub fn discover(xid: u32, client: MacAddr) -> DhcpMessage {
        let mut message = DhcpMessage {
            xid,
            ..DhcpMessage::default()
        };
        message.chaddr[..6].copy_from_slice(&client.octets());
        message.set_message_type(DhcpMessageType::DISCOVER);
        message
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::DhcpMessage);
        let mut message = DhcpMessage {
            op: stream.read_u8()?,
            htype: stream.read_u8()?,
            hlen: stream.read_u8()?,
            hops: stream.read_u8()?,
            xid: stream.read_u32_be()?,
            secs: stream.read_u16_be()?,
            flags: stream.read_u16_be()?,
            ciaddr: Ipv4Addr::from(stream.read_array::<4>()?),
            yiaddr: Ipv4Addr::from(stream.read_array::<4>()?),
            siaddr: Ipv4Addr::from(stream.read_array::<4>()?),
            giaddr: Ipv4Addr::from(stream.read_array::<4>()?),
            chaddr: stream.read_array()?,
            sname: stream.read_array()?,
            file: stream.read_array()?,
            end_option: false,
            ..DhcpMessage::default()
        };
        let cookie = stream.read_u32_be()?;
        if cookie != DhcpMessage::MAGIC_COOKIE {
            return Err(ContentError::DhcpBadMagicCookie { found: cookie }.into());
        }
        while stream.remaining() > 0 {
            let code = stream.read_u8()?;
            match code {
                dhcp_option::PAD => message.options.push(TaggedOption::new(code, Vec::new())),
                dhcp_option::END => {
                    message.end_option = true;
                    message.trailing = stream.rest().to_vec();
                    break;
                }
                _ => {
                    let len = usize::from(stream.read_u8()?);
                    message
                        .options
                        .push(TaggedOption::new(code, stream.read_bytes(len)?.to_vec()));
                }
            }
        }
        Ok(Pdu::new(message))
    }

    fn options_len(&self) -> usize {
        self.options
            .iter()
            .map(|o| match o.kind {
                dhcp_option::PAD => 1,
                _ => 2 + o.data.len(),
            })
            .sum()
    }

    pub fn header_len(&self) -> usize {
        DhcpMessage::BOOTP_LEN
            + 4
            + self.options_len()
            + usize::from(self.end_option)
            + self.trailing.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::DhcpMessage);
        stream.write_u8(self.op)?;
        stream.write_u8(self.htype)?;
        stream.write_u8(self.hlen)?;
        stream.write_u8(self.hops)?;
        stream.write_u32_be(self.xid)?;
        stream.write_u16_be(self.secs)?;
        stream.write_u16_be(self.flags)?;
        stream.write_bytes(&self.ciaddr.octets())?;
        stream.write_bytes(&self.yiaddr.octets())?;
        stream.write_bytes(&self.siaddr.octets())?;
        stream.write_bytes(&self.giaddr.octets())?;
        stream.write_bytes(&self.chaddr)?;
        stream.write_bytes(&self.sname)?;
        stream.write_bytes(&self.file)?;
        stream.write_u32_be(DhcpMessage::MAGIC_COOKIE)?;
        for option in &self.options {
            stream.write_u8(option.kind)?;
            if option.kind != dhcp_option::PAD {
                stream.write_u8(option.data.len() as u8)?;
                stream.write_bytes(&option.data)?;
            }
        }
        if self.end_option {
            stream.write_u8(dhcp_option::END)?;
        }
        stream.write_bytes(&self.trailing)
    }

    /// Client hardware address interpreted as a MAC address.
    pub fn client_hw_addr(&self) -> MacAddr {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&self.chaddr[..6]);
        HwAddress(octets)
    }

    /// The message type option (option 53).
    pub fn message_type(&self) -> Option<DhcpMessageType> {
        self.options
            .find_first(dhcp_option::MESSAGE_TYPE)
            .and_then(|o| o.data.first().copied())
            .map(DhcpMessageType)
    }

    pub fn set_message_type(&mut self, message_type: DhcpMessageType) {
        self.set_option(dhcp_option::MESSAGE_TYPE, vec![message_type.0]);
    }

    fn ipv4_option(&self, kind: u8) -> Option<Ipv4Addr> {
        let data = &self.options.find_first(kind)?.data;
        let octets: [u8; 4] = data.as_slice().try_into().ok()?;
        Some(Ipv4Addr::from(octets))
    }

    fn ipv4_list_option(&self, kind: u8) -> Option<Vec<Ipv4Addr>> {
        let data = &self.options.find_first(kind)?.data;
        if data.is_empty() || data.len() % 4 != 0 {
            return None;
        }
        Some(
            data.chunks_exact(4)
                .map(|c| Ipv4Addr::new(c[0], c[1], c[2], c[3]))
                .collect(),
        )
    }

    fn u32_option(&self, kind: u8) -> Option<u32> {
        let data = &self.options.find_first(kind)?.data;
        let bytes: [u8; 4] = data.as_slice().try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }

    /// Replaces the first option with the given code (appending it if
    /// not yet present).
    pub fn set_option(&mut self, kind: u8, data: Vec<u8>) {
        match self.options.find_first_mut(kind) {
            Some(option) => option.data = data,
            None => self.options.push(TaggedOption::new(kind, data)),
        }
    }

    pub fn server_identifier(&self) -> Option<Ipv4Addr> {
        self.ipv4_option(dhcp_option::SERVER_IDENTIFIER)
    }

    pub fn set_server_identifier(&mut self, addr: Ipv4Addr) {
        self.set_option(dhcp_option::SERVER_IDENTIFIER, addr.octets().to_vec());
    }

    pub fn requested_ip_addr(&self) -> Option<Ipv4Addr> {
        self.ipv4_option(dhcp_option::REQUESTED_IP_ADDRESS)
    }

    pub fn set_requested_ip_addr(&mut self, addr: Ipv4Addr) {
        self.set_option(dhcp_option::REQUESTED_IP_ADDRESS, addr.octets().to_vec());
    }

    pub fn subnet_mask(&self) -> Option<Ipv4Addr> {
        self.ipv4_option(dhcp_option::SUBNET_MASK)
    }

    pub fn set_subnet_mask(&mut self, mask: Ipv4Addr) {
        self.set_option(dhcp_option::SUBNET_MASK, mask.octets().to_vec());
    }

    pub fn broadcast_addr(&self) -> Option<Ipv4Addr> {
        self.ipv4_option(dhcp_option::BROADCAST_ADDRESS)
    }

    pub fn set_broadcast_addr(&mut self, addr: Ipv4Addr) {
        self.set_option(dhcp_option::BROADCAST_ADDRESS, addr.octets().to_vec());
    }

    pub fn routers(&self) -> Option<Vec<Ipv4Addr>> {
        self.ipv4_list_option(dhcp_option::ROUTERS)
    }

    pub fn set_routers(&mut self, routers: &[Ipv4Addr]) {
        self.set_option(
            dhcp_option::ROUTERS,
            routers.iter().flat_map(|r| r.octets()).collect(),
        );
    }

    pub fn domain_name_servers(&self) -> Option<Vec<Ipv4Addr>> {
        self.ipv4_list_option(dhcp_option::DOMAIN_NAME_SERVERS)
    }

    pub fn set_domain_name_servers(&mut self, servers: &[Ipv4Addr]) {
        self.set_option(
            dhcp_option::DOMAIN_NAME_SERVERS,
            servers.iter().flat_map(|s| s.octets()).collect(),
        );
    }

    pub fn lease_time(&self) -> Option<u32> {
        self.u32_option(dhcp_option::IP_ADDRESS_LEASE_TIME)
    }

    pub fn set_lease_time(&mut self, seconds: u32) {
        self.set_option(
            dhcp_option::IP_ADDRESS_LEASE_TIME,
            seconds.to_be_bytes().to_vec(),
        );
    }

    pub fn renewal_time(&self) -> Option<u32> {
        self.u32_option(dhcp_option::RENEWAL_TIME)
    }

    pub fn set_renewal_time(&mut self, seconds: u32) {
        self.set_option(dhcp_option::RENEWAL_TIME, seconds.to_be_bytes().to_vec());
    }

    pub fn rebinding_time(&self) -> Option<u32> {
        self.u32_option(dhcp_option::REBINDING_TIME)
    }

    pub fn set_rebinding_time(&mut self, seconds: u32) {
        self.set_option(dhcp_option::REBINDING_TIME, seconds.to_be_bytes().to_vec());
    }

    pub fn domain_name(&self) -> Option<String> {
        let data = &self.options.find_first(dhcp_option::DOMAIN_NAME)?.data;
        Some(String::from_utf8_lossy(data).into_owned())
    }

    pub fn set_domain_name(&mut self, name: &str) {
        self.set_option(dhcp_option::DOMAIN_NAME, name.as_bytes().to_vec());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn discover_bytes() -> Vec<u8> {
        let mut message = DhcpMessage::discover(0x3903f326, "7a:1f:f4:39:ab:0d".parse().unwrap());
        message.set_requested_ip_addr(Ipv4Addr::new(192, 168, 0, 100));
        message.set_server_identifier(Ipv4Addr::new(192, 168, 0, 1));
        Pdu::from(message).serialize().unwrap()
    }

    #[test]
    fn parse_discover() {
        let bytes = discover_bytes();
        let pdu = DhcpMessage::parse(&bytes).unwrap();
        let dhcp = match &pdu.layer {
            crate::AnyLayer::Dhcp(dhcp) => dhcp,
            _ => panic!(),
        };
        assert_eq!(Some(DhcpMessageType::DISCOVER), dhcp.message_type());
        assert_eq!(Some(Ipv4Addr::new(192, 168, 0, 100)), dhcp.requested_ip_addr());
        assert_eq!(Some(Ipv4Addr::new(192, 168, 0, 1)), dhcp.server_identifier());
        assert_eq!(0x3903f326, dhcp.xid);
        assert_eq!("7a:1f:f4:39:ab:0d", dhcp.client_hw_addr().to_string());
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn rejects_bad_cookie() {
        let mut bytes = discover_bytes();
        bytes[236] = 0;
        assert!(matches!(
            DhcpMessage::parse(&bytes).unwrap_err().content_error(),
            Some(ContentError::DhcpBadMagicCookie { .. })
        ));
    }

    #[test]
    fn pads_and_trailing_are_preserved() {
        let mut bytes = discover_bytes();
        // insert a pad option in front of the end option & padding after
        let end = bytes.len() - 1;
        bytes.remove(end);
        bytes.push(dhcp_option::PAD);
        bytes.push(dhcp_option::END);
        bytes.extend_from_slice(&[0, 0, 0]);
        let pdu = DhcpMessage::parse(&bytes).unwrap();
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn typed_option_helpers() {
        let mut message = DhcpMessage::default();
        message.op = 2;
        message.set_message_type(DhcpMessageType::ACK);
        message.set_subnet_mask(Ipv4Addr::new(255, 255, 255, 0));
        message.set_routers(&[Ipv4Addr::new(10, 0, 0, 1)]);
        message.set_domain_name_servers(&[
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(1, 1, 1, 1),
        ]);
        message.set_lease_time(86400);
        message.set_renewal_time(43200);
        message.set_rebinding_time(75600);
        message.set_domain_name("lan.example.org");
        message.set_broadcast_addr(Ipv4Addr::new(10, 0, 0, 255));

        let bytes = Pdu::from(message).serialize().unwrap();
        let pdu = DhcpMessage::parse(&bytes).unwrap();
        let dhcp = match &pdu.layer {
            crate::AnyLayer::Dhcp(dhcp) => dhcp,
            _ => panic!(),
        };
        assert_eq!(Some(Ipv4Addr::new(255, 255, 255, 0)), dhcp.subnet_mask());
        assert_eq!(Some(vec![Ipv4Addr::new(10, 0, 0, 1)]), dhcp.routers());
        assert_eq!(
            Some(vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(1, 1, 1, 1)]),
            dhcp.domain_name_servers()
        );
        assert_eq!(Some(86400), dhcp.lease_time());
        assert_eq!(Some(43200), dhcp.renewal_time());
        assert_eq!(Some(75600), dhcp.rebinding_time());
        assert_eq!(Some("lan.example.org".to_string()), dhcp.domain_name());
        assert_eq!(Some(Ipv4Addr::new(10, 0, 0, 255)), dhcp.broadcast_addr());
    }
}
