use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::{dispatch, AnyLayer, EtherType, Pdu, VlanId, VlanPcp};

/// VLAN tag, used for both the customer tag (802.1Q, tag
/// [`crate::LayerType::Dot1Q`]) and the service tag of Q-in-Q frames
/// (802.1AD, tag [`crate::LayerType::Dot1AD`]).
///
/// Which of the two a tag is on the wire is decided by the ether type
/// of the header *in front of it* (0x8100 vs 0x88a8); the tag itself
/// carries the TCI plus the ether type of its payload.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VlanHeader {
    /// Priority code point (3 bits).
    pub pcp: VlanPcp,
    /// Drop eligible indicator.
    pub drop_eligible: bool,
    /// VLAN identifier (12 bits).
    pub vlan_id: VlanId,
    /// Ether type of the payload.
    pub ether_type: EtherType,
}

impl VlanHeader {
    /// Serialized size of the tag in bytes.
    pub const LEN: usize = 4;

    pub fn new(vlan_id: VlanId) -> VlanHeader {
        VlanHeader {
            pcp: VlanPcp::ZERO,
            drop_eligible: false,
            vlan_id,
            ether_type: EtherType(0),
        }
    }

    /// Decode a customer VLAN tag (802.1Q) & its payload chain.
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let (header, rest) = VlanHeader::parse_header(data)?;
        let mut pdu = Pdu::new(AnyLayer::Dot1Q(header.clone()));
        if !rest.is_empty() {
            pdu.set_child(dispatch::child_from_ether_type(header.ether_type, rest));
        }
        Ok(pdu)
    }

    /// Decode a service VLAN tag (802.1AD) & its payload chain.
    pub fn parse_dot1ad(data: &[u8]) -> Result<Pdu, ParseError> {
        let (header, rest) = VlanHeader::parse_header(data)?;
        let mut pdu = Pdu::new(AnyLayer::Dot1AD(header.clone()));
        if !rest.is_empty() {
            pdu.set_child(dispatch::child_from_ether_type(header.ether_type, rest));
        }
        Ok(pdu)
    }

    fn parse_header(data: &[u8]) -> Result<(VlanHeader, &[u8]), ParseError> {
        let mut stream = InputStream::new(data, Layer::VlanHeader);
        let tci = stream.read_u16_be()?;
        let header = VlanHeader {
            pcp: VlanPcp::from_wire((tci >> 13) as u8),
            drop_eligible: 0 != tci & 0x1000,
            vlan_id: VlanId::from_wire(tci),
            ether_type: EtherType(stream.read_u16_be()?),
        };
        Ok((header, stream.rest()))
    }

    /// Wraps the tag into a chain marked as a service tag (802.1AD).
    /// The plain `From`/`Div` conversions mark it as a customer tag.
    pub fn into_dot1ad(self) -> Pdu {
        Pdu::new(AnyLayer::Dot1AD(self))
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        VlanHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let ether_type = child
            .and_then(|c| dispatch::ether_type_of(c.layer_type))
            .unwrap_or(self.ether_type);
        let tci = (u16::from(self.pcp.value()) << 13)
            | if self.drop_eligible { 0x1000 } else { 0 }
            | self.vlan_id.value();
        let mut stream = OutputStream::new(&mut buf[..VlanHeader::LEN], Layer::VlanHeader);
        stream.write_u16_be(tci)?;
        stream.write_u16_be(ether_type.0)
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        match VlanHeader::parse_header(data) {
            Ok((header, rest)) if header.vlan_id == self.vlan_id => ResponseMatch::Descend(rest),
            _ => ResponseMatch::No,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Ethernet2Header, LayerType, MacAddr};

    // 802.1Q tag: pcp 5, DEI set, vid 0x123, payload type 0x1234
    const SAMPLE: [u8; 6] = [0xb1, 0x23, 0x12, 0x34, 0xab, 0xcd];

    #[test]
    fn parse() {
        let pdu = VlanHeader::parse(&SAMPLE).unwrap();
        let vlan = match &pdu.layer {
            AnyLayer::Dot1Q(vlan) => vlan,
            _ => panic!(),
        };
        assert_eq!(5, vlan.pcp.value());
        assert!(vlan.drop_eligible);
        assert_eq!(0x123, vlan.vlan_id.value());
        assert_eq!(EtherType(0x1234), vlan.ether_type);
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
    }

    #[test]
    fn round_trip() {
        let pdu = VlanHeader::parse(&SAMPLE).unwrap();
        assert_eq!(&SAMPLE[..], &pdu.serialize().unwrap()[..]);
        let pdu = VlanHeader::parse_dot1ad(&SAMPLE).unwrap();
        assert_eq!(LayerType::Dot1AD, pdu.layer_type());
        assert_eq!(&SAMPLE[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn qinq_composition() {
        let eth = Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST);
        let chain = eth
            / VlanHeader::new(VlanId::try_new(100).unwrap()).into_dot1ad()
            / VlanHeader::new(VlanId::try_new(200).unwrap());
        let bytes = chain.serialize().unwrap();
        // outer tag announced as 802.1AD, inner as 802.1Q
        assert_eq!(&[0x88, 0xa8], &bytes[12..14]);
        assert_eq!(100, u16::from_be_bytes([bytes[14], bytes[15]]) & 0xfff);
        assert_eq!(&[0x81, 0x00], &bytes[16..18]);
        assert_eq!(200, u16::from_be_bytes([bytes[18], bytes[19]]) & 0xfff);
    }
}
