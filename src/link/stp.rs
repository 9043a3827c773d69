use crate::err::{
    ContentError, Layer, ParseError, SerializeError, ValueTooBigError, ValueType,
};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{HwAddress, MacAddr, Pdu};

/// Bridge identifier of an STP BPDU: 4 bit priority (in units of 4096),
/// 12 bit system id extension and the bridge MAC address.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BridgeId {
    priority: u8,
    system_id_extension: u16,
    pub address: MacAddr,
}

impl BridgeId {
    /// Maximum value of the priority component.
    pub const MAX_PRIORITY: u8 = 0b1111;

    /// Maximum value of the system id extension component.
    pub const MAX_SYSTEM_ID_EXTENSION: u16 = 0x0fff;

    pub fn try_new(
        priority: u8,
        system_id_extension: u16,
        address: MacAddr,
    ) -> Result<BridgeId, ValueTooBigError<u16>> {
        if priority > BridgeId::MAX_PRIORITY {
            return Err(ValueTooBigError {
                actual: priority.into(),
                max_allowed: BridgeId::MAX_PRIORITY.into(),
                value_type: ValueType::StpBridgePriority,
            });
        }
        if system_id_extension > BridgeId::MAX_SYSTEM_ID_EXTENSION {
            return Err(ValueTooBigError {
                actual: system_id_extension,
                max_allowed: BridgeId::MAX_SYSTEM_ID_EXTENSION,
                value_type: ValueType::StpSystemIdExtension,
            });
        }
        Ok(BridgeId {
            priority,
            system_id_extension,
            address,
        })
    }

    /// Priority component (4 bits, in units of 4096).
    #[inline]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// System id extension component (12 bits).
    #[inline]
    pub fn system_id_extension(&self) -> u16 {
        self.system_id_extension
    }

    fn from_wire(bytes: [u8; 8]) -> BridgeId {
        BridgeId {
            priority: bytes[0] >> 4,
            system_id_extension: (u16::from(bytes[0] & 0xf) << 8) | u16::from(bytes[1]),
            address: HwAddress([bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    fn to_wire(self) -> [u8; 8] {
        let a = self.address.octets();
        [
            (self.priority << 4) | ((self.system_id_extension >> 8) as u8),
            (self.system_id_extension & 0xff) as u8,
            a[0],
            a[1],
            a[2],
            a[3],
            a[4],
            a[5],
        ]
    }
}

/// Spanning tree protocol BPDU (IEEE 802.1D configuration format).
///
/// The timer fields (`message_age` & friends) are kept in the on-wire
/// unit of 1/256th seconds.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StpBpdu {
    pub version: u8,
    pub bpdu_type: u8,
    pub flags: u8,
    pub root_id: BridgeId,
    pub root_path_cost: u32,
    pub bridge_id: BridgeId,
    pub port_id: u16,
    pub message_age: u16,
    pub max_age: u16,
    pub hello_time: u16,
    pub forward_delay: u16,
}

impl StpBpdu {
    /// Serialized size of the BPDU in bytes.
    pub const LEN: usize = 35;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::StpBpdu);
        let protocol_id = stream.read_u16_be()?;
        if protocol_id != 0 {
            return Err(ContentError::StpUnexpectedProtocolId { protocol_id }.into());
        }
        let header = StpBpdu {
            version: stream.read_u8()?,
            bpdu_type: stream.read_u8()?,
            flags: stream.read_u8()?,
            root_id: BridgeId::from_wire(stream.read_array()?),
            root_path_cost: stream.read_u32_be()?,
            bridge_id: BridgeId::from_wire(stream.read_array()?),
            port_id: stream.read_u16_be()?,
            message_age: stream.read_u16_be()?,
            max_age: stream.read_u16_be()?,
            hello_time: stream.read_u16_be()?,
            forward_delay: stream.read_u16_be()?,
        };
        Ok(Pdu::new(header))
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        StpBpdu::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(&mut buf[..StpBpdu::LEN], Layer::StpBpdu);
        stream.write_u16_be(0)?; // protocol identifier
        stream.write_u8(self.version)?;
        stream.write_u8(self.bpdu_type)?;
        stream.write_u8(self.flags)?;
        stream.write_bytes(&self.root_id.to_wire())?;
        stream.write_u32_be(self.root_path_cost)?;
        stream.write_bytes(&self.bridge_id.to_wire())?;
        stream.write_u16_be(self.port_id)?;
        stream.write_u16_be(self.message_age)?;
        stream.write_u16_be(self.max_age)?;
        stream.write_u16_be(self.hello_time)?;
        stream.write_u16_be(self.forward_delay)
    }
}
