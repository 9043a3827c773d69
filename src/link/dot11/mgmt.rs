use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{HwAddress, MacAddr, OptionList, Pdu, TaggedOption};

use super::{
    dot11_param, parse_tagged_params, tagged_params_len, write_tagged_params, Dot11Capabilities,
    Dot11MgmtHeader, RsnInformation,
};

/// Management frame subtype values.
pub mod mgmt_subtype {
    pub const ASSOC_REQ: u8 = 0;
    pub const ASSOC_RESP: u8 = 1;
    pub const REASSOC_REQ: u8 = 2;
    pub const REASSOC_RESP: u8 = 3;
    pub const PROBE_REQ: u8 = 4;
    pub const PROBE_RESP: u8 = 5;
    pub const BEACON: u8 = 8;
    pub const DISASSOC: u8 = 10;
    pub const AUTH: u8 = 11;
    pub const DEAUTH: u8 = 12;
    pub const ACTION: u8 = 13;
}

/// Generates the tagged parameter convenience accessors shared by the
/// management frame types.
macro_rules! tagged_param_accessors {
    ($($frame:ty,)*) => {
        $(
            impl $frame {
                /// The SSID tagged parameter.
                pub fn ssid(&self) -> Option<String> {
                    self.tagged_params
                        .find_first(dot11_param::SSID)
                        .map(|p| String::from_utf8_lossy(&p.data).into_owned())
                }

                /// Replaces (or appends) the SSID tagged parameter.
                pub fn set_ssid(&mut self, ssid: &str) {
                    match self.tagged_params.find_first_mut(dot11_param::SSID) {
                        Some(param) => param.data = ssid.as_bytes().to_vec(),
                        None => self.tagged_params.push(TaggedOption::new(
                            dot11_param::SSID,
                            ssid.as_bytes().to_vec(),
                        )),
                    }
                }

                /// The supported rates in Mbit/s (as announced in
                /// 500 kbit/s units, the basic-rate bit masked out).
                pub fn supported_rates(&self) -> Option<Vec<f32>> {
                    let param = self.tagged_params.find_first(dot11_param::SUPPORTED_RATES)?;
                    Some(
                        param
                            .data
                            .iter()
                            .map(|r| f32::from(r & 0x7f) / 2.0)
                            .collect(),
                    )
                }

                /// The current channel from the DS parameter set.
                pub fn ds_channel(&self) -> Option<u8> {
                    self.tagged_params
                        .find_first(dot11_param::DS_PARAMETER_SET)?
                        .data
                        .first()
                        .copied()
                }

                /// The decoded RSN information element.
                pub fn rsn_information(&self) -> Option<RsnInformation> {
                    RsnInformation::parse(
                        &self.tagged_params.find_first(dot11_param::RSN)?.data,
                    )
                }

                /// Appends (or replaces) the RSN information element.
                pub fn set_rsn_information(&mut self, rsn: &RsnInformation) {
                    let data = rsn.encode();
                    match self.tagged_params.find_first_mut(dot11_param::RSN) {
                        Some(param) => param.data = data,
                        None => self
                            .tagged_params
                            .push(TaggedOption::new(dot11_param::RSN, data)),
                    }
                }
            }
        )*
    };
}

tagged_param_accessors! {
    Dot11Beacon,
    Dot11ProbeReq,
    Dot11ProbeResp,
    Dot11AssocReq,
    Dot11AssocResp,
    Dot11ReassocReq,
    Dot11ReassocResp,
    Dot11Auth,
    Dot11Deauth,
    Dot11Disassoc,
}

/// Beacon frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11Beacon {
    pub header: Dot11MgmtHeader,
    /// TSF timestamp.
    pub timestamp: u64,
    /// Beacon interval in time units.
    pub interval: u16,
    pub capabilities: Dot11Capabilities,
    pub tagged_params: OptionList<u8>,
}

/// Probe request frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11ProbeReq {
    pub header: Dot11MgmtHeader,
    pub tagged_params: OptionList<u8>,
}

/// Probe response frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11ProbeResp {
    pub header: Dot11MgmtHeader,
    pub timestamp: u64,
    pub interval: u16,
    pub capabilities: Dot11Capabilities,
    pub tagged_params: OptionList<u8>,
}

/// Association request frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11AssocReq {
    pub header: Dot11MgmtHeader,
    pub capabilities: Dot11Capabilities,
    pub listen_interval: u16,
    pub tagged_params: OptionList<u8>,
}

/// Association response frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11AssocResp {
    pub header: Dot11MgmtHeader,
    pub capabilities: Dot11Capabilities,
    pub status_code: u16,
    /// Association id.
    pub aid: u16,
    pub tagged_params: OptionList<u8>,
}

/// Reassociation request frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11ReassocReq {
    pub header: Dot11MgmtHeader,
    pub capabilities: Dot11Capabilities,
    pub listen_interval: u16,
    pub current_ap: MacAddr,
    pub tagged_params: OptionList<u8>,
}

/// Reassociation response frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11ReassocResp {
    pub header: Dot11MgmtHeader,
    pub capabilities: Dot11Capabilities,
    pub status_code: u16,
    pub aid: u16,
    pub tagged_params: OptionList<u8>,
}

/// Authentication frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11Auth {
    pub header: Dot11MgmtHeader,
    pub algorithm: u16,
    pub auth_sequence: u16,
    pub status_code: u16,
    pub tagged_params: OptionList<u8>,
}

/// Deauthentication frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11Deauth {
    pub header: Dot11MgmtHeader,
    pub reason_code: u16,
    pub tagged_params: OptionList<u8>,
}

/// Disassociation frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11Disassoc {
    pub header: Dot11MgmtHeader,
    pub reason_code: u16,
    pub tagged_params: OptionList<u8>,
}

/// Action frame (category plus an opaque action specific body).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11Action {
    pub header: Dot11MgmtHeader,
    pub category: u8,
    pub body: Vec<u8>,
}

/// Dispatches a management frame on its subtype. Unknown subtypes are
/// kept raw.
pub(crate) fn parse_mgmt(subtype: u8, data: &[u8]) -> Result<Pdu, ParseError> {
    use mgmt_subtype::*;
    match subtype {
        ASSOC_REQ => Dot11AssocReq::parse(data),
        ASSOC_RESP => Dot11AssocResp::parse(data),
        REASSOC_REQ => Dot11ReassocReq::parse(data),
        REASSOC_RESP => Dot11ReassocResp::parse(data),
        PROBE_REQ => Dot11ProbeReq::parse(data),
        PROBE_RESP => Dot11ProbeResp::parse(data),
        BEACON => Dot11Beacon::parse(data),
        DISASSOC => Dot11Disassoc::parse(data),
        AUTH => Dot11Auth::parse(data),
        DEAUTH => Dot11Deauth::parse(data),
        ACTION => Dot11Action::parse(data),
        _ => Ok(crate::RawData::parse(data)),
    }
}

impl Dot11Beacon {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let timestamp = stream.read_u64_le()?;
        let interval = stream.read_u16_le()?;
        let capabilities = Dot11Capabilities(stream.read_u16_le()?);
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11Beacon {
            header,
            timestamp,
            interval,
            capabilities,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 12 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::BEACON)?;
        stream.write_u64_le(self.timestamp)?;
        stream.write_u16_le(self.interval)?;
        stream.write_u16_le(self.capabilities.0)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11ProbeReq {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11ProbeReq {
            header,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::PROBE_REQ)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11ProbeResp {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let timestamp = stream.read_u64_le()?;
        let interval = stream.read_u16_le()?;
        let capabilities = Dot11Capabilities(stream.read_u16_le()?);
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11ProbeResp {
            header,
            timestamp,
            interval,
            capabilities,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 12 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::PROBE_RESP)?;
        stream.write_u64_le(self.timestamp)?;
        stream.write_u16_le(self.interval)?;
        stream.write_u16_le(self.capabilities.0)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11AssocReq {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let capabilities = Dot11Capabilities(stream.read_u16_le()?);
        let listen_interval = stream.read_u16_le()?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11AssocReq {
            header,
            capabilities,
            listen_interval,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 4 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::ASSOC_REQ)?;
        stream.write_u16_le(self.capabilities.0)?;
        stream.write_u16_le(self.listen_interval)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11AssocResp {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let capabilities = Dot11Capabilities(stream.read_u16_le()?);
        let status_code = stream.read_u16_le()?;
        let aid = stream.read_u16_le()?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11AssocResp {
            header,
            capabilities,
            status_code,
            aid,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 6 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::ASSOC_RESP)?;
        stream.write_u16_le(self.capabilities.0)?;
        stream.write_u16_le(self.status_code)?;
        stream.write_u16_le(self.aid)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11ReassocReq {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let capabilities = Dot11Capabilities(stream.read_u16_le()?);
        let listen_interval = stream.read_u16_le()?;
        let current_ap = HwAddress(stream.read_array()?);
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11ReassocReq {
            header,
            capabilities,
            listen_interval,
            current_ap,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 10 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::REASSOC_REQ)?;
        stream.write_u16_le(self.capabilities.0)?;
        stream.write_u16_le(self.listen_interval)?;
        stream.write_bytes(&self.current_ap.octets())?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11ReassocResp {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let capabilities = Dot11Capabilities(stream.read_u16_le()?);
        let status_code = stream.read_u16_le()?;
        let aid = stream.read_u16_le()?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11ReassocResp {
            header,
            capabilities,
            status_code,
            aid,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 6 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::REASSOC_RESP)?;
        stream.write_u16_le(self.capabilities.0)?;
        stream.write_u16_le(self.status_code)?;
        stream.write_u16_le(self.aid)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11Auth {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let algorithm = stream.read_u16_le()?;
        let auth_sequence = stream.read_u16_le()?;
        let status_code = stream.read_u16_le()?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11Auth {
            header,
            algorithm,
            auth_sequence,
            status_code,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 6 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::AUTH)?;
        stream.write_u16_le(self.algorithm)?;
        stream.write_u16_le(self.auth_sequence)?;
        stream.write_u16_le(self.status_code)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11Deauth {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let reason_code = stream.read_u16_le()?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11Deauth {
            header,
            reason_code,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 2 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::DEAUTH)?;
        stream.write_u16_le(self.reason_code)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11Disassoc {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let reason_code = stream.read_u16_le()?;
        let tagged_params = parse_tagged_params(stream.rest())?;
        Ok(Pdu::new(Dot11Disassoc {
            header,
            reason_code,
            tagged_params,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 2 + tagged_params_len(&self.tagged_params)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::DISASSOC)?;
        stream.write_u16_le(self.reason_code)?;
        write_tagged_params(&mut stream, &self.tagged_params)
    }
}

impl Dot11Action {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let header = Dot11MgmtHeader::read(&mut stream)?;
        let category = stream.read_u8()?;
        let body = stream.rest().to_vec();
        Ok(Pdu::new(Dot11Action {
            header,
            category,
            body,
        }))
    }

    pub fn header_len(&self) -> usize {
        Dot11MgmtHeader::LEN + 1 + self.body.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        self.header.write(&mut stream, mgmt_subtype::ACTION)?;
        stream.write_u8(self.category)?;
        stream.write_bytes(&self.body)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnyLayer, LayerType};

    fn beacon() -> Dot11Beacon {
        let mut beacon = Dot11Beacon {
            header: Dot11MgmtHeader::new(
                MacAddr::BROADCAST,
                "00:1c:0e:87:85:01".parse().unwrap(),
                "00:1c:0e:87:85:01".parse().unwrap(),
            ),
            timestamp: 0x0000_0012_3456_789a,
            interval: 100,
            capabilities: Dot11Capabilities(0x0431),
            tagged_params: OptionList::new(),
        };
        beacon.set_ssid("test-net");
        beacon
            .tagged_params
            .push(TaggedOption::new(dot11_param::SUPPORTED_RATES, vec![0x82, 0x84, 0x0b, 0x16]));
        beacon
            .tagged_params
            .push(TaggedOption::new(dot11_param::DS_PARAMETER_SET, vec![6]));
        beacon
    }

    #[test]
    fn beacon_round_trip() {
        let bytes = Pdu::from(beacon()).serialize().unwrap();
        // frame control announces a beacon
        assert_eq!(0x80, bytes[0]);
        let pdu = super::super::parse(&bytes).unwrap();
        assert_eq!(LayerType::Dot11Beacon, pdu.layer_type());
        let parsed = match &pdu.layer {
            AnyLayer::Dot11Beacon(frame) => frame,
            _ => panic!(),
        };
        assert_eq!(&beacon(), parsed);
        assert_eq!(Some("test-net".to_string()), parsed.ssid());
        assert_eq!(Some(6), parsed.ds_channel());
        assert_eq!(
            Some(vec![1.0, 2.0, 5.5, 11.0]),
            parsed.supported_rates()
        );
        assert!(parsed.capabilities.ess());
        assert!(parsed.capabilities.short_slot_time());
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn matches_dot11_family_tag() {
        let pdu = Pdu::from(beacon());
        assert!(pdu.matches(LayerType::Dot11));
        assert!(pdu.matches(LayerType::Dot11Beacon));
        assert!(!pdu.matches(LayerType::Dot11ProbeReq));
    }

    #[test]
    fn probe_req_round_trip() {
        let mut probe = Dot11ProbeReq {
            header: Dot11MgmtHeader::new(
                MacAddr::BROADCAST,
                "7a:1f:f4:39:ab:0d".parse().unwrap(),
                MacAddr::BROADCAST,
            ),
            tagged_params: OptionList::new(),
        };
        probe.set_ssid("probe-me");
        let bytes = Pdu::from(probe).serialize().unwrap();
        assert_eq!(0x40, bytes[0]);
        let pdu = super::super::parse(&bytes).unwrap();
        assert_eq!(LayerType::Dot11ProbeReq, pdu.layer_type());
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn auth_sequence_fields() {
        let auth = Dot11Auth {
            header: Dot11MgmtHeader::new(
                "00:1c:0e:87:85:01".parse().unwrap(),
                "7a:1f:f4:39:ab:0d".parse().unwrap(),
                "00:1c:0e:87:85:01".parse().unwrap(),
            ),
            algorithm: 0, // open system
            auth_sequence: 1,
            status_code: 0,
            tagged_params: OptionList::new(),
        };
        let bytes = Pdu::from(auth).serialize().unwrap();
        assert_eq!(0xb0, bytes[0]);
        assert_eq!(30, bytes.len());
        let pdu = super::super::parse(&bytes).unwrap();
        assert_eq!(LayerType::Dot11Auth, pdu.layer_type());
        assert_eq!(bytes, pdu.serialize().unwrap());
    }
}
