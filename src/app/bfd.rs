use arrayvec::ArrayVec;

use crate::err::{ContentError, InvalidArgError, Layer, LogicError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Pdu, RawData};

/// Diagnostic code of a [`BfdPacket`] (5 bits).
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfdDiagnostic(pub u8);

impl BfdDiagnostic {
    pub const NONE: BfdDiagnostic = BfdDiagnostic(0);
    pub const CONTROL_DETECTION_TIME_EXPIRED: BfdDiagnostic = BfdDiagnostic(1);
    pub const ECHO_FUNCTION_FAILED: BfdDiagnostic = BfdDiagnostic(2);
    pub const NEIGHBOR_SIGNALED_SESSION_DOWN: BfdDiagnostic = BfdDiagnostic(3);
    pub const FORWARDING_PLANE_RESET: BfdDiagnostic = BfdDiagnostic(4);
    pub const PATH_DOWN: BfdDiagnostic = BfdDiagnostic(5);
    pub const CONCATENATED_PATH_DOWN: BfdDiagnostic = BfdDiagnostic(6);
    pub const ADMINISTRATIVELY_DOWN: BfdDiagnostic = BfdDiagnostic(7);
    pub const REVERSE_CONCATENATED_PATH_DOWN: BfdDiagnostic = BfdDiagnostic(8);
    pub const MISCONNECTIVITY_DEFECT: BfdDiagnostic = BfdDiagnostic(9);
}

impl core::fmt::Debug for BfdDiagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session state of a [`BfdPacket`] (2 bits).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BfdState {
    #[default]
    AdminDown = 0,
    Down = 1,
    Init = 2,
    Up = 3,
}

impl BfdState {
    fn from_wire(value: u8) -> BfdState {
        match value & 0b11 {
            0 => BfdState::AdminDown,
            1 => BfdState::Down,
            2 => BfdState::Init,
            _ => BfdState::Up,
        }
    }
}

/// Authentication section of a [`BfdPacket`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BfdAuth {
    /// Simple password (1 to 16 bytes).
    SimplePassword {
        key_id: u8,
        password: ArrayVec<u8, 16>,
    },
    /// Keyed MD5 / meticulous keyed MD5.
    KeyedMd5 {
        meticulous: bool,
        key_id: u8,
        sequence: u32,
        value: [u8; 16],
    },
    /// Keyed SHA1 / meticulous keyed SHA1.
    KeyedSha1 {
        meticulous: bool,
        key_id: u8,
        sequence: u32,
        value: [u8; 20],
    },
}

impl BfdAuth {
    /// On-wire auth type value.
    pub fn auth_type(&self) -> u8 {
        match self {
            BfdAuth::SimplePassword { .. } => 1,
            BfdAuth::KeyedMd5 {
                meticulous: false, ..
            } => 2,
            BfdAuth::KeyedMd5 {
                meticulous: true, ..
            } => 3,
            BfdAuth::KeyedSha1 {
                meticulous: false, ..
            } => 4,
            BfdAuth::KeyedSha1 {
                meticulous: true, ..
            } => 5,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            BfdAuth::SimplePassword { .. } => "simple password",
            BfdAuth::KeyedMd5 { .. } => "keyed MD5",
            BfdAuth::KeyedSha1 { .. } => "keyed SHA1",
        }
    }

    /// Serialized size of the section in bytes (value of its length
    /// field).
    pub fn len(&self) -> usize {
        match self {
            BfdAuth::SimplePassword { password, .. } => 3 + password.len(),
            BfdAuth::KeyedMd5 { .. } => 24,
            BfdAuth::KeyedSha1 { .. } => 28,
        }
    }
}

/// Error of the guarded auth field accessors of [`BfdPacket`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BfdAuthError {
    /// The active auth type does not match the accessor.
    Logic(LogicError),
    /// The passed value is outside the allowed range.
    InvalidArg(InvalidArgError),
}

impl core::fmt::Display for BfdAuthError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BfdAuthError::Logic(err) => err.fmt(f),
            BfdAuthError::InvalidArg(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for BfdAuthError {}

impl From<LogicError> for BfdAuthError {
    fn from(err: LogicError) -> BfdAuthError {
        BfdAuthError::Logic(err)
    }
}

impl From<InvalidArgError> for BfdAuthError {
    fn from(err: InvalidArgError) -> BfdAuthError {
        BfdAuthError::InvalidArg(err)
    }
}

/// BFD control packet (RFC 5880): the 24 byte mandatory section plus
/// the optional authentication section.
///
/// The length field & the auth-present flag are derived on
/// serialization; a length field that does not match the actual size is
/// rejected while parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BfdPacket {
    /// Protocol version (3 bits, 1 on the wire today).
    pub version: u8,
    pub diagnostic: BfdDiagnostic,
    pub state: BfdState,
    pub poll: bool,
    pub final_flag: bool,
    pub control_plane_independent: bool,
    pub demand: bool,
    pub multipoint: bool,
    pub detect_mult: u8,
    pub my_discriminator: u32,
    pub your_discriminator: u32,
    pub desired_min_tx_interval: u32,
    pub required_min_rx_interval: u32,
    pub required_min_echo_rx_interval: u32,
    pub auth: Option<BfdAuth>,
}

impl Default for BfdPacket {
    fn default() -> BfdPacket {
        BfdPacket {
            version: 1,
            diagnostic: BfdDiagnostic::NONE,
            state: BfdState::Down,
            poll: false,
            final_flag: false,
            control_plane_independent: false,
            demand: false,
            multipoint: false,
            detect_mult: 0,
            my_discriminator: 0,
            your_discriminator: 0,
            desired_min_tx_interval: 0,
            required_min_rx_interval: 0,
            required_min_echo_rx_interval: 0,
            auth: None,
        }
    }
}

impl BfdPacket {
    /// Size of the mandatory section in bytes.
    pub const MIN_LEN: usize = 24;

    /// Maximum password size of the simple password auth type.
    pub const MAX_PASSWORD_SIZE: usize = 16;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::BfdHeader);
        let first = stream.read_u8()?;
        let second = stream.read_u8()?;
        let auth_present = 0 != second & 0x04;
        let mut packet = BfdPacket {
            version: first >> 5,
            diagnostic: BfdDiagnostic(first & 0x1f),
            state: BfdState::from_wire(second >> 6),
            poll: 0 != second & 0x20,
            final_flag: 0 != second & 0x10,
            control_plane_independent: 0 != second & 0x08,
            demand: 0 != second & 0x02,
            multipoint: 0 != second & 0x01,
            detect_mult: stream.read_u8()?,
            ..BfdPacket::default()
        };
        let length = stream.read_u8()?;
        packet.my_discriminator = stream.read_u32_be()?;
        packet.your_discriminator = stream.read_u32_be()?;
        packet.desired_min_tx_interval = stream.read_u32_be()?;
        packet.required_min_rx_interval = stream.read_u32_be()?;
        packet.required_min_echo_rx_interval = stream.read_u32_be()?;

        if auth_present {
            let auth_type = stream.read_u8()?;
            let auth_len = stream.read_u8()?;
            let key_id = stream.read_u8()?;
            packet.auth = Some(match auth_type {
                1 => {
                    if !(4..=3 + BfdPacket::MAX_PASSWORD_SIZE as u8).contains(&auth_len) {
                        return Err(ContentError::BfdAuthLenInvalid {
                            auth_type,
                            auth_len,
                        }
                        .into());
                    }
                    let mut password = ArrayVec::new();
                    password
                        .try_extend_from_slice(stream.read_bytes(usize::from(auth_len) - 3)?)
                        .expect("password fits, length checked above");
                    BfdAuth::SimplePassword { key_id, password }
                }
                2 | 3 => {
                    if auth_len != 24 {
                        return Err(ContentError::BfdAuthLenInvalid {
                            auth_type,
                            auth_len,
                        }
                        .into());
                    }
                    stream.skip(1)?; // reserved
                    BfdAuth::KeyedMd5 {
                        meticulous: auth_type == 3,
                        key_id,
                        sequence: stream.read_u32_be()?,
                        value: stream.read_array()?,
                    }
                }
                4 | 5 => {
                    if auth_len != 28 {
                        return Err(ContentError::BfdAuthLenInvalid {
                            auth_type,
                            auth_len,
                        }
                        .into());
                    }
                    stream.skip(1)?; // reserved
                    BfdAuth::KeyedSha1 {
                        meticulous: auth_type == 5,
                        key_id,
                        sequence: stream.read_u32_be()?,
                        value: stream.read_array()?,
                    }
                }
                _ => return Err(ContentError::BfdUnknownAuthType { auth_type }.into()),
            });
        }

        if usize::from(length) != packet.header_len() {
            return Err(ContentError::BfdLengthMismatch {
                length_field: length,
                actual: packet.header_len(),
            }
            .into());
        }

        let rest = stream.rest();
        let mut pdu = Pdu::new(packet);
        if !rest.is_empty() {
            pdu.set_child(RawData::parse(rest));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        BfdPacket::MIN_LEN + self.auth.as_ref().map(|a| a.len()).unwrap_or(0)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::BfdHeader);
        stream.write_u8((self.version << 5) | (self.diagnostic.0 & 0x1f))?;
        stream.write_u8(
            ((self.state as u8) << 6)
                | if self.poll { 0x20 } else { 0 }
                | if self.final_flag { 0x10 } else { 0 }
                | if self.control_plane_independent { 0x08 } else { 0 }
                | if self.auth.is_some() { 0x04 } else { 0 }
                | if self.demand { 0x02 } else { 0 }
                | if self.multipoint { 0x01 } else { 0 },
        )?;
        stream.write_u8(self.detect_mult)?;
        stream.write_u8(header_len as u8)?;
        stream.write_u32_be(self.my_discriminator)?;
        stream.write_u32_be(self.your_discriminator)?;
        stream.write_u32_be(self.desired_min_tx_interval)?;
        stream.write_u32_be(self.required_min_rx_interval)?;
        stream.write_u32_be(self.required_min_echo_rx_interval)?;
        if let Some(auth) = &self.auth {
            stream.write_u8(auth.auth_type())?;
            stream.write_u8(auth.len() as u8)?;
            match auth {
                BfdAuth::SimplePassword { key_id, password } => {
                    stream.write_u8(*key_id)?;
                    stream.write_bytes(password)?;
                }
                BfdAuth::KeyedMd5 {
                    key_id,
                    sequence,
                    value,
                    ..
                } => {
                    stream.write_u8(*key_id)?;
                    stream.write_u8(0)?; // reserved
                    stream.write_u32_be(*sequence)?;
                    stream.write_bytes(value)?;
                }
                BfdAuth::KeyedSha1 {
                    key_id,
                    sequence,
                    value,
                    ..
                } => {
                    stream.write_u8(*key_id)?;
                    stream.write_u8(0)?; // reserved
                    stream.write_u32_be(*sequence)?;
                    stream.write_bytes(value)?;
                }
            }
        }
        Ok(())
    }

    /// The password of the simple password auth section.
    pub fn password(&self) -> Result<&[u8], LogicError> {
        match &self.auth {
            Some(BfdAuth::SimplePassword { password, .. }) => Ok(password),
            other => Err(BfdPacket::mismatch("simple password", other)),
        }
    }

    /// Replaces the password of the simple password auth section
    /// (1 to 16 bytes).
    pub fn set_password(&mut self, new_password: &[u8]) -> Result<(), BfdAuthError> {
        if new_password.is_empty() || new_password.len() > BfdPacket::MAX_PASSWORD_SIZE {
            return Err(InvalidArgError::BfdPasswordLen {
                len: new_password.len(),
            }
            .into());
        }
        match &mut self.auth {
            Some(BfdAuth::SimplePassword { password, .. }) => {
                password.clear();
                password.try_extend_from_slice(new_password).unwrap();
                Ok(())
            }
            other => Err(BfdPacket::mismatch("simple password", other).into()),
        }
    }

    /// The digest of the (meticulous) keyed MD5 auth section.
    pub fn auth_md5_value(&self) -> Result<&[u8; 16], LogicError> {
        match &self.auth {
            Some(BfdAuth::KeyedMd5 { value, .. }) => Ok(value),
            other => Err(BfdPacket::mismatch("keyed MD5", other)),
        }
    }

    /// Replaces the digest of the (meticulous) keyed MD5 auth section.
    pub fn set_auth_md5_value(&mut self, new_value: &[u8]) -> Result<(), BfdAuthError> {
        let new_value: [u8; 16] =
            new_value
                .try_into()
                .map_err(|_| InvalidArgError::BfdAuthValueLen {
                    expected: 16,
                    actual: new_value.len(),
                })?;
        match &mut self.auth {
            Some(BfdAuth::KeyedMd5 { value, .. }) => {
                *value = new_value;
                Ok(())
            }
            other => Err(BfdPacket::mismatch("keyed MD5", other).into()),
        }
    }

    /// The hash of the (meticulous) keyed SHA1 auth section.
    pub fn auth_sha1_value(&self) -> Result<&[u8; 20], LogicError> {
        match &self.auth {
            Some(BfdAuth::KeyedSha1 { value, .. }) => Ok(value),
            other => Err(BfdPacket::mismatch("keyed SHA1", other)),
        }
    }

    /// Replaces the hash of the (meticulous) keyed SHA1 auth section.
    pub fn set_auth_sha1_value(&mut self, new_value: &[u8]) -> Result<(), BfdAuthError> {
        let new_value: [u8; 20] =
            new_value
                .try_into()
                .map_err(|_| InvalidArgError::BfdAuthValueLen {
                    expected: 20,
                    actual: new_value.len(),
                })?;
        match &mut self.auth {
            Some(BfdAuth::KeyedSha1 { value, .. }) => {
                *value = new_value;
                Ok(())
            }
            other => Err(BfdPacket::mismatch("keyed SHA1", other).into()),
        }
    }

    /// The sequence number of a keyed MD5/SHA1 auth section.
    pub fn auth_sequence_number(&self) -> Result<u32, LogicError> {
        match &self.auth {
            Some(BfdAuth::KeyedMd5 { sequence, .. })
            | Some(BfdAuth::KeyedSha1 { sequence, .. }) => Ok(*sequence),
            other => Err(BfdPacket::mismatch("keyed MD5 or keyed SHA1", other)),
        }
    }

    fn mismatch(expected: &'static str, actual: &Option<BfdAuth>) -> LogicError {
        LogicError::BfdAuthTypeMismatch {
            expected,
            actual: actual.as_ref().map(|a| a.type_name()),
        }
    }
}
