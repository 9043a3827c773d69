/// Cipher or AKM suite selector: a 3 byte OUI plus a type byte.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuiteSelector(pub [u8; 4]);

impl SuiteSelector {
    /// WEP-40 group cipher.
    pub const WEP40: SuiteSelector = SuiteSelector([0x00, 0x0f, 0xac, 1]);
    /// TKIP cipher.
    pub const TKIP: SuiteSelector = SuiteSelector([0x00, 0x0f, 0xac, 2]);
    /// CCMP-128 cipher.
    pub const CCMP: SuiteSelector = SuiteSelector([0x00, 0x0f, 0xac, 4]);
    /// WEP-104 group cipher.
    pub const WEP104: SuiteSelector = SuiteSelector([0x00, 0x0f, 0xac, 5]);
    /// 802.1X AKM.
    pub const AKM_8021X: SuiteSelector = SuiteSelector([0x00, 0x0f, 0xac, 1]);
    /// Pre-shared key AKM.
    pub const AKM_PSK: SuiteSelector = SuiteSelector([0x00, 0x0f, 0xac, 2]);
}

impl core::fmt::Debug for SuiteSelector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:02x}-{:02x}-{:02x}:{}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Decoded RSN information element (tagged parameter 48 of management
/// frames).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsnInformation {
    pub version: u16,
    pub group_cipher: SuiteSelector,
    pub pairwise_ciphers: Vec<SuiteSelector>,
    pub akm_suites: Vec<SuiteSelector>,
    pub capabilities: u16,
}

impl RsnInformation {
    /// The typical WPA2-PSK element: CCMP group & pairwise cipher with
    /// the PSK AKM.
    pub fn wpa2_psk() -> RsnInformation {
        RsnInformation {
            version: 1,
            group_cipher: SuiteSelector::CCMP,
            pairwise_ciphers: vec![SuiteSelector::CCMP],
            akm_suites: vec![SuiteSelector::AKM_PSK],
            capabilities: 0,
        }
    }

    /// Decodes the payload of an RSN tagged parameter. Returns `None`
    /// if the data is truncated.
    pub fn parse(data: &[u8]) -> Option<RsnInformation> {
        fn suite(data: &[u8]) -> Option<SuiteSelector> {
            Some(SuiteSelector(data.get(..4)?.try_into().ok()?))
        }
        fn suite_list<'a>(data: &'a [u8], rest: &mut &'a [u8]) -> Option<Vec<SuiteSelector>> {
            let count = usize::from(u16::from_le_bytes([*data.first()?, *data.get(1)?]));
            let mut suites = Vec::with_capacity(count.min(16));
            let mut cursor = &data[2..];
            for _ in 0..count {
                suites.push(suite(cursor)?);
                cursor = &cursor[4..];
            }
            *rest = cursor;
            Some(suites)
        }

        let version = u16::from_le_bytes([*data.first()?, *data.get(1)?]);
        let group_cipher = suite(&data[2..])?;
        let mut rest: &[u8] = &[];
        let pairwise_ciphers = suite_list(&data[6..], &mut rest)?;
        let mut after_akm: &[u8] = &[];
        let akm_suites = suite_list(rest, &mut after_akm)?;
        let capabilities = match after_akm {
            [] => 0,
            bytes => u16::from_le_bytes([*bytes.first()?, *bytes.get(1)?]),
        };
        Some(RsnInformation {
            version,
            group_cipher,
            pairwise_ciphers,
            akm_suites,
            capabilities,
        })
    }

    /// Encodes the element into the payload of a tagged parameter.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(10 + 4 * (self.pairwise_ciphers.len() + self.akm_suites.len()));
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.group_cipher.0);
        out.extend_from_slice(&(self.pairwise_ciphers.len() as u16).to_le_bytes());
        for cipher in &self.pairwise_ciphers {
            out.extend_from_slice(&cipher.0);
        }
        out.extend_from_slice(&(self.akm_suites.len() as u16).to_le_bytes());
        for akm in &self.akm_suites {
            out.extend_from_slice(&akm.0);
        }
        out.extend_from_slice(&self.capabilities.to_le_bytes());
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wpa2_psk_round_trip() {
        let rsn = RsnInformation::wpa2_psk();
        let encoded = rsn.encode();
        assert_eq!(
            vec![
                0x01, 0x00, // version
                0x00, 0x0f, 0xac, 0x04, // group cipher CCMP
                0x01, 0x00, 0x00, 0x0f, 0xac, 0x04, // 1 pairwise cipher
                0x01, 0x00, 0x00, 0x0f, 0xac, 0x02, // 1 AKM (PSK)
                0x00, 0x00, // capabilities
            ],
            encoded
        );
        assert_eq!(Some(rsn), RsnInformation::parse(&encoded));
    }

    #[test]
    fn truncated_is_none() {
        let encoded = RsnInformation::wpa2_psk().encode();
        assert_eq!(None, RsnInformation::parse(&encoded[..7]));
    }
}
