use core::net::{Ipv4Addr, Ipv6Addr};

use crate::err::SerializeError;
use crate::{AnyLayer, LayerType};

/// Addresses of the enclosing IP layer, threaded down to the transport
/// layers during serialization for their pseudo header checksums.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum PseudoHeader {
    V4 {
        source: Ipv4Addr,
        destination: Ipv4Addr,
    },
    V6 {
        source: Ipv6Addr,
        destination: Ipv6Addr,
    },
}

/// Context handed down from the root during serialization, carrying the
/// state of the ancestor layers that inner layers depend on.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerializeCtx {
    pub pseudo: Option<PseudoHeader>,
}

/// Type tag & total length of the child subtree, handed to a layer when
/// it writes itself (used for next-header, length & checksum fields).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChildInfo {
    pub layer_type: LayerType,
    pub len: usize,
}

/// One protocol layer in a packet together with its (exclusively owned)
/// inner layer.
///
/// A `Pdu` forms a singly linked chain from the outermost layer down to
/// the innermost payload. Cloning deep-copies the whole subtree,
/// dropping a `Pdu` drops its subtree.
///
/// Chains are built with the `/` operator:
///
/// ```
/// use wirecraft::*;
/// use core::net::Ipv4Addr;
///
/// let packet = Ethernet2Header::new(
///         "7a:1f:f4:39:ab:0d".parse().unwrap(),
///         "13:da:de:f1:01:85".parse().unwrap(),
///     )
///     / Ipv4Header::new(Ipv4Addr::new(192, 168, 0, 100), Ipv4Addr::new(192, 168, 0, 1))
///     / UdpHeader::new(5353, 5353)
///     / RawData::from(&b"hello"[..]);
///
/// let bytes = packet.serialize().unwrap();
/// assert_eq!(bytes.len(), packet.len());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Pdu {
    /// The protocol layer itself.
    pub layer: AnyLayer,
    child: Option<Box<Pdu>>,
}

impl Pdu {
    /// Creates a chain consisting of a single layer.
    pub fn new(layer: impl Into<AnyLayer>) -> Pdu {
        Pdu {
            layer: layer.into(),
            child: None,
        }
    }

    /// Type tag of this layer.
    #[inline]
    pub fn layer_type(&self) -> LayerType {
        self.layer.layer_type()
    }

    /// The inner layer (if any).
    #[inline]
    pub fn child(&self) -> Option<&Pdu> {
        self.child.as_deref()
    }

    /// The inner layer (mutable).
    #[inline]
    pub fn child_mut(&mut self) -> Option<&mut Pdu> {
        self.child.as_deref_mut()
    }

    /// Replaces the inner layer, returning the previous one.
    pub fn set_child(&mut self, child: impl Into<Pdu>) -> Option<Pdu> {
        self.child.replace(Box::new(child.into())).map(|b| *b)
    }

    /// Removes and returns the inner layer.
    pub fn take_child(&mut self) -> Option<Pdu> {
        self.child.take().map(|b| *b)
    }

    /// Appends a layer at the innermost end of the chain and updates the
    /// next-protocol field of the layer it is attached to (when the
    /// dispatch tables know a value for the new tail's tag).
    pub fn push(&mut self, child: impl Into<Pdu>) {
        let child = child.into();
        let mut tail = self;
        while tail.child.is_some() {
            tail = tail.child.as_deref_mut().unwrap();
        }
        tail.layer.set_next_protocol(child.layer_type());
        tail.child = Some(Box::new(child));
    }

    /// Bytes this layer contributes before its child.
    #[inline]
    pub fn header_len(&self) -> usize {
        self.layer.header_len()
    }

    /// Bytes this layer appends after its child.
    #[inline]
    pub fn trailer_len(&self) -> usize {
        self.layer.trailer_len()
    }

    /// Total serialized length of the subtree.
    pub fn len(&self) -> usize {
        self.layer.header_len()
            + self.child.as_ref().map(|c| c.len()).unwrap_or(0)
            + self.layer.trailer_len()
    }

    /// True if the subtree serializes to zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if this layer's tag matches the given tag (family tags like
    /// [`LayerType::Dot11`] match all their members).
    pub fn matches(&self, flag: LayerType) -> bool {
        self.layer_type().matches(flag)
    }

    /// Serializes the whole subtree into a freshly allocated buffer.
    ///
    /// Auto fields (checksums, length fields, next-protocol fields) are
    /// recomputed while writing; the stored field values are not
    /// modified.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let mut buf = vec![0u8; self.len()];
        self.write_subtree(&mut buf, &SerializeCtx::default())?;
        Ok(buf)
    }

    /// Serializes the whole subtree into the start of the given buffer
    /// and returns the written length.
    pub fn serialize_into(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let len = self.len();
        if buf.len() < len {
            return Err(SerializeError::SpaceExhausted {
                required_len: len,
                len: buf.len(),
                layer: self.layer.error_layer(),
            });
        }
        self.write_subtree(&mut buf[..len], &SerializeCtx::default())?;
        Ok(len)
    }

    /// Writes the subtree into `buf` (whose length must equal
    /// `self.len()`): child first, then the own header & trailer around
    /// it so length, next-protocol & checksum fields can observe the
    /// rendered child bytes.
    pub(crate) fn write_subtree(
        &self,
        buf: &mut [u8],
        ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        debug_assert_eq!(buf.len(), self.len());
        let header_len = self.layer.header_len();
        let child_info = if let Some(child) = &self.child {
            let child_len = child.len();
            let child_ctx = self.layer.descend_ctx(ctx);
            child.write_subtree(&mut buf[header_len..header_len + child_len], &child_ctx)?;
            Some(ChildInfo {
                layer_type: child.layer_type(),
                len: child_len,
            })
        } else {
            None
        };
        self.layer.write_layer(buf, child_info, ctx)
    }

    /// Returns the outermost layer with the given tag (searching from
    /// this layer towards the innermost).
    pub fn find(&self, flag: LayerType) -> Option<&Pdu> {
        self.iter().find(|pdu| pdu.matches(flag))
    }

    /// Returns the outermost layer with the given tag (mutable).
    pub fn find_mut(&mut self, flag: LayerType) -> Option<&mut Pdu> {
        if self.matches(flag) {
            Some(self)
        } else {
            self.child.as_deref_mut()?.find_mut(flag)
        }
    }

    /// Returns the innermost layer with the given tag.
    pub fn rfind(&self, flag: LayerType) -> Option<&Pdu> {
        self.iter().filter(|pdu| pdu.matches(flag)).last()
    }

    /// Iterates over the chain from this layer to the innermost.
    pub fn iter(&self) -> PduIter<'_> {
        PduIter { next: Some(self) }
    }

    /// True if `data` appears to be the serialized form of a response
    /// to this chain (used when polling for replies after a send).
    pub fn matches_response(&self, data: &[u8]) -> bool {
        match self.layer.response_matches(data) {
            ResponseMatch::No => false,
            ResponseMatch::Match => true,
            ResponseMatch::Descend(rest) => match self.child() {
                Some(child) => child.matches_response(rest),
                None => true,
            },
        }
    }
}

/// Result of checking a candidate buffer against one layer of a chain.
pub(crate) enum ResponseMatch<'a> {
    /// The buffer is not a response to the layer.
    No,
    /// The buffer is a response; no inner layers need to be consulted.
    Match,
    /// The layer's own fields match; the rest of the buffer must match
    /// the inner layers.
    Descend(&'a [u8]),
}

/// Iterator over the layers of a chain (outermost to innermost).
pub struct PduIter<'a> {
    next: Option<&'a Pdu>,
}

impl<'a> Iterator for PduIter<'a> {
    type Item = &'a Pdu;

    fn next(&mut self) -> Option<&'a Pdu> {
        let current = self.next?;
        self.next = current.child();
        Some(current)
    }
}
