use crate::defrag::{IpDefragError, IpFragRange, MAX_IP_DEFRAG_LEN};

/// Buffer reconstructing the payload of one fragmented IPv4 packet.
///
/// Fragments may arrive in any order; received byte ranges are tracked
/// as merged sections. On overlapping data the first writer wins
/// (bytes already received are never overwritten), which also makes
/// duplicate fragments harmless.
#[derive(Clone, Debug, Default)]
pub struct IpDefragBuf {
    data: Vec<u8>,
    /// Received ranges, sorted & merged.
    sections: Vec<IpFragRange>,
    /// Total payload size, known once the fragment without the
    /// more-fragments flag has been seen.
    end: Option<usize>,
    fragment_count: usize,
}

impl IpDefragBuf {
    pub fn new() -> IpDefragBuf {
        IpDefragBuf::default()
    }

    /// Number of fragments added so far.
    #[inline]
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Adds a fragment's payload at the given byte offset.
    pub fn add(
        &mut self,
        offset: usize,
        payload: &[u8],
        more_fragments: bool,
    ) -> Result<(), IpDefragError> {
        let end = offset + payload.len();
        if end > MAX_IP_DEFRAG_LEN {
            return Err(IpDefragError::SegmentTooBig {
                offset,
                payload_len: payload.len(),
            });
        }
        if let Some(total) = self.end {
            if end > total {
                return Err(IpDefragError::UnexpectedDataAfterEnd { end: total, offset });
            }
        }
        if !more_fragments {
            match self.end {
                Some(previous_end) if previous_end != end => {
                    return Err(IpDefragError::ConflictingEnd { previous_end, end });
                }
                _ => self.end = Some(end),
            }
            // data received earlier must not stick out beyond the end
            if let Some(section) = self.sections.last() {
                if section.end > end {
                    return Err(IpDefragError::UnexpectedDataAfterEnd {
                        end,
                        offset: section.end,
                    });
                }
            }
        }
        self.fragment_count += 1;

        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        // write only the bytes no earlier fragment has covered
        let mut cursor = offset;
        for section in self.sections.iter() {
            if section.end <= cursor {
                continue;
            }
            if section.start >= end {
                break;
            }
            if section.start > cursor {
                let stop = section.start.min(end);
                self.data[cursor..stop].copy_from_slice(&payload[cursor - offset..stop - offset]);
            }
            cursor = cursor.max(section.end);
            if cursor >= end {
                break;
            }
        }
        if cursor < end {
            self.data[cursor..end].copy_from_slice(&payload[cursor - offset..]);
        }

        // insert & merge the new range
        let mut range = IpFragRange { start: offset, end };
        let mut merged = Vec::with_capacity(self.sections.len() + 1);
        for section in self.sections.drain(..) {
            if range.is_mergeable(section) {
                range.merge(section);
            } else {
                merged.push(section);
            }
        }
        merged.push(range);
        merged.sort_by_key(|s| s.start);
        self.sections = merged;
        Ok(())
    }

    /// True once the final fragment arrived and the data from offset 0
    /// to the end is gap free.
    pub fn is_complete(&self) -> bool {
        match (self.end, self.sections.as_slice()) {
            (Some(end), [only]) => only.start == 0 && only.end == end,
            (Some(0), []) => true,
            _ => false,
        }
    }

    /// The reassembled payload (meaningful once
    /// [`IpDefragBuf::is_complete`] returns true).
    pub fn take_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn out_of_order_reassembly() {
        let mut buf = IpDefragBuf::new();
        buf.add(8, b"89abcdef", false).unwrap();
        assert!(!buf.is_complete());
        buf.add(0, b"01234567", true).unwrap();
        assert!(buf.is_complete());
        assert_eq!(b"0123456789abcdef".to_vec(), buf.take_data());
    }

    #[test]
    fn first_writer_wins() {
        let mut buf = IpDefragBuf::new();
        buf.add(0, b"aaaa", true).unwrap();
        // duplicate & overlapping data does not overwrite
        buf.add(0, b"bbbbcc", true).unwrap();
        buf.add(6, b"dd", false).unwrap();
        assert!(buf.is_complete());
        assert_eq!(b"aaaaccdd".to_vec(), buf.take_data());
    }

    #[test]
    fn gaps_block_completion() {
        let mut buf = IpDefragBuf::new();
        buf.add(0, b"0123", true).unwrap();
        buf.add(8, b"89ab", false).unwrap();
        assert!(!buf.is_complete());
        buf.add(4, b"4567", true).unwrap();
        assert!(buf.is_complete());
    }

    #[test]
    fn conflicting_end_is_rejected() {
        let mut buf = IpDefragBuf::new();
        buf.add(8, b"x", false).unwrap();
        assert_eq!(
            Err(IpDefragError::ConflictingEnd {
                previous_end: 9,
                end: 5
            }),
            buf.add(4, b"y", false)
        );
    }

    #[test]
    fn data_beyond_end_is_rejected() {
        let mut buf = IpDefragBuf::new();
        buf.add(0, b"0123", false).unwrap();
        assert_eq!(
            Err(IpDefragError::UnexpectedDataAfterEnd { end: 4, offset: 8 }),
            buf.add(8, b"x", true)
        );
    }
}
