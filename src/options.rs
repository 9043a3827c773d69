/// A single TLV option: a small integer kind plus a payload blob.
///
/// The container stores no option value semantics. How `data` is
/// interpreted (and how kind & length are encoded on the wire) is up to
/// the dissector owning the list.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaggedOption<K> {
    pub kind: K,
    pub data: Vec<u8>,
}

impl<K> TaggedOption<K> {
    pub fn new(kind: K, data: Vec<u8>) -> TaggedOption<K> {
        TaggedOption { kind, data }
    }
}

/// Ordered list of TLV options.
///
/// Insertion order is preserved on serialization and duplicate kinds
/// are allowed (some TCP & DHCP options legitimately repeat).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct OptionList<K> {
    options: Vec<TaggedOption<K>>,
}

impl<K: Copy + Eq> OptionList<K> {
    pub fn new() -> OptionList<K> {
        OptionList {
            options: Vec::new(),
        }
    }

    /// Append an option at the end of the list.
    pub fn push(&mut self, option: TaggedOption<K>) {
        self.options.push(option);
    }

    /// Remove the first option with the given kind. Returns it if one
    /// was present.
    pub fn remove_first(&mut self, kind: K) -> Option<TaggedOption<K>> {
        let index = self.options.iter().position(|o| o.kind == kind)?;
        Some(self.options.remove(index))
    }

    /// Returns the first option with the given kind.
    pub fn find_first(&self, kind: K) -> Option<&TaggedOption<K>> {
        self.options.iter().find(|o| o.kind == kind)
    }

    /// Returns the first option with the given kind (mutable).
    pub fn find_first_mut(&mut self, kind: K) -> Option<&mut TaggedOption<K>> {
        self.options.iter_mut().find(|o| o.kind == kind)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, TaggedOption<K>> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<K> From<Vec<TaggedOption<K>>> for OptionList<K> {
    fn from(options: Vec<TaggedOption<K>>) -> OptionList<K> {
        OptionList { options }
    }
}

impl<'a, K> IntoIterator for &'a OptionList<K> {
    type Item = &'a TaggedOption<K>;
    type IntoIter = core::slice::Iter<'a, TaggedOption<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

impl<K> IntoIterator for OptionList<K> {
    type Item = TaggedOption<K>;
    type IntoIter = std::vec::IntoIter<TaggedOption<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insertion_order_and_duplicates() {
        let mut list = OptionList::new();
        list.push(TaggedOption::new(53u8, vec![1]));
        list.push(TaggedOption::new(55, vec![1, 3, 6]));
        list.push(TaggedOption::new(53, vec![2]));
        assert_eq!(3, list.len());
        assert_eq!(
            vec![53, 55, 53],
            list.iter().map(|o| o.kind).collect::<Vec<_>>()
        );
        // find returns the first of the duplicates
        assert_eq!(&[1u8][..], &list.find_first(53).unwrap().data);
    }

    #[test]
    fn remove_first() {
        let mut list = OptionList::new();
        list.push(TaggedOption::new(1u8, vec![]));
        list.push(TaggedOption::new(2, vec![0xab]));
        list.push(TaggedOption::new(1, vec![0xcd]));

        assert_eq!(Some(TaggedOption::new(1, vec![])), list.remove_first(1));
        assert_eq!(2, list.len());
        assert_eq!(&[0xcdu8][..], &list.find_first(1).unwrap().data);
        assert_eq!(None, list.remove_first(9));
    }
}
