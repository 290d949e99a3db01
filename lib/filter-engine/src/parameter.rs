use std::fmt;

/// A UI-level control that a filter may or may not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterKey {
    Intensity,
    Radius,
    Scale,
}

impl ParameterKey {
    pub const ALL: [ParameterKey; 3] = [
        ParameterKey::Intensity,
        ParameterKey::Radius,
        ParameterKey::Scale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParameterKey::Intensity => "Intensity",
            ParameterKey::Radius => "Radius",
            ParameterKey::Scale => "Scale",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            ParameterKey::Intensity => 0b001,
            ParameterKey::Radius => 0b010,
            ParameterKey::Scale => 0b100,
        }
    }

    /// Position in [`ParameterKey::ALL`], for per-key arrays.
    pub fn index(&self) -> usize {
        match self {
            ParameterKey::Intensity => 0,
            ParameterKey::Radius => 1,
            ParameterKey::Scale => 2,
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subset of [`ParameterKey::ALL`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParameterSet(u8);

impl ParameterSet {
    pub const EMPTY: ParameterSet = ParameterSet(0);

    pub fn from_keys(keys: &[ParameterKey]) -> Self {
        keys.iter().copied().collect()
    }

    pub fn contains(&self, key: ParameterKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn insert(&mut self, key: ParameterKey) {
        self.0 |= key.bit();
    }

    pub fn with(mut self, key: ParameterKey) -> Self {
        self.insert(key);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Keys in canonical Intensity, Radius, Scale order.
    pub fn iter(self) -> impl Iterator<Item = ParameterKey> {
        ParameterKey::ALL
            .into_iter()
            .filter(move |key| self.contains(*key))
    }
}

impl FromIterator<ParameterKey> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = ParameterKey>>(iter: T) -> Self {
        let mut set = ParameterSet::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_membership() {
        let set = ParameterSet::EMPTY.with(ParameterKey::Radius);
        assert!(set.contains(ParameterKey::Radius));
        assert!(!set.contains(ParameterKey::Intensity));
        assert!(!set.contains(ParameterKey::Scale));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_is_canonical_order() {
        let set = ParameterSet::from_keys(&[ParameterKey::Scale, ParameterKey::Intensity]);
        let keys: Vec<_> = set.iter().collect();
        assert_eq!(keys, vec![ParameterKey::Intensity, ParameterKey::Scale]);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (position, key) in ParameterKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), position);
        }
    }

    #[test]
    fn test_empty() {
        assert!(ParameterSet::EMPTY.is_empty());
        assert_eq!(ParameterSet::default(), ParameterSet::EMPTY);
        assert_eq!(format!("{:?}", ParameterSet::EMPTY), "{}");
    }
}
