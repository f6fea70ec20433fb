use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

const MAX_TOTAL: usize = 21;

/// An array indexed by a hand total (0 to 21), plus one slot for a natural Blackjack.
/// Only the totals that were inserted are considered present.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalArray<T> {
    data: [Option<T>; MAX_TOTAL + 1],
    natural: Option<T>,
}

impl<T> TotalArray<T> {
    pub fn new() -> TotalArray<T> {
        TotalArray {
            data: std::array::from_fn(|_| None),
            natural: None,
        }
    }

    /// Panics if `total` is greater than 21.
    pub fn insert(&mut self, total: u8, value: T) {
        self.data[total as usize] = Some(value);
    }

    pub fn contains_state(&self, total: u8) -> bool {
        self.get(total).is_some()
    }

    pub fn get(&self, total: u8) -> Option<&T> {
        self.data.get(total as usize).and_then(|value| value.as_ref())
    }

    pub fn natural(&self) -> Option<&T> {
        self.natural.as_ref()
    }

    pub fn set_natural(&mut self, value: T) {
        self.natural = Some(value);
    }

    /// Present totals in ascending order, not including the natural slot.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(total, value)| value.as_ref().map(|v| (total as u8, v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count() + self.natural.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for TotalArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u8> for TotalArray<T> {
    type Output = T;
    fn index(&self, total: u8) -> &Self::Output {
        match self.get(total) {
            Some(value) => value,
            None => panic!("Total {} is not in the table", total),
        }
    }
}

impl<T: Serialize> Serialize for TotalArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (total, value) in self.iter() {
            map.serialize_entry(&total.to_string(), value)?;
        }
        if let Some(value) = &self.natural {
            map.serialize_entry("blackjack", value)?;
        }
        map.end()
    }
}
