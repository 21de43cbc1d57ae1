//! Sparse cost tables.
//!
//! A [`PairCosts`] table is both the cost lookup and the adjacency of the
//! network: a pair present in the table is an *allowed* connection, a pair
//! absent from it cannot be chosen by the model. Entries keep their insertion
//! order so that variables and report lines come out in document order.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// One allowed (from, to) connection and its cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCost<A, B> {
    pub from: A,
    pub to: B,
    pub cost: f64,
}

/// Sparse mapping (from, to) -> cost over allowed pairs only.
#[derive(Debug, Clone)]
pub struct PairCosts<A, B> {
    entries: Vec<PairCost<A, B>>,
    index: HashMap<A, HashMap<B, usize>>,
}

impl<A, B> Default for PairCosts<A, B> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<A, B> PairCosts<A, B>
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the pair with the given cost.
    ///
    /// Inserting an already allowed pair overwrites its cost in place and
    /// returns the previous one; the entry keeps its first position.
    pub fn insert(&mut self, from: A, to: B, cost: f64) -> Option<f64> {
        if let Some(&slot) = self.index.get(&from).and_then(|row| row.get(&to)) {
            let previous = self.entries[slot].cost;
            self.entries[slot].cost = cost;
            return Some(previous);
        }
        let slot = self.entries.len();
        self.index
            .entry(from.clone())
            .or_default()
            .insert(to.clone(), slot);
        self.entries.push(PairCost { from, to, cost });
        None
    }

    /// Whether the model may use the connection `from -> to` at all.
    pub fn is_allowed(&self, from: &A, to: &B) -> bool {
        self.slot(from, to).is_some()
    }

    /// Cost of an allowed pair, `None` when the pair is disallowed.
    pub fn cost(&self, from: &A, to: &B) -> Option<f64> {
        self.slot(from, to).map(|slot| self.entries[slot].cost)
    }

    /// All allowed pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PairCost<A, B>> {
        self.entries.iter()
    }

    /// Allowed destinations of `from`, in insertion order.
    pub fn targets_of<'a>(&'a self, from: &'a A) -> impl Iterator<Item = &'a PairCost<A, B>> + 'a {
        self.entries.iter().filter(move |entry| &entry.from == from)
    }

    /// Allowed origins reaching `to`, in insertion order.
    pub fn sources_of<'a>(&'a self, to: &'a B) -> impl Iterator<Item = &'a PairCost<A, B>> + 'a {
        self.entries.iter().filter(move |entry| &entry.to == to)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn slot(&self, from: &A, to: &B) -> Option<usize> {
        self.index.get(from).and_then(|row| row.get(to)).copied()
    }
}

/// Per-node fixed cost table.
#[derive(Debug, Clone)]
pub struct FixedCosts<K> {
    entries: Vec<(K, f64)>,
    index: HashMap<K, usize>,
}

impl<K> Default for FixedCosts<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K> FixedCosts<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, cost: f64) -> Option<f64> {
        if let Some(&slot) = self.index.get(&key) {
            let previous = self.entries[slot].1;
            self.entries[slot].1 = cost;
            return Some(previous);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, cost));
        None
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries.iter().map(|(key, cost)| (key, *cost))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientId, SatelliteId};

    fn sample_table() -> PairCosts<ClientId, SatelliteId> {
        let mut table = PairCosts::new();
        table.insert(ClientId::new("C1"), SatelliteId::new("S1"), 1.5);
        table.insert(ClientId::new("C2"), SatelliteId::new("S1"), 2.0);
        table.insert(ClientId::new("C1"), SatelliteId::new("S2"), 4.0);
        table
    }

    #[test]
    fn absent_pairs_are_disallowed() {
        let table = sample_table();
        let c2 = ClientId::new("C2");
        let s2 = SatelliteId::new("S2");

        assert!(!table.is_allowed(&c2, &s2));
        assert_eq!(table.cost(&c2, &s2), None);
        assert_eq!(table.cost(&ClientId::new("C1"), &SatelliteId::new("S1")), Some(1.5));
    }

    #[test]
    fn reinsert_overwrites_in_place() {
        let mut table = sample_table();
        let previous = table.insert(ClientId::new("C1"), SatelliteId::new("S1"), 9.0);

        assert_eq!(previous, Some(1.5));
        assert_eq!(table.len(), 3);
        let first = table.iter().next().unwrap();
        assert_eq!(first.from, ClientId::new("C1"));
        assert_eq!(first.cost, 9.0);
    }

    #[test]
    fn neighbours_follow_insertion_order() {
        let table = sample_table();
        let c1 = ClientId::new("C1");
        let targets: Vec<&str> = table.targets_of(&c1).map(|e| e.to.as_str()).collect();
        assert_eq!(targets, vec!["S1", "S2"]);

        let s1 = SatelliteId::new("S1");
        let sources: Vec<&str> = table.sources_of(&s1).map(|e| e.from.as_str()).collect();
        assert_eq!(sources, vec!["C1", "C2"]);
    }

    #[test]
    fn fixed_costs_lookup() {
        let mut fixed = FixedCosts::new();
        assert!(fixed.is_empty());
        fixed.insert(SatelliteId::new("S1"), 10.0);
        fixed.insert(SatelliteId::new("S2"), 12.0);

        assert_eq!(fixed.get(&SatelliteId::new("S2")), Some(12.0));
        assert!(!fixed.contains(&SatelliteId::new("S3")));
        assert_eq!(fixed.insert(SatelliteId::new("S1"), 11.0), Some(10.0));
        assert_eq!(fixed.len(), 2);
    }
}
