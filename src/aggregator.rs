//! Single-pass geographic extreme tracking.
//!
//! For every grouping key the aggregator keeps the easternmost, westernmost,
//! northernmost and southernmost record seen so far. Each observation costs
//! four comparisons; nothing is ever revisited.
//!
//! Comparisons are strict, so the first record reaching an extreme value
//! keeps the slot and later records with the same value do not replace it.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// The three values of a record the aggregator looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    pub id: &'a str,
    pub latitude: f64,
    pub longitude: f64,
}

impl<'a> Observation<'a> {
    pub fn new(id: &'a str, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
        }
    }
}

/// Best-so-far record in one direction
#[derive(Debug, Clone, PartialEq)]
pub struct Extreme {
    /// Identifier of the winning record, empty until the first observation
    pub id: String,
    pub coordinate: f64,
}

impl Extreme {
    fn sentinel(coordinate: f64) -> Self {
        Self {
            id: String::new(),
            coordinate,
        }
    }

    /// Take `id`/`coordinate` if `wins` says it beats the current value
    fn challenge(&mut self, id: &str, coordinate: f64, wins: fn(f64, f64) -> bool) {
        if wins(coordinate, self.coordinate) {
            self.coordinate = coordinate;
            self.id.clear();
            self.id.push_str(id);
        }
    }
}

fn greater(candidate: f64, current: f64) -> bool {
    candidate > current
}

fn less(candidate: f64, current: f64) -> bool {
    candidate < current
}

/// The four running extremes of one grouping key
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeRecord {
    /// Maximum longitude
    pub east: Extreme,
    /// Minimum longitude
    pub west: Extreme,
    /// Maximum latitude
    pub north: Extreme,
    /// Minimum latitude
    pub south: Extreme,
    /// Observations folded into this record
    pub count: usize,
}

impl Default for ExtremeRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtremeRecord {
    /// Empty record; infinite sentinels make the first observation win every slot
    pub fn new() -> Self {
        Self {
            east: Extreme::sentinel(f64::NEG_INFINITY),
            west: Extreme::sentinel(f64::INFINITY),
            north: Extreme::sentinel(f64::NEG_INFINITY),
            south: Extreme::sentinel(f64::INFINITY),
            count: 0,
        }
    }

    /// Fold one observation into the four slots
    pub fn observe(&mut self, observation: &Observation<'_>) {
        let Observation {
            id,
            latitude,
            longitude,
        } = *observation;

        self.east.challenge(id, longitude, greater);
        self.west.challenge(id, longitude, less);
        self.north.challenge(id, latitude, greater);
        self.south.challenge(id, latitude, less);
        self.count += 1;
    }

    /// Combine with a record built from later input.
    ///
    /// Uses the same strict comparisons as [`Self::observe`], so on equal
    /// coordinates `self` keeps its slot.
    pub fn merge(&mut self, later: &ExtremeRecord) {
        self.east
            .challenge(&later.east.id, later.east.coordinate, greater);
        self.west
            .challenge(&later.west.id, later.west.coordinate, less);
        self.north
            .challenge(&later.north.id, later.north.coordinate, greater);
        self.south
            .challenge(&later.south.id, later.south.coordinate, less);
        self.count += later.count;
    }
}

/// Running extremes for every grouping key seen so far
#[derive(Debug, Clone, Default)]
pub struct ExtremeAggregator {
    regions: BTreeMap<String, ExtremeRecord>,
    observations: usize,
}

impl ExtremeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the record for `key`, creating it on first sight.
    ///
    /// Any key is valid, including the empty string.
    pub fn observe(&mut self, key: &str, observation: Observation<'_>) {
        match self.regions.get_mut(key) {
            Some(record) => record.observe(&observation),
            None => {
                let mut record = ExtremeRecord::new();
                record.observe(&observation);
                self.regions.insert(key.to_string(), record);
            }
        }
        self.observations += 1;
    }

    /// Extremes by key in lexicographic key order
    pub fn results(&self) -> &BTreeMap<String, ExtremeRecord> {
        &self.regions
    }

    pub fn get(&self, key: &str) -> Option<&ExtremeRecord> {
        self.regions.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ExtremeRecord> {
        self.regions.iter()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total observations across all keys
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Reduce with an aggregator built over input that came after this one
    pub fn merge(&mut self, later: ExtremeAggregator) {
        for (key, record) in later.regions {
            match self.regions.get_mut(&key) {
                Some(existing) => existing.merge(&record),
                None => {
                    self.regions.insert(key, record);
                }
            }
        }
        self.observations += later.observations;
    }

    pub fn into_results(self) -> BTreeMap<String, ExtremeRecord> {
        self.regions
    }
}

impl<'a> IntoIterator for &'a ExtremeAggregator {
    type Item = (&'a String, &'a ExtremeRecord);
    type IntoIter = btree_map::Iter<'a, String, ExtremeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
