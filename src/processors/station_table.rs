use crate::models::StationStats;
use hashbrown::HashMap;

/// Station name to running statistics.
///
/// Keys are the raw name bytes. Lookups take a borrowed slice straight out of
/// the block buffer; an owned key is allocated only when a station is seen
/// for the first time.
#[derive(Debug, Default)]
pub struct StationTable {
    stations: HashMap<Box<[u8]>, StationStats>,
}

impl StationTable {
    pub fn new() -> Self {
        Self {
            stations: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stations: HashMap::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn find_or_create(&mut self, name: &[u8]) -> &mut StationStats {
        self.stations
            .entry_ref(name)
            .or_insert_with(StationStats::new)
    }

    #[inline(always)]
    pub fn record(&mut self, name: &[u8], temperature_x10: i32) {
        self.find_or_create(name).update(temperature_x10);
    }

    pub fn get(&self, name: &[u8]) -> Option<&StationStats> {
        self.stations.get(name)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Entries in table order, which is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &StationStats)> {
        self.stations.iter().map(|(name, stats)| (&**name, stats))
    }

    pub fn total_observations(&self) -> u64 {
        self.stations.values().map(|s| s.count).sum()
    }
}
