//! The live metrics table
//!
//! A plain map from [`MetricKey`] to [`MetricValue`]. It does no locking of
//! its own; [`Aggregator`](super::Aggregator) owns the single table-wide lock.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bucky_domain::{BuckyError, MetricEvent, MetricKey, MetricValue, Result};

/// One entry per distinct key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetricsTable {
    entries: HashMap<MetricKey, MetricValue>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into its slot, creating the slot on first sight.
    ///
    /// # Errors
    /// Returns `BuckyError::ReducerKindConflict` when the key is already
    /// aggregated under the other reducer kind. The existing value is left
    /// untouched.
    pub fn merge(&mut self, event: MetricEvent) -> Result<()> {
        let MetricEvent { key, amount, kind } = event;
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get().kind();
                if existing != kind {
                    return Err(BuckyError::ReducerKindConflict {
                        name: slot.key().name().to_string(),
                        unit: slot.key().unit().to_string(),
                        existing,
                        attempted: kind,
                    });
                }
                slot.get_mut().add(amount);
            }
            Entry::Vacant(slot) => {
                let mut value = MetricValue::empty(kind);
                value.add(amount);
                slot.insert(value);
            }
        }
        Ok(())
    }

    /// Current value for `key`, if merged this window.
    pub fn get(&self, key: &MetricKey) -> Option<&MetricValue> {
        self.entries.get(key)
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&MetricKey, &MetricValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty the table regardless of its contents.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Swap in an empty table and hand back the old contents.
    pub fn take(&mut self) -> MetricsTable {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use bucky_domain::ReducerKind;

    use super::*;

    #[test]
    fn counts_sum_per_key() {
        let mut table = MetricsTable::new();
        for amount in [1, 2, 3] {
            table.merge(MetricEvent::count("x", amount)).unwrap();
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&MetricKey::counter("x")).unwrap().value(), 6);
    }

    #[test]
    fn average_observed_after_each_merge() {
        let mut table = MetricsTable::new();
        let key = MetricKey::timer("latency");
        let mut observed = Vec::new();
        for amount in [1, 3, 5] {
            table.merge(MetricEvent::average_timer("latency", amount)).unwrap();
            observed.push(table.get(&key).unwrap().value());
        }
        assert_eq!(observed, vec![1, 2, 3]);
    }

    #[test]
    fn same_name_under_different_units_are_separate_entries() {
        let mut table = MetricsTable::new();
        table.merge(MetricEvent::count("latency", 1)).unwrap();
        table.merge(MetricEvent::timer("latency", 250)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&MetricKey::counter("latency")).unwrap().value(), 1);
        assert_eq!(table.get(&MetricKey::timer("latency")).unwrap().value(), 250);
    }

    #[test]
    fn kind_conflict_is_rejected_and_leaves_value_untouched() {
        let mut table = MetricsTable::new();
        table.merge(MetricEvent::timer("render", 10)).unwrap();
        table.merge(MetricEvent::timer("render", 5)).unwrap();

        let err = table.merge(MetricEvent::average_timer("render", 1000)).unwrap_err();
        assert_eq!(
            err,
            BuckyError::ReducerKindConflict {
                name: "render".into(),
                unit: "ms".into(),
                existing: ReducerKind::Sum,
                attempted: ReducerKind::Average,
            }
        );

        let value = table.get(&MetricKey::timer("render")).unwrap();
        assert_eq!(value.kind(), ReducerKind::Sum);
        assert_eq!(value.value(), 15);
    }

    #[test]
    fn average_first_then_sum_is_also_a_conflict() {
        let mut table = MetricsTable::new();
        table.merge(MetricEvent::average_timer("render", 4)).unwrap();
        assert!(table.merge(MetricEvent::timer("render", 4)).is_err());
        assert_eq!(table.get(&MetricKey::timer("render")).unwrap().value(), 4);
    }

    #[test]
    fn reset_always_empties() {
        let mut table = MetricsTable::new();
        table.reset();
        assert!(table.is_empty());

        table.merge(MetricEvent::count("test", 1)).unwrap();
        table.merge(MetricEvent::count("test2", 1)).unwrap();
        assert_eq!(table.len(), 2);

        table.reset();
        assert!(table.is_empty());

        table.merge(MetricEvent::count("test3", 1)).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn take_leaves_an_empty_table_behind() {
        let mut table = MetricsTable::new();
        table.merge(MetricEvent::count("a", 1)).unwrap();
        let snapshot = table.take();
        assert!(table.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
