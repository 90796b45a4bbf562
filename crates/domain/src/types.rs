//! Metric identity, reducer kinds and mergeable values

use serde::{Deserialize, Serialize};

use crate::constants::{UNIT_COUNTER, UNIT_TIMER};

/// Aggregation identity of a metric.
///
/// Two events with the same name and unit always merge into the same slot.
/// The same name under a different unit is an unrelated metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricKey {
    name: String,
    unit: String,
}

impl MetricKey {
    /// Key for an arbitrary unit.
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self { name: name.into(), unit: unit.into() }
    }

    /// Key for a counter (`c`).
    pub fn counter(name: impl Into<String>) -> Self {
        Self::new(name, UNIT_COUNTER)
    }

    /// Key for a timer (`ms`).
    pub fn timer(name: impl Into<String>) -> Self {
        Self::new(name, UNIT_TIMER)
    }

    /// Metric name as written on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit suffix, e.g. `c` or `ms`.
    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// Merge strategy bound to a key for the lifetime of an aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducerKind {
    /// Running total of all amounts
    Sum,
    /// Mean of all amounts
    #[serde(rename = "avg")]
    Average,
}

crate::impl_domain_status_conversions!(ReducerKind {
    Sum => "sum",
    Average => "avg",
});

/// Running integer total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumValue {
    /// Saturating sum of merged amounts
    pub total: i64,
}

impl SumValue {
    /// Add `amount`, saturating at the `i64` bounds.
    pub fn add(&mut self, amount: i64) {
        self.total = self.total.saturating_add(amount);
    }
}

/// Exact running mean.
///
/// Keeps the full `total` and derives the average on read, so integer
/// truncation never compounds across merges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageValue {
    /// Number of merged amounts
    pub count: u64,
    /// Saturating sum of merged amounts
    pub total: i64,
}

impl AverageValue {
    /// Record one more sample.
    pub fn add(&mut self, amount: i64) {
        self.count += 1;
        self.total = self.total.saturating_add(amount);
    }

    /// `total / count`, truncated toward zero. Zero when nothing was merged.
    pub fn average(&self) -> i64 {
        if self.count == 0 {
            return 0;
        }
        i64::try_from(self.count).map_or(0, |count| self.total / count)
    }
}

/// Aggregated value of one table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MetricValue {
    Sum(SumValue),
    #[serde(rename = "avg")]
    Average(AverageValue),
}

impl MetricValue {
    /// Zero value of the given kind, ready for the first merge.
    pub fn empty(kind: ReducerKind) -> Self {
        match kind {
            ReducerKind::Sum => Self::Sum(SumValue::default()),
            ReducerKind::Average => Self::Average(AverageValue::default()),
        }
    }

    /// Reducer kind this value was created with.
    pub fn kind(&self) -> ReducerKind {
        match self {
            Self::Sum(_) => ReducerKind::Sum,
            Self::Average(_) => ReducerKind::Average,
        }
    }

    /// The number rendered on the wire: the sum, or the average.
    pub fn value(&self) -> i64 {
        match self {
            Self::Sum(sum) => sum.total,
            Self::Average(avg) => avg.average(),
        }
    }

    /// Fold an amount into the value. Callers check the kind first.
    pub fn add(&mut self, amount: i64) {
        match self {
            Self::Sum(sum) => sum.add(amount),
            Self::Average(avg) => avg.add(amount),
        }
    }
}

/// Unit of work placed on the ingestion queue by a producer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricEvent {
    /// Slot the amount merges into
    pub key: MetricKey,
    /// Value to fold in
    pub amount: i64,
    /// How the slot combines amounts
    pub kind: ReducerKind,
}

impl MetricEvent {
    /// Event with an explicit key and reducer.
    pub fn new(key: MetricKey, amount: i64, kind: ReducerKind) -> Self {
        Self { key, amount, kind }
    }

    /// Counter increment (`c`, summed).
    pub fn count(name: impl Into<String>, amount: i64) -> Self {
        Self::new(MetricKey::counter(name), amount, ReducerKind::Sum)
    }

    /// Timer measurement (`ms`, summed).
    pub fn timer(name: impl Into<String>, amount: i64) -> Self {
        Self::new(MetricKey::timer(name), amount, ReducerKind::Sum)
    }

    /// Timer measurement (`ms`, averaged).
    pub fn average_timer(name: impl Into<String>, amount: i64) -> Self {
        Self::new(MetricKey::timer(name), amount, ReducerKind::Average)
    }
}
