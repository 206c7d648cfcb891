//! The experiment record: an ordered list of [`QA`] rows plus metadata.

use serde::{Deserialize, Serialize};

use super::{Meta, Stats, QA};

/// An experiment: every question under evaluation, in file order.
///
/// Order is load-bearing — the concurrency driver indexes into `qas` by
/// position to name checkpoints (`Stopped_at_<i>_of_<N>_*`), and
/// `start_from`/`missing_only` resumption depends on each QA keeping its
/// original slot across a save/load round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expe {
    /// The rows, in original order.
    #[serde(default)]
    pub qas: Vec<QA>,

    /// Free-form metadata (e.g. the originating questions file name).
    #[serde(default)]
    pub meta: Meta,
}

impl Expe {
    /// Builds an `Expe` from a flat list of questions.
    #[must_use]
    pub fn from_qas(qas: Vec<QA>) -> Self {
        Self {
            qas,
            meta: Meta::default(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.qas.len()
    }

    /// `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.qas.is_empty()
    }

    /// Computes summary counts over the current state.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::from_expe(self)
    }
}
