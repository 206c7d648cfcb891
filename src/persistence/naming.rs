//! The stats-in-filename suffixing convention: pure string rewrites over a
//! path stem, kept separate from any I/O so the idempotence property is
//! directly testable.

use crate::core::Stats;

const SEPARATOR: &str = "--";

/// Builds the stats suffix appended (after [`SEPARATOR`]) to a saved Expe's
/// filename: `<Q>Q_<C>C_<F>F_<M>M_<A>A_<HE>HE_<AE>AE_<timestamp>`.
///
/// `timestamp` is injected rather than computed here so the function stays
/// pure; callers format the current time as `%Y-%m-%d_%Hh%M,%S`.
#[must_use]
pub fn stats_suffix(stats: &Stats, timestamp: &str) -> String {
    format!(
        "{q}Q_{c}C_{f}F_{m}M_{a}A_{he}HE_{ae}AE_{timestamp}",
        q = stats.nb_questions,
        c = stats.nb_with_chunks,
        f = stats.nb_with_facts,
        m = stats.nb_models,
        a = stats.nb_answers,
        he = stats.nb_human_evals,
        ae = stats.nb_auto_evals,
    )
}

/// Applies `suffix` to `stem`, replacing any existing `--`-separated
/// suffix rather than appending a second one.
#[must_use]
pub fn apply_suffix(stem: &str, suffix: &str) -> String {
    match stem.find(SEPARATOR) {
        Some(pos) => format!("{}{SEPARATOR}{suffix}", &stem[..pos]),
        None => format!("{stem}{SEPARATOR}{suffix}"),
    }
}

/// Prefixes `stem` with `Stopped_at_<index>_of_<total>_`, naming a
/// failure-tagged checkpoint (`index` is 1-based).
#[must_use]
pub fn failure_stem(stem: &str, index: usize, total: usize) -> String {
    format!("Stopped_at_{index}_of_{total}_{stem}")
}
