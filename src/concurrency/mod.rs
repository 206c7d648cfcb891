//! Fans a [`StageGenerator`] out across every QA in an [`Expe`], one
//! cooperative task per QA, with checkpoint snapshots on both a periodic
//! cadence and task failure.
//!
//! One task is spawned per unit of work, collected as `JoinHandle`s, and
//! awaited in order. A `Semaphore` here only bounds how many QAs run at
//! once overall (`max_concurrent_qas`); a per-*model* concurrency limit is
//! a separate, narrower knob that belongs on the `LlmDriver` instead.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::core::Expe;
use crate::generators::StageGenerator;
use crate::llm::Step;

/// A snapshot taken mid-run: either a periodic save under the canonical
/// name, or a failure-tagged one naming the QA that triggered it.
#[derive(Debug, Clone)]
pub enum Checkpoint {
    /// `save_every` completions have elapsed; save under the canonical name.
    Periodic,
    /// Task `index` (1-based) of `total` panicked; save under a
    /// `Stopped_at_<index>_of_<total>_*` name.
    Failure { index: usize, total: usize },
}

/// Runs `generator` over every QA in `expe`, mutating it in place.
///
/// `on_checkpoint` is invoked with the Expe's current state (all QAs
/// completed so far reflected, the rest left at their pre-run values) each
/// time a periodic or failure checkpoint is due. It is synchronous because
/// a checkpoint save is a single-writer operation that should complete
/// before the next task's results are folded in.
pub async fn fan_out(
    generator: Arc<dyn StageGenerator>,
    expe: &mut Expe,
    start_from: Step,
    missing_only: bool,
    only_llms: Option<Arc<[String]>>,
    max_concurrent_qas: usize,
    save_every: usize,
    mut on_checkpoint: impl FnMut(&Expe, Checkpoint),
) {
    let total = expe.qas.len();
    // Keep the pre-run state so a checkpoint taken before a QA's task has
    // completed still has *something* in that slot, preserving the order
    // invariant even for a partially-finished run.
    let mut current: Vec<_> = expe.qas.clone();

    let limit = Arc::new(Semaphore::new(if max_concurrent_qas == 0 {
        total.max(1)
    } else {
        max_concurrent_qas
    }));

    let mut handles = Vec::with_capacity(total);
    for qa in expe.qas.drain(..) {
        let generator = Arc::clone(&generator);
        let only_llms = only_llms.clone();
        let limit = Arc::clone(&limit);
        handles.push(tokio::spawn(async move {
            let _permit = limit.acquire_owned().await.ok();
            generator
                .process_one(qa, start_from, missing_only, only_llms.as_deref())
                .await
        }));
    }

    let mut completed = 0usize;
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(qa) => {
                current[index] = qa;
                completed += 1;
                if save_every > 0 && completed % save_every == 0 {
                    info!(completed, total, "checkpoint: periodic save");
                    let snapshot = Expe {
                        qas: current.clone(),
                        meta: expe.meta.clone(),
                    };
                    on_checkpoint(&snapshot, Checkpoint::Periodic);
                }
            }
            Err(join_error) => {
                error!(index, total, %join_error, "stage task failed; checkpointing and continuing");
                let snapshot = Expe {
                    qas: current.clone(),
                    meta: expe.meta.clone(),
                };
                on_checkpoint(
                    &snapshot,
                    Checkpoint::Failure {
                        index: index + 1,
                        total,
                    },
                );
            }
        }
    }

    expe.qas = current;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Question, QA};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct UppercaseGenerator;

    #[async_trait]
    impl StageGenerator for UppercaseGenerator {
        fn stage_name(&self) -> &'static str {
            "test"
        }

        async fn process_one(
            &self,
            mut qa: QA,
            _start_from: Step,
            _missing_only: bool,
            _only_llms: Option<&[String]>,
        ) -> QA {
            qa.question.text = qa.question.text.to_uppercase();
            qa
        }
    }

    struct PanicOnThird;

    #[async_trait]
    impl StageGenerator for PanicOnThird {
        fn stage_name(&self) -> &'static str {
            "test"
        }

        async fn process_one(
            &self,
            qa: QA,
            _start_from: Step,
            _missing_only: bool,
            _only_llms: Option<&[String]>,
        ) -> QA {
            if qa.question.text == "c" {
                panic!("boom");
            }
            qa
        }
    }

    fn expe_of(letters: &[&str]) -> Expe {
        Expe::from_qas(letters.iter().map(|l| QA::from_question(Question::new(*l))).collect())
    }

    #[tokio::test]
    async fn preserves_order_and_mutates_every_qa() {
        let mut expe = expe_of(&["a", "b", "c"]);
        fan_out(
            Arc::new(UppercaseGenerator),
            &mut expe,
            Step::Beginning,
            false,
            None,
            0,
            0,
            |_, _| {},
        )
        .await;
        let texts: Vec<_> = expe.qas.iter().map(|qa| qa.question.text.clone()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn periodic_checkpoint_fires_every_save_every_completions() {
        let mut expe = expe_of(&["a", "b", "c", "d"]);
        let saves = Mutex::new(Vec::new());
        fan_out(
            Arc::new(UppercaseGenerator),
            &mut expe,
            Step::Beginning,
            false,
            None,
            0,
            2,
            |snapshot, checkpoint| {
                if let Checkpoint::Periodic = checkpoint {
                    saves.lock().unwrap_or_else(|e| e.into_inner()).push(snapshot.len());
                }
            },
        )
        .await;
        assert_eq!(*saves.lock().unwrap_or_else(|e| e.into_inner()), vec![4, 4]);
    }

    #[tokio::test]
    async fn failure_checkpoint_names_the_failing_index_and_keeps_siblings() {
        let mut expe = expe_of(&["a", "b", "c", "d"]);
        let failure_tag = Mutex::new(None);
        fan_out(
            Arc::new(PanicOnThird),
            &mut expe,
            Step::Beginning,
            false,
            None,
            0,
            0,
            |snapshot, checkpoint| {
                if let Checkpoint::Failure { index, total } = checkpoint {
                    *failure_tag.lock().unwrap_or_else(|e| e.into_inner()) = Some((index, total));
                    assert_eq!(snapshot.qas[0].question.text, "a");
                    assert_eq!(snapshot.qas[1].question.text, "b");
                }
            },
        )
        .await;
        assert_eq!(
            *failure_tag.lock().unwrap_or_else(|e| e.into_inner()),
            Some((3, 4))
        );
        // siblings completed despite the panic in the third task
        assert_eq!(expe.qas[0].question.text, "a");
        assert_eq!(expe.qas[3].question.text, "d");
    }

    struct TrackingGenerator {
        current: Arc<std::sync::atomic::AtomicU32>,
        peak: Arc<std::sync::atomic::AtomicU32>,
    }

    #[async_trait]
    impl StageGenerator for TrackingGenerator {
        fn stage_name(&self) -> &'static str {
            "test"
        }

        async fn process_one(
            &self,
            qa: QA,
            _start_from: Step,
            _missing_only: bool,
            _only_llms: Option<&[String]>,
        ) -> QA {
            use std::sync::atomic::Ordering;
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            qa
        }
    }

    #[tokio::test]
    async fn max_concurrent_qas_bounds_simultaneous_tasks() {
        use std::sync::atomic::{AtomicU32, Ordering};
        let current = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));
        let mut expe = expe_of(&["a", "b", "c", "d", "e", "f"]);
        fan_out(
            Arc::new(TrackingGenerator {
                current: Arc::clone(&current),
                peak: Arc::clone(&peak),
            }),
            &mut expe,
            Step::Beginning,
            false,
            None,
            2,
            0,
            |_, _| {},
        )
        .await;
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }
}
