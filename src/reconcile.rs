//! The submission-reconciliation engine.
//!
//! Pure merge logic: takes a user's stored solved-problem state plus a batch
//! of raw scraper events and folds the batch in. The scraper is untrusted —
//! batches repeat slugs, replay submissions we've already merged, and arrive
//! in arbitrary order — so everything here has to be idempotent.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{IncomingSubmission, SolvedProblemRecord, SubmissionStatus};

/// What a single reconciliation changed, for caller-visible reporting.
/// Records that were already known and already Accepted show up in neither.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    /// Problems seen for the first time, in batch order.
    pub added: Vec<SolvedProblemRecord>,
    /// Existing records upgraded in place from Other to Accepted.
    pub upgraded: Vec<SolvedProblemRecord>,
}

/// Merges `incoming` into `solved`, mutating it in place, and reports what
/// changed.
///
/// Guarantees:
/// - idempotent: re-running the same batch against the result yields an
///   empty summary;
/// - `solved` never ends up with two records for the same problem;
/// - a record's status only ever moves Other -> Accepted, never back.
pub fn reconcile(
    solved: &mut Vec<SolvedProblemRecord>,
    incoming: &[IncomingSubmission],
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    let mut index: HashMap<String, usize> = solved
        .iter()
        .enumerate()
        .map(|(i, record)| (record.problem.clone(), i))
        .collect();

    for (slug, rep) in representatives(incoming) {
        match index.get(slug) {
            None => {
                let record = SolvedProblemRecord {
                    problem: slug.to_owned(),
                    submission_id: rep.effective_id().map(str::to_owned),
                    status: rep.status(),
                };
                index.insert(slug.to_owned(), solved.len());
                solved.push(record.clone());
                summary.added.push(record);
            }
            Some(&i) => {
                // Accepted is terminal; an Other representative never
                // overwrites the submission id we already hold.
                if !solved[i].status.is_accepted() && rep.status().is_accepted() {
                    solved[i].status = SubmissionStatus::Accepted;
                    solved[i].submission_id = rep.effective_id().map(str::to_owned);
                    summary.upgraded.push(solved[i].clone());
                }
            }
        }
    }

    summary
}

/// Intra-batch reduction: collapses the batch to one representative per
/// problem slug, preserving the batch's slug order. Within a slug group the
/// first Accepted submission wins; with no Accepted one, the first seen does.
/// Records without a usable slug are dropped, the rest of the batch still
/// processes.
fn representatives(incoming: &[IncomingSubmission]) -> Vec<(&str, &IncomingSubmission)> {
    let mut reps: Vec<(&str, &IncomingSubmission)> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for sub in incoming {
        let Some(slug) = sub.problem_slug.as_deref().filter(|s| !s.is_empty()) else {
            log::warn!("[representatives] dropping submission without a problem slug");
            continue;
        };

        match seen.entry(slug) {
            Entry::Vacant(vacant) => {
                vacant.insert(reps.len());
                reps.push((slug, sub));
            }
            Entry::Occupied(occupied) => {
                let i = *occupied.get();
                if sub.status().is_accepted() && !reps[i].1.status().is_accepted() {
                    reps[i] = (slug, sub);
                }
            }
        }
    }

    reps
}
