//! The load-reconcile-store pipeline fed by the scraper.

use crate::checkpoint;
use crate::error::{Error, Result};
use crate::models::IncomingSubmission;
use crate::reconcile;
use crate::store::Store;

/// How many times a batch is replayed against a fresh read before a
/// `Conflict` is surfaced to the caller. Reconciliation is idempotent, so
/// every retry is safe; this only bounds pathological contention.
const MAX_SAVE_ATTEMPTS: u32 = 3;

#[derive(Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    pub new_solved_count: usize,
    pub total_solved_count: usize,
}

/// Folds a scraper batch into `username`'s stored state and advances their
/// checkpoint, atomically. Unknown usernames are registered on the fly, the
/// way the scraper expects.
///
/// On a write conflict the whole sequence is retried from a fresh read;
/// a batch replayed against already-merged state simply reports zero new
/// solves.
pub fn process_submissions(
    store: &mut Store,
    username: &str,
    submissions: &[IncomingSubmission],
    latest_submission_id: Option<&str>,
) -> Result<BatchOutcome> {
    log::trace!(
        "[process_submissions] {} submissions for {username}, checkpoint candidate {:?}",
        submissions.len(),
        latest_submission_id
    );

    let mut attempts = 0;
    loop {
        attempts += 1;

        let loaded = match store.load_user(username)? {
            Some(user) => user,
            // Lazy registration can itself lose a race; that conflict is
            // retryable like any other.
            None => match store.create_user(username, None) {
                Ok(user) => user,
                Err(Error::Conflict) if attempts < MAX_SAVE_ATTEMPTS => continue,
                Err(err) => return Err(err),
            },
        };

        let mut user = loaded;
        let summary = reconcile::reconcile(&mut user.solved_problems, submissions);
        user.last_checkpoint = checkpoint::advance(user.last_checkpoint.take(), latest_submission_id);

        match store.save_user(&mut user) {
            Ok(()) => {
                log::info!(
                    "Reconciled batch for {username}: {} added, {} upgraded, {} total solved.",
                    summary.added.len(),
                    summary.upgraded.len(),
                    user.solved_problems.len()
                );
                return Ok(BatchOutcome {
                    new_solved_count: summary.added.len(),
                    total_solved_count: user.solved_problems.len(),
                });
            }
            Err(Error::Conflict) if attempts < MAX_SAVE_ATTEMPTS => {
                log::warn!(
                    "[process_submissions] Write conflict for {username} (attempt {attempts}), retrying from a fresh read..."
                );
            }
            Err(err) => return Err(err),
        }
    }
}

/// Read-back of the resume checkpoint for the scraper.
pub fn checkpoint_of(store: &Store, username: &str) -> Result<Option<String>> {
    store
        .load_user(username)?
        .map(|user| user.last_checkpoint)
        .ok_or(Error::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionStatus;

    fn sub(slug: &str, id: &str, status: &str) -> IncomingSubmission {
        IncomingSubmission {
            problem_slug: Some(slug.to_owned()),
            submission_id: Some(id.to_owned()),
            status: Some(status.to_owned()),
            id: None,
        }
    }

    #[test]
    fn lazily_registers_unknown_users() {
        let mut store = Store::open_in_memory().unwrap();

        let outcome = process_submissions(
            &mut store,
            "alice",
            &[sub("two-sum", "s1", "Accepted")],
            Some("s1"),
        )
        .unwrap();

        assert_eq!(
            outcome,
            BatchOutcome {
                new_solved_count: 1,
                total_solved_count: 1,
            }
        );

        let alice = store.load_user("alice").unwrap().unwrap();
        assert_eq!(alice.solved_problems[0].status, SubmissionStatus::Accepted);
        assert_eq!(alice.last_checkpoint, Some("s1".to_owned()));
    }

    #[test]
    fn replayed_batch_reports_zero_new() {
        let mut store = Store::open_in_memory().unwrap();
        let batch = [
            sub("two-sum", "s1", "Accepted"),
            sub("lru-cache", "s2", "Wrong Answer"),
        ];

        process_submissions(&mut store, "alice", &batch, Some("s2")).unwrap();
        let outcome = process_submissions(&mut store, "alice", &batch, Some("s2")).unwrap();

        assert_eq!(
            outcome,
            BatchOutcome {
                new_solved_count: 0,
                total_solved_count: 2,
            }
        );
    }

    #[test]
    fn empty_checkpoint_candidate_leaves_resume_point_alone() {
        let mut store = Store::open_in_memory().unwrap();
        process_submissions(&mut store, "alice", &[], Some("sub_100")).unwrap();
        process_submissions(&mut store, "alice", &[], Some("")).unwrap();
        process_submissions(&mut store, "alice", &[], None).unwrap();

        assert_eq!(
            checkpoint_of(&store, "alice").unwrap(),
            Some("sub_100".to_owned())
        );
    }

    #[test]
    fn checkpoint_of_unknown_user_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            checkpoint_of(&store, "nobody"),
            Err(Error::NotFound)
        ));
    }
}
