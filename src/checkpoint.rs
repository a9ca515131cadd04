//! Resume-checkpoint tracking for the external submission stream.
//!
//! The checkpoint is an opaque token the scraper hands back so it can skip
//! history it already sent. It is a hint, not a sequence number: we overwrite
//! unconditionally when a non-empty candidate arrives, because reconciliation
//! itself is idempotent and replayed submissions are harmless.

/// Returns `candidate` when it is present and non-empty, otherwise leaves
/// `current` as it was. Absent or empty candidates never clear a checkpoint.
pub fn advance(current: Option<String>, candidate: Option<&str>) -> Option<String> {
    match candidate {
        Some(id) if !id.is_empty() => Some(id.to_owned()),
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_to_a_new_id() {
        assert_eq!(
            advance(Some("sub_100".into()), Some("sub_200")),
            Some("sub_200".to_owned())
        );
    }

    #[test]
    fn sets_first_checkpoint() {
        assert_eq!(advance(None, Some("sub_1")), Some("sub_1".to_owned()));
    }

    #[test]
    fn empty_candidate_is_a_noop() {
        assert_eq!(
            advance(Some("sub_100".into()), Some("")),
            Some("sub_100".to_owned())
        );
    }

    #[test]
    fn absent_candidate_is_a_noop() {
        assert_eq!(
            advance(Some("sub_100".into()), None),
            Some("sub_100".to_owned())
        );
        assert_eq!(advance(None, None), None);
    }
}
