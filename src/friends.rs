//! Read-only projection over already-reconciled friend state.

use serde::Serialize;

use crate::models::{SolvedProblemRecord, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendSolve {
    pub username: String,
    pub avatar: String,
    pub submission: SolvedProblemRecord,
}

/// Filters `friends` down to those who have a record for `slug`, projecting
/// out that one record per match. Output order follows the input order.
pub fn friends_who_solved(friends: &[User], slug: &str) -> Vec<FriendSolve> {
    friends
        .iter()
        .filter_map(|friend| {
            friend
                .solved_problems
                .iter()
                .find(|record| record.problem == slug)
                .map(|record| FriendSolve {
                    username: friend.username.clone(),
                    avatar: friend.avatar.clone(),
                    submission: record.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionStatus;

    fn friend_with(username: &str, problems: &[&str]) -> User {
        let mut user = User::new(username, None);
        user.solved_problems = problems
            .iter()
            .map(|p| SolvedProblemRecord {
                problem: (*p).to_owned(),
                submission_id: Some(format!("{p}-sub")),
                status: SubmissionStatus::Accepted,
            })
            .collect();
        user
    }

    #[test]
    fn projects_only_the_matching_friend() {
        let friends = [
            friend_with("alice", &["lru-cache"]),
            friend_with("bob", &["two-sum", "lru-cache"]),
            friend_with("carol", &[]),
        ];

        let solved = friends_who_solved(&friends, "two-sum");

        assert_eq!(solved.len(), 1);
        assert_eq!(solved[0].username, "bob");
        assert_eq!(solved[0].submission.problem, "two-sum");
        assert_eq!(solved[0].submission.submission_id, Some("two-sum-sub".to_owned()));
    }

    #[test]
    fn preserves_input_order() {
        let friends = [
            friend_with("alice", &["two-sum"]),
            friend_with("bob", &["two-sum"]),
        ];

        let solved = friends_who_solved(&friends, "two-sum");
        let names: Vec<&str> = solved.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[test]
    fn empty_when_nobody_solved_it() {
        let friends = [friend_with("alice", &["lru-cache"])];
        assert!(friends_who_solved(&friends, "two-sum").is_empty());
    }
}
