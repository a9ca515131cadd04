use serde::{Deserialize, Serialize};

// Fallback avatar served for users who register without one
pub const DEFAULT_AVATAR: &str = "https://secure.gravatar.com/avatar?d=mp";

#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub avatar: String,

    /// At most one record per `problem` value; the store enforces this
    /// with a UNIQUE constraint and the reconciler never produces duplicates.
    pub solved_problems: Vec<SolvedProblemRecord>,

    /// Directed relation: adding A -> B does not add B -> A.
    pub friends: Vec<String>,

    /// Resume hint for the scraper. Never consulted when merging
    /// solved-problem state.
    pub last_checkpoint: Option<String>,

    /// Optimistic-lock counter maintained by the store.
    pub version: i64,
}

impl User {
    pub fn new(username: &str, avatar: Option<&str>) -> Self {
        Self {
            username: username.to_owned(),
            avatar: avatar.unwrap_or(DEFAULT_AVATAR).to_owned(),
            solved_problems: Vec::new(),
            friends: Vec::new(),
            last_checkpoint: None,
            version: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedProblemRecord {
    pub problem: String,
    pub submission_id: Option<String>,
    pub status: SubmissionStatus,
}

/// Outcome of a submission as we track it. Anything the source stream
/// reports that isn't exactly the literal "Accepted" collapses to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    Accepted,
    Other,
}

impl SubmissionStatus {
    pub fn parse(raw: &str) -> Self {
        if raw == "Accepted" {
            Self::Accepted
        } else {
            Self::Other
        }
    }

    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A raw submission event from the scraper. Untrusted: any field may be
/// missing, slugs may repeat within a batch, and whole batches may replay
/// submissions we've already merged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingSubmission {
    #[serde(default)]
    pub problem_slug: Option<String>,
    #[serde(default)]
    pub submission_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl IncomingSubmission {
    pub fn status(&self) -> SubmissionStatus {
        SubmissionStatus::parse(self.status.as_deref().unwrap_or_default())
    }

    /// The id we record for this submission: `submissionId`, falling back
    /// to `id`, treating empty strings as absent.
    pub fn effective_id(&self) -> Option<&str> {
        self.submission_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.as_deref().filter(|s| !s.is_empty()))
    }
}
