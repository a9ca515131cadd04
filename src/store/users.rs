use crate::error::{Error, Result};
use crate::models::{SolvedProblemRecord, SubmissionStatus, User};
use crate::store::Store;

/////*============== USER QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for SolvedProblemRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> std::result::Result<Self, rusqlite::Error> {
        Ok(Self {
            problem: row.get("problem")?,
            submission_id: row.get("submission_id")?,
            status: if row.get::<_, bool>("accepted")? {
                SubmissionStatus::Accepted
            } else {
                SubmissionStatus::Other
            },
        })
    }
}

impl Store {
    /// Returns the user with the username `username`, if they exist, with
    /// their solved set and friend usernames hydrated.
    pub fn load_user(&self, username: &str) -> Result<Option<User>> {
        let Some((avatar, last_checkpoint, version)) = self
            .conn
            .prepare("SELECT avatar, last_checkpoint, version FROM Users WHERE username = :username")?
            .query(rusqlite::named_params! { ":username": username })?
            .next()?
            .map(|row| {
                Ok::<_, rusqlite::Error>((
                    row.get::<_, String>("avatar")?,
                    row.get::<_, Option<String>>("last_checkpoint")?,
                    row.get::<_, i64>("version")?,
                ))
            })
            .transpose()?
        else {
            return Ok(None);
        };

        let solved_problems = self
            .conn
            .prepare(
                "SELECT problem, submission_id, accepted
                 FROM SolvedProblems
                 WHERE username = :username
                 ORDER BY rowid",
            )?
            .query_map(rusqlite::named_params! { ":username": username }, |row| {
                SolvedProblemRecord::try_from(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let friends = self
            .conn
            .prepare("SELECT friend FROM Friends WHERE username = :username ORDER BY rowid")?
            .query_map(rusqlite::named_params! { ":username": username }, |row| {
                row.get::<_, String>("friend")
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some(User {
            username: username.to_owned(),
            avatar,
            solved_problems,
            friends,
            last_checkpoint,
            version,
        }))
    }

    /// Registers a new user. Uniqueness is enforced here: an existing
    /// username comes back as `Conflict`.
    pub fn create_user(&self, username: &str, avatar: Option<&str>) -> Result<User> {
        if username.trim().is_empty() {
            return Err(Error::MalformedInput("username must not be blank".into()));
        }

        let user = User::new(username, avatar);

        log::trace!("[create_user] Inserting user {username} into Users...");
        let inserted = self
            .conn
            .prepare("INSERT INTO Users (username, avatar) VALUES (:username, :avatar)")?
            .execute(rusqlite::named_params! {
                ":username": user.username,
                ":avatar":   user.avatar,
            })
            .map_or_else(super::swallow_constraint_violation, |_| Ok(true))?;

        if !inserted {
            return Err(Error::Conflict);
        }

        log::info!("User {username} has been registered.");
        Ok(user)
    }

    /// Persists a user's solved set, checkpoint, and avatar in one
    /// transaction, guarded by the version the user was loaded at. A stale
    /// version means another writer got there first -> `Conflict`, and
    /// nothing is written (the checkpoint never lands without its state).
    ///
    /// Friendship edges are deliberately not written here; they change only
    /// through [`Store::add_friend`] / [`Store::remove_friend`].
    pub fn save_user(&mut self, user: &mut User) -> Result<()> {
        log::trace!(
            "[save_user] Saving {} at version {}...",
            user.username,
            user.version
        );

        let tx = self.conn.transaction()?;

        let matched = tx.execute(
            "UPDATE Users
             SET avatar = :avatar, last_checkpoint = :last_checkpoint, version = version + 1
             WHERE username = :username AND version = :version",
            rusqlite::named_params! {
                ":username":        user.username,
                ":avatar":          user.avatar,
                ":last_checkpoint": user.last_checkpoint,
                ":version":         user.version,
            },
        )?;

        if matched == 0 {
            let exists = tx
                .prepare("SELECT 1 FROM Users WHERE username = :username")?
                .exists(rusqlite::named_params! { ":username": user.username })?;

            // Dropping the transaction rolls back the no-op update.
            return Err(if exists {
                log::warn!(
                    "[save_user] Version check failed for {}; concurrent writer won.",
                    user.username
                );
                Error::Conflict
            } else {
                Error::NotFound
            });
        }

        tx.execute(
            "DELETE FROM SolvedProblems WHERE username = :username",
            rusqlite::named_params! { ":username": user.username },
        )?;

        for record in &user.solved_problems {
            tx.execute(
                "INSERT INTO SolvedProblems ( username,  problem,  submission_id,  accepted)
                 VALUES                     (:username, :problem, :submission_id, :accepted)",
                rusqlite::named_params! {
                    ":username":      user.username,
                    ":problem":       record.problem,
                    ":submission_id": record.submission_id,
                    ":accepted":      record.status.is_accepted(),
                },
            )?;
        }

        tx.commit()?;
        user.version += 1;

        Ok(())
    }

    /// [internal] Checks if the user is in the database.
    pub(super) fn user_exists(&self, username: &str) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM Users WHERE username = :username")?
            .exists(rusqlite::named_params! { ":username": username })?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::models::{SolvedProblemRecord, SubmissionStatus, DEFAULT_AVATAR};
    use crate::store::Store;

    fn record(problem: &str) -> SolvedProblemRecord {
        SolvedProblemRecord {
            problem: problem.to_owned(),
            submission_id: Some(format!("{problem}-sub")),
            status: SubmissionStatus::Accepted,
        }
    }

    #[test]
    fn create_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        store.create_user("alice", None).unwrap();

        let user = store.load_user("alice").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.avatar, DEFAULT_AVATAR);
        assert!(user.solved_problems.is_empty());
        assert!(user.friends.is_empty());
        assert_eq!(user.last_checkpoint, None);
    }

    #[test]
    fn load_unknown_user_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_user("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_registration_conflicts() {
        let store = Store::open_in_memory().unwrap();
        store.create_user("alice", None).unwrap();

        assert!(matches!(
            store.create_user("alice", None),
            Err(Error::Conflict)
        ));
    }

    #[test]
    fn blank_username_is_malformed() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.create_user("   ", None),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn save_persists_state_and_checkpoint_together() {
        let mut store = Store::open_in_memory().unwrap();
        let mut user = store.create_user("alice", None).unwrap();

        user.solved_problems = vec![record("two-sum"), record("lru-cache")];
        user.last_checkpoint = Some("sub_42".to_owned());
        store.save_user(&mut user).unwrap();

        let reloaded = store.load_user("alice").unwrap().unwrap();
        assert_eq!(reloaded.solved_problems, user.solved_problems);
        assert_eq!(reloaded.last_checkpoint, Some("sub_42".to_owned()));
        assert_eq!(reloaded.version, user.version);
    }

    #[test]
    fn stale_version_save_conflicts_and_writes_nothing() {
        let mut store = Store::open_in_memory().unwrap();
        store.create_user("alice", None).unwrap();

        let mut first = store.load_user("alice").unwrap().unwrap();
        let mut second = store.load_user("alice").unwrap().unwrap();

        first.solved_problems = vec![record("two-sum")];
        store.save_user(&mut first).unwrap();

        second.solved_problems = vec![record("lru-cache")];
        second.last_checkpoint = Some("sub_9".to_owned());
        assert!(matches!(store.save_user(&mut second), Err(Error::Conflict)));

        // The losing write must not land partially.
        let reloaded = store.load_user("alice").unwrap().unwrap();
        assert_eq!(reloaded.solved_problems, vec![record("two-sum")]);
        assert_eq!(reloaded.last_checkpoint, None);
    }

    #[test]
    fn saving_a_missing_user_is_not_found() {
        let mut store = Store::open_in_memory().unwrap();
        let mut ghost = crate::models::User::new("ghost", None);
        assert!(matches!(store.save_user(&mut ghost), Err(Error::NotFound)));
    }
}
