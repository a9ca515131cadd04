use crate::error::{Error, Result};
use crate::models::User;
use crate::store::Store;

/////*============== FRIEND QUERIES ==============*/
impl Store {
    /// Records the directed edge `username -> friend`. Adding A -> B does
    /// not add B -> A; the relation is asymmetric on purpose.
    ///
    /// Returns `true` if the edge was newly added, `false` if it already
    /// existed. Both usernames must refer to registered users.
    pub fn add_friend(&self, username: &str, friend: &str) -> Result<bool> {
        if !self.user_exists(username)? || !self.user_exists(friend)? {
            return Err(Error::NotFound);
        }

        log::trace!("[add_friend] Adding edge {username} -> {friend}...");
        self.conn
            .prepare("INSERT INTO Friends (username, friend) VALUES (:username, :friend)")?
            .execute(rusqlite::named_params! {
                ":username": username,
                ":friend":   friend,
            })
            .map_or_else(super::swallow_constraint_violation, |_| Ok(true))
            .inspect(|added| {
                if *added {
                    log::info!("{username} is now friends with {friend}.");
                }
            })
    }

    /// Removes the directed edge `username -> friend`.
    ///
    /// Returns `true` if an edge was actually removed. Both usernames must
    /// refer to registered users.
    pub fn remove_friend(&self, username: &str, friend: &str) -> Result<bool> {
        if !self.user_exists(username)? || !self.user_exists(friend)? {
            return Err(Error::NotFound);
        }

        log::trace!("[remove_friend] Removing edge {username} -> {friend}...");
        let removed = self
            .conn
            .prepare("DELETE FROM Friends WHERE username = :username AND friend = :friend")?
            .execute(rusqlite::named_params! {
                ":username": username,
                ":friend":   friend,
            })?;

        Ok(removed > 0)
    }

    /// Hydrated records for every friend of `username`, in the order the
    /// friendships were added.
    pub fn friends_of(&self, username: &str) -> Result<Vec<User>> {
        if !self.user_exists(username)? {
            return Err(Error::NotFound);
        }

        let friend_names = self
            .conn
            .prepare("SELECT friend FROM Friends WHERE username = :username ORDER BY rowid")?
            .query_map(rusqlite::named_params! { ":username": username }, |row| {
                row.get::<_, String>("friend")
            })?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        friend_names
            .iter()
            .map(|name| self.load_user(name)?.ok_or(Error::NotFound))
            .collect()
    }
}
