//! HTTP surface. Thin projections of the library API; no merge logic here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use crate::error::Error;
use crate::friends::friends_who_solved;
use crate::ingest;
use crate::models::{IncomingSubmission, SolvedProblemRecord, User};
use crate::store::Store;

/// All handlers serialize through this lock, which also satisfies the
/// per-user write discipline the store's version check is there to enforce.
pub type SharedStore = Arc<Mutex<Store>>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/:username", get(get_user))
        .route("/users/:username/solved", get(get_solved))
        .route("/users/:username/solved/:slug", get(get_friends_who_solved))
        .route("/users/:username/friends", get(get_friends))
        .route("/users/:username/add-friend", post(add_friend))
        .route("/users/:username/remove-friend", delete(remove_friend))
        .route("/users/:username/submissions", post(post_submissions))
        .route("/users/:username/checkpoint", get(get_checkpoint))
        .with_state(store)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    username: String,
    #[serde(default)]
    avatar: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FriendRequest {
    friend_username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionBatch {
    #[serde(default)]
    submissions: Vec<IncomingSubmission>,
    #[serde(default)]
    latest_submission_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FriendEntry {
    username: String,
    avatar: String,
    solved_problems: Vec<SolvedProblemRecord>,
}

impl From<User> for FriendEntry {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            avatar: user.avatar,
            solved_problems: user.solved_problems,
        }
    }
}

async fn register(
    State(store): State<SharedStore>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, Error> {
    let user = store
        .lock()
        .await
        .create_user(&body.username, body.avatar.as_deref())?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "username": user.username, "avatar": user.avatar })),
    )
        .into_response())
}

async fn get_user(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let user = store
        .lock()
        .await
        .load_user(&username)?
        .ok_or(Error::NotFound)?;

    Ok(Json(json!({
        "message": "User exists",
        "user": {
            "username": user.username,
            "avatar": user.avatar,
            "solvedProblems": user.solved_problems,
            "solvedCount": user.solved_problems.len(),
            "friendsCount": user.friends.len(),
        }
    })))
}

async fn get_solved(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let user = store
        .lock()
        .await
        .load_user(&username)?
        .ok_or(Error::NotFound)?;

    log::debug!(
        "[get_solved] Returning {} solved problems for {username}",
        user.solved_problems.len()
    );

    Ok(Json(json!({
        "username": user.username,
        "avatar": user.avatar,
        "solvedProblems": user.solved_problems,
    })))
}

async fn get_friends_who_solved(
    State(store): State<SharedStore>,
    Path((username, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, Error> {
    let friends = store.lock().await.friends_of(&username)?;
    log::debug!(
        "[get_friends_who_solved] Looking for slug {slug:?} among {} friends of {username}",
        friends.len()
    );

    let solved = friends_who_solved(&friends, &slug);
    Ok(Json(json!(solved)))
}

async fn get_friends(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let friends: Vec<FriendEntry> = store
        .lock()
        .await
        .friends_of(&username)?
        .into_iter()
        .map(FriendEntry::from)
        .collect();

    Ok(Json(json!({ "friends": friends })))
}

async fn add_friend(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
    Json(body): Json<FriendRequest>,
) -> Result<Response, Error> {
    let added = store
        .lock()
        .await
        .add_friend(&username, &body.friend_username)?;

    if !added {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Already friends" })),
        )
            .into_response());
    }

    Ok(Json(json!({
        "message": format!("You are now friends with {}", body.friend_username)
    }))
    .into_response())
}

async fn remove_friend(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
    Json(body): Json<FriendRequest>,
) -> Result<Response, Error> {
    let removed = store
        .lock()
        .await
        .remove_friend(&username, &body.friend_username)?;

    if !removed {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Friend not found in your friends list" })),
        )
            .into_response());
    }

    Ok(Json(json!({
        "message": format!(
            "{} has been removed from your friends list",
            body.friend_username
        )
    }))
    .into_response())
}

async fn post_submissions(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
    Json(body): Json<SubmissionBatch>,
) -> Result<Json<serde_json::Value>, Error> {
    let outcome = ingest::process_submissions(
        &mut *store.lock().await,
        &username,
        &body.submissions,
        body.latest_submission_id.as_deref(),
    )?;

    Ok(Json(json!({
        "message": "Submissions processed successfully",
        "newSolvedCount": outcome.new_solved_count,
        "totalSolvedCount": outcome.total_solved_count,
    })))
}

async fn get_checkpoint(
    State(store): State<SharedStore>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let checkpoint = ingest::checkpoint_of(&*store.lock().await, &username)?;
    Ok(Json(json!({ "lastScrapedSubmissionId": checkpoint })))
}
