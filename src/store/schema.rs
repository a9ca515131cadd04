pub const USERS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Users (
        username         TEXT        PRIMARY KEY,
        avatar           TEXT        NOT NULL,

        last_checkpoint  TEXT,
        version          INTEGER     NOT NULL    DEFAULT 0
    )";

pub const SOLVED_PROBLEMS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS SolvedProblems (
        username       TEXT        NOT NULL    REFERENCES Users(username),
        problem        TEXT        NOT NULL,

        submission_id  TEXT,
        accepted       BOOLEAN     NOT NULL,

        UNIQUE (username, problem)
    )";

pub const FRIENDS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Friends (
        username       TEXT        NOT NULL    REFERENCES Users(username),
        friend         TEXT        NOT NULL    REFERENCES Users(username),

        UNIQUE (username, friend)
    )";
