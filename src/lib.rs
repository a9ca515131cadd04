pub mod checkpoint;
pub mod error;
pub mod friends;
pub mod ingest;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod store;
