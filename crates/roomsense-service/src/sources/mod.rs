//! Clients for the external data sources.
//!
//! The live source is a Home-Assistant-style states endpoint; the
//! historical source is an InfluxDB 1.x query endpoint. Both are thin
//! plumbing: they fetch, decode into the store's ingest types, and report
//! failures for the refresher to handle.

pub mod history;
pub mod live;

pub use history::HistoryClient;
pub use live::LiveClient;
