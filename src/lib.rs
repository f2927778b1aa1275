pub mod aggregator;
pub mod api;
pub mod backend;
pub mod config;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod state;
