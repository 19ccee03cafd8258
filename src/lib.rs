pub mod config;
pub mod live;
pub mod realtime;
pub mod routes;
pub mod store;
pub mod types;
pub mod views;
