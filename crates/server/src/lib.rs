pub mod config;
pub mod error;
pub mod images;
pub mod player;
pub mod routes;
pub mod state;
