pub mod error;
pub mod types;

pub use types::{MediaType, Movie, Page, Show, Title};
