pub mod client;
pub mod codes;

pub use client::{CurrentConditions, OpenMeteoClient};
pub use codes::condition_for;
