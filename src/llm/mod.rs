pub mod client;
pub mod pacing;
pub mod prompts;
pub mod validation;

pub use client::*;
pub use pacing::*;
pub use prompts::*;
pub use validation::*;
