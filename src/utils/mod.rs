//! Terminal output and logging helpers for the binary

mod logging;
mod progress;
mod styling;

pub use logging::{init_logging, LOG_ENV};
pub use progress::{create_spinner, finish_with_success};
pub use styling::*;
