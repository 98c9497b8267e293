mod calculator;
mod error;
mod vector;

pub use calculator::{observed_frequency, DopplerQuery};
pub use error::DopplerError;
pub use vector::Vector3;
