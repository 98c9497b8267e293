mod catalog;
mod error;
mod observer;
mod propagation;
mod provider;

pub use catalog::{Catalog, ElementSource, TleEntry};
pub use error::PredictError;
pub use observer::Observer;
pub use propagation::relative_state;
pub use provider::{CatalogProvider, CatalogSource};

#[cfg(test)]
pub(crate) use catalog::tests::STATIONS;
