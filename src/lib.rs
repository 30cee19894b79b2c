// Library interface for poptrend
// This allows integration tests to access internal modules

pub mod errors;
pub mod population;
pub mod ui;

// Re-export commonly used types
pub use errors::PoptrendError;
pub use population::client::{IpcApiClient, MockPopulationSource, PopulationSource};
pub use population::{FetchOutcome, FetchRequest, PopulationRecord};
