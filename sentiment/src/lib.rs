pub mod aggregator;
pub mod clean;
pub mod language;
pub mod scorer;
pub mod summary;

pub use aggregator::*;
pub use clean::*;
pub use language::*;
pub use scorer::*;
pub use summary::*;
