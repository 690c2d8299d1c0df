pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod persist;
pub mod query;
pub mod record;
pub mod roster;
pub mod stats;
pub mod store;

pub use config::{DataFiles, RosterConfig};
pub use error::{Result, RosterError};
pub use query::{Query, Row};
pub use record::{FlatRecord, Student, StudentPatch, Teacher};
pub use roster::Roster;
pub use stats::Statistics;
