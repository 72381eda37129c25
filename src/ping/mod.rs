pub mod parser;
pub mod result;
pub mod runner;

pub mod prelude {
    pub use super::parser::parse_statistics;
    pub use super::result::{ExecutionFailure, Measurement, ParseFailure, ProbeOutcome, ProbeResult};
    pub use super::runner::{ProbeRunner, SystemPing, probe_host};
}
