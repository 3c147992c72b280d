//! Use cases: the application's entry points.

pub mod consensus_engine;
pub mod review_session;

pub use consensus_engine::{ConsensusEngine, EngineError};
pub use review_session::{ReviewSession, SessionRecord, DEFAULT_HISTORY_LIMIT};
