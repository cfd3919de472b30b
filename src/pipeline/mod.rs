//! Pipeline components: cancellation, supervision, walk, digest workers, collection, orchestration.

pub mod cancel;
pub mod collect;
pub mod context;
pub mod orchestrator;
pub mod supervisor;
pub mod walk;
pub mod workers;

pub use cancel::CancelToken;
pub use collect::collect_records;
pub use context::{PipelineChannels, RENDEZVOUS, create_pipeline_channels};
pub use orchestrator::Checksummer;
pub use supervisor::{Supervisor, Task};
pub use walk::{WalkOutcome, run_walk_loop, run_walker, to_outcome_walkdir};
pub use workers::digest_worker_loop;
