//! Scheduling and playout benchmarks.

mod plan;
mod voice;

pub use plan::bench_plan;
pub use voice::bench_voice;
