// Adapters - External system implementations

pub mod analysis_fixed;
pub mod host_memory;
pub mod probe_ffprobe;
pub mod probe_static;

// Re-export adapters
pub use analysis_fixed::FixedOnsetAdapter;
pub use host_memory::MemoryHostAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use probe_static::StaticProbeAdapter;
