// Job orchestration core for a batch FFmpeg command runner: templated
// command generation, per-job process supervision, batch dispatch with
// cancellation, and ffprobe-backed file metadata.
pub mod engine;
pub mod features;
pub mod media;
pub mod presets;

pub use engine::{
    derive_output_dir, ensure_output_dir, finalize_command, generate_concat, generate_single,
    generate_with_context, input_context, render, BatchError, BatchRunner, ConcatCommand,
    EventSink, ExitOutcome, GenerationError, Job, PlaceholderContext, ProcessRunner, RunnerHandle,
    SpawnError, Status,
};
pub use features::{
    BatchTemplate, ConcatJoin, CropRegion, JobPreparer, PreparedJobs, Segment, SegmentCut,
    ThumbnailSet, VideoCrop,
};
pub use media::{LoadedFile, MediaInfo, ProbeError, Prober};
pub use presets::{load_presets, save_presets, Preset, PresetError};
