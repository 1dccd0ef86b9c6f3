// Media inspection: ffprobe metadata and display formatting.
mod format;
mod probe;

pub use format::*;
pub use probe::*;
