// Core batch engine: templates, command generation, process running, orchestration.
mod batch;
mod command;
mod runner;
mod status;
pub mod template;

pub use batch::*;
pub use command::*;
pub use runner::*;
pub use status::*;
pub use template::{render, PlaceholderContext};

pub(crate) use runner::hidden_command;
