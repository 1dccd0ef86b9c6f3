// Command generation: output-path resolution, placeholder contexts, FFmpeg flag injection.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

use super::template::{self, PlaceholderContext};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Command template is empty.")]
    EmptyTemplate,
    #[error("No input files were provided.")]
    NoInput,
    #[error("Failed to prepare command: {0}")]
    Io(#[from] io::Error),
}

/// Resolves the user-entered output directory against the input file's
/// directory: `"."` and `"./"` mean the input directory itself, a `"./"`
/// prefix nests under it, anything else is taken as given.
pub fn derive_output_dir(output_spec: &str, input_dir: &Path) -> PathBuf {
    let trimmed = output_spec.trim();
    if trimmed == "." || trimmed == "./" {
        return input_dir.to_path_buf();
    }
    if let Some(relative) = trimmed.strip_prefix("./") {
        return input_dir.join(relative);
    }
    PathBuf::from(trimmed)
}

/// Same resolution as [`derive_output_dir`], plus creating the directory.
/// `create_dir_all` makes repeat calls harmless.
pub fn ensure_output_dir(output_spec: &str, input_dir: &Path) -> io::Result<PathBuf> {
    let output_dir = derive_output_dir(output_spec, input_dir);
    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

/// Injects `-y` and `-loglevel warning` right after the program name of an
/// `ffmpeg` command line unless either flag is already present. Commands for
/// other programs come back untouched. Idempotent.
pub fn finalize_command(command: &str) -> String {
    if !command.trim_start().starts_with("ffmpeg ") {
        return command.to_string();
    }
    let mut finalized = command.to_string();
    if !finalized.contains("-y ") {
        finalized = finalized.replacen("ffmpeg ", "ffmpeg -y ", 1);
    }
    if !finalized.contains("-loglevel ") {
        finalized = finalized.replacen("ffmpeg ", "ffmpeg -loglevel warning ", 1);
    }
    finalized
}

/// Builds the per-input-file token set shared by every feature: the input's
/// folder, stem and extension (without the dot) plus the resolved output
/// folder.
pub fn input_context(input: &Path, output_dir: &Path) -> PlaceholderContext {
    let folder = input
        .parent()
        .map(|parent| parent.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|extension| extension.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut context = PlaceholderContext::new();
    context.insert(template::PLACEHOLDER_INPUTFILE_FOLDER, folder);
    context.insert(template::PLACEHOLDER_INPUTFILE_NAME, name);
    context.insert(template::PLACEHOLDER_INPUTFILE_EXT, extension);
    context.insert(
        template::PLACEHOLDER_OUTPUT_FOLDER,
        output_dir.to_string_lossy(),
    );
    context
}

/// Renders a caller-assembled context into a finalized command line.
pub fn generate_with_context(
    template_text: &str,
    context: &PlaceholderContext,
) -> Result<String, GenerationError> {
    let trimmed = template_text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyTemplate);
    }
    Ok(finalize_command(&template::render(trimmed, context)))
}

/// One command for one input file: resolve and create the output directory,
/// fill the general tokens, render, finalize.
pub fn generate_single(
    template_text: &str,
    input: &Path,
    output_spec: &str,
) -> Result<String, GenerationError> {
    let trimmed = template_text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyTemplate);
    }
    let input_dir = input.parent().unwrap_or_else(|| Path::new(""));
    let output_dir = ensure_output_dir(output_spec, input_dir)?;
    let context = input_context(input, &output_dir);
    Ok(finalize_command(&template::render(trimmed, &context)))
}

/// A rendered concat command plus the list file it references. The list file
/// is deleted when `list_file` drops, so the caller must keep this struct
/// alive until the spawned process has exited.
#[derive(Debug)]
pub struct ConcatCommand {
    pub command: String,
    pub list_file: TempPath,
}

/// Writes the FFmpeg concat-demuxer list file: one `file '<path>'` line per
/// input, in order, with backslashes normalized to forward slashes.
pub fn write_concat_list(inputs: &[PathBuf]) -> io::Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("concat_list-")
        .suffix(".txt")
        .tempfile()?;
    for input in inputs {
        writeln!(file, "file '{}'", input.to_string_lossy().replace('\\', "/"))?;
    }
    file.flush()?;
    Ok(file.into_temp_path())
}

/// One command joining every input through the concat demuxer. The output
/// directory is resolved against the first input's directory.
pub fn generate_concat(
    template_text: &str,
    inputs: &[PathBuf],
    output_spec: &str,
) -> Result<ConcatCommand, GenerationError> {
    let trimmed = template_text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyTemplate);
    }
    let first = inputs.first().ok_or(GenerationError::NoInput)?;
    let input_dir = first.parent().unwrap_or_else(|| Path::new(""));
    let output_dir = ensure_output_dir(output_spec, input_dir)?;
    let list_file = write_concat_list(inputs)?;

    let mut context = PlaceholderContext::new();
    context.insert(
        template::PLACEHOLDER_OUTPUT_FOLDER,
        output_dir.to_string_lossy(),
    );
    context.insert(
        template::PLACEHOLDER_CONCATFILE_PATH,
        list_file.to_string_lossy().replace('\\', "/"),
    );

    Ok(ConcatCommand {
        command: finalize_command(&template::render(trimmed, &context)),
        list_file,
    })
}
