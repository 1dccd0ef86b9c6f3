// Command template tokens and literal placeholder substitution.

pub const PLACEHOLDER_INPUTFILE_FOLDER: &str = "{inputfile_folder}";
pub const PLACEHOLDER_INPUTFILE_NAME: &str = "{inputfile_name}";
pub const PLACEHOLDER_INPUTFILE_EXT: &str = "{inputfile_ext}";
pub const PLACEHOLDER_OUTPUT_FOLDER: &str = "{output_folder}";
pub const PLACEHOLDER_CONCATFILE_PATH: &str = "{concatfile_path}";
pub const PLACEHOLDER_START_TIME: &str = "{start_time}";
pub const PLACEHOLDER_END_TIME: &str = "{end_time}";
pub const PLACEHOLDER_SAFE_START_TIME: &str = "{safe_start_time}";
pub const PLACEHOLDER_SAFE_END_TIME: &str = "{safe_end_time}";
pub const PLACEHOLDER_TIMESTAMP: &str = "{timestamp}";
pub const PLACEHOLDER_THUMB_PATH: &str = "{thumb_path}";
pub const PLACEHOLDER_CROP_WIDTH: &str = "{crop_width}";
pub const PLACEHOLDER_CROP_HEIGHT: &str = "{crop_height}";
pub const PLACEHOLDER_CROP_X: &str = "{crop_x}";
pub const PLACEHOLDER_CROP_Y: &str = "{crop_y}";

/// Tokens every template can use, regardless of which dialog produced it.
pub const GENERAL_PLACEHOLDERS: [&str; 4] = [
    PLACEHOLDER_INPUTFILE_FOLDER,
    PLACEHOLDER_INPUTFILE_NAME,
    PLACEHOLDER_INPUTFILE_EXT,
    PLACEHOLDER_OUTPUT_FOLDER,
];

pub const CUTTER_PLACEHOLDERS: [&str; 8] = [
    PLACEHOLDER_INPUTFILE_FOLDER,
    PLACEHOLDER_INPUTFILE_NAME,
    PLACEHOLDER_INPUTFILE_EXT,
    PLACEHOLDER_OUTPUT_FOLDER,
    PLACEHOLDER_START_TIME,
    PLACEHOLDER_END_TIME,
    PLACEHOLDER_SAFE_START_TIME,
    PLACEHOLDER_SAFE_END_TIME,
];

pub const JOINER_PLACEHOLDERS: [&str; 2] =
    [PLACEHOLDER_OUTPUT_FOLDER, PLACEHOLDER_CONCATFILE_PATH];

pub const CROPPER_PLACEHOLDERS: [&str; 8] = [
    PLACEHOLDER_INPUTFILE_FOLDER,
    PLACEHOLDER_INPUTFILE_NAME,
    PLACEHOLDER_INPUTFILE_EXT,
    PLACEHOLDER_OUTPUT_FOLDER,
    PLACEHOLDER_CROP_WIDTH,
    PLACEHOLDER_CROP_HEIGHT,
    PLACEHOLDER_CROP_X,
    PLACEHOLDER_CROP_Y,
];

pub const THUMBNAIL_PLACEHOLDERS: [&str; 6] = [
    PLACEHOLDER_INPUTFILE_FOLDER,
    PLACEHOLDER_INPUTFILE_NAME,
    PLACEHOLDER_INPUTFILE_EXT,
    PLACEHOLDER_OUTPUT_FOLDER,
    PLACEHOLDER_TIMESTAMP,
    PLACEHOLDER_THUMB_PATH,
];

/// Token-to-value assignments for one render pass. Insertion order is the
/// substitution order, so renders are deterministic for a fixed context.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderContext {
    entries: Vec<(&'static str, String)>,
}

impl PlaceholderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &'static str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == token) {
            entry.1 = value;
        } else {
            self.entries.push((token, value));
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == token)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

/// Replaces every occurrence of each context token in `template`, one pass
/// per token in insertion order. Tokens the context does not know stay in
/// the output verbatim; there is no recursive expansion.
pub fn render(template: &str, context: &PlaceholderContext) -> String {
    let mut rendered = template.to_string();
    for (token, value) in &context.entries {
        rendered = rendered.replace(token, value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_every_occurrence() {
        let mut context = PlaceholderContext::new();
        context.insert(PLACEHOLDER_INPUTFILE_NAME, "clip");
        context.insert(PLACEHOLDER_INPUTFILE_EXT, "mp4");
        let rendered = render(
            "ffmpeg -i \"{inputfile_name}.{inputfile_ext}\" \"{inputfile_name}_out.{inputfile_ext}\"",
            &context,
        );
        assert_eq!(rendered, "ffmpeg -i \"clip.mp4\" \"clip_out.mp4\"");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let context = PlaceholderContext::new();
        let rendered = render("convert {mystery_token} now", &context);
        assert_eq!(rendered, "convert {mystery_token} now");
    }

    #[test]
    fn substitution_order_follows_insertion() {
        let mut context = PlaceholderContext::new();
        context.insert(PLACEHOLDER_INPUTFILE_NAME, "{inputfile_ext}");
        context.insert(PLACEHOLDER_INPUTFILE_EXT, "mp4");
        // {inputfile_name} resolves first and its value happens to spell a
        // later token, so that token gets replaced in a later pass.
        assert_eq!(render("{inputfile_name}", &context), "mp4");
        // The reverse order leaves the injected spelling alone.
        let mut reversed = PlaceholderContext::new();
        reversed.insert(PLACEHOLDER_INPUTFILE_EXT, "mp4");
        reversed.insert(PLACEHOLDER_INPUTFILE_NAME, "{inputfile_ext}");
        assert_eq!(render("{inputfile_name}", &reversed), "{inputfile_ext}");
    }

    #[test]
    fn insert_overwrites_existing_token() {
        let mut context = PlaceholderContext::new();
        context.insert(PLACEHOLDER_OUTPUT_FOLDER, "/a");
        context.insert(PLACEHOLDER_OUTPUT_FOLDER, "/b");
        assert_eq!(context.get(PLACEHOLDER_OUTPUT_FOLDER), Some("/b"));
        assert_eq!(render("{output_folder}", &context), "/b");
    }

    #[test]
    fn empty_template_renders_empty() {
        let mut context = PlaceholderContext::new();
        context.insert(PLACEHOLDER_OUTPUT_FOLDER, "/out");
        assert_eq!(render("", &context), "");
    }
}
