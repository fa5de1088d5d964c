//! Content kind lookup by file name

use crate::asset::{AssetBuilder, ContentKind};
use std::collections::HashMap;

/// Hands out [`AssetBuilder`]s whose content kind is chosen from the file
/// name.
///
/// Explicit registrations win, then the guessed MIME type; anything
/// unrecognized is text.
#[derive(Debug, Clone, Default)]
pub struct AssetBuilderFactory {
    overrides: HashMap<String, ContentKind>,
}

impl AssetBuilderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a content kind for an extension (case-insensitive, without
    /// the leading dot).
    pub fn register(&mut self, extension: &str, kind: ContentKind) -> &mut Self {
        self.overrides
            .insert(extension.trim_start_matches('.').to_lowercase(), kind);
        self
    }

    /// Builder for a file of the given name, with name and type preset.
    pub fn builder(&self, file_name: &str) -> AssetBuilder {
        AssetBuilder::new(self.kind_for(file_name)).file_name(file_name)
    }

    pub fn kind_for(&self, file_name: &str) -> ContentKind {
        let extension = match file_name.rfind('.') {
            Some(idx) if idx > 0 => file_name[idx + 1..].to_lowercase(),
            _ => return ContentKind::Text,
        };
        if let Some(kind) = self.overrides.get(&extension) {
            return *kind;
        }
        match mime_guess::from_ext(&extension).first() {
            Some(mime) if is_binary(&mime) => ContentKind::Bytes,
            _ => ContentKind::Text,
        }
    }
}

fn is_binary(mime: &mime_guess::Mime) -> bool {
    let top = mime.type_().as_str();
    let sub = mime.subtype().as_str();
    if mime.suffix().is_some_and(|suffix| suffix.as_str() == "xml") {
        return false;
    }
    match top {
        "image" | "audio" | "video" | "font" => true,
        "application" => matches!(
            sub,
            "pdf" | "zip" | "gzip" | "x-gzip" | "octet-stream" | "java-archive" | "x-tar"
        ),
        _ => false,
    }
}
