//! Assets and the builders that create them

use serde::{Deserialize, Serialize};

/// How an asset's content is stored and transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Raw bytes, read and written verbatim
    Bytes,
    /// UTF-8 text, read line by line
    Text,
}

/// Content carried by an [`Asset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContent {
    Bytes(Vec<u8>),
    Text(String),
}

impl AssetContent {
    /// The bytes written to storage for this content.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Text view of the content. Binary content is decoded lossily.
    pub fn to_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
            Self::Text(text) => std::borrow::Cow::Borrowed(text),
        }
    }
}

impl From<Vec<u8>> for AssetContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<String> for AssetContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AssetContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A file-backed unit of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    unique_id: Option<String>,
    name: String,
    asset_type: String,
    location: String,
    kind: ContentKind,
    content: Option<AssetContent>,
    version: String,
    owner: String,
    description: String,
    creation_date: String,
    last_modification_date: String,
}

impl Asset {
    /// Identifier assigned by the repository, `None` for assets not yet
    /// stored.
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// File name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File extension, empty when the file has none.
    pub fn asset_type(&self) -> &str {
        &self.asset_type
    }

    /// File name including extension.
    pub fn full_name(&self) -> String {
        if self.asset_type.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.asset_type)
        }
    }

    /// Parent directory relative to the repository root, `/`-prefixed.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn accepts_bytes(&self) -> bool {
        self.kind == ContentKind::Bytes
    }

    /// Loaded content, if any.
    pub fn content(&self) -> Option<&AssetContent> {
        self.content.as_ref()
    }

    /// The bytes to store for this asset according to its content kind.
    pub fn content_bytes(&self) -> &[u8] {
        self.content.as_ref().map(AssetContent::as_bytes).unwrap_or(&[])
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn creation_date(&self) -> &str {
        &self.creation_date
    }

    pub fn last_modification_date(&self) -> &str {
        &self.last_modification_date
    }

    /// Replace the content, keeping identity and metadata.
    pub fn with_content(mut self, content: impl Into<AssetContent>) -> Self {
        self.content = Some(coerce(self.kind, content.into()));
        self
    }
}

fn coerce(kind: ContentKind, content: AssetContent) -> AssetContent {
    match (kind, content) {
        (ContentKind::Text, AssetContent::Bytes(bytes)) => match String::from_utf8(bytes) {
            Ok(text) => AssetContent::Text(text),
            Err(e) => AssetContent::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
        (ContentKind::Bytes, AssetContent::Text(text)) => AssetContent::Bytes(text.into_bytes()),
        (_, content) => content,
    }
}

/// Step-by-step construction of an [`Asset`] with a fixed content kind.
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    asset: Asset,
}

impl AssetBuilder {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            asset: Asset {
                unique_id: None,
                name: String::new(),
                asset_type: String::new(),
                location: "/".to_string(),
                kind,
                content: None,
                version: String::new(),
                owner: String::new(),
                description: String::new(),
                creation_date: String::new(),
                last_modification_date: String::new(),
            },
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.asset.kind
    }

    /// Set name and type from a full file name such as `order.bpmn`.
    pub fn file_name(mut self, file_name: &str) -> Self {
        match file_name.rfind('.') {
            Some(idx) if idx > 0 => {
                self.asset.name = file_name[..idx].to_string();
                self.asset.asset_type = file_name[idx + 1..].to_string();
            }
            _ => {
                self.asset.name = file_name.to_string();
                self.asset.asset_type = String::new();
            }
        }
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.asset.name = name.into();
        self
    }

    pub fn asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset.asset_type = asset_type.into();
        self
    }

    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.asset.unique_id = Some(unique_id.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        self.asset.location = if location.starts_with('/') {
            location
        } else {
            format!("/{}", location)
        };
        self
    }

    /// Set content, converted to this builder's content kind.
    pub fn content(mut self, content: impl Into<AssetContent>) -> Self {
        self.asset.content = Some(coerce(self.asset.kind, content.into()));
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.asset.version = version.into();
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.asset.owner = owner.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.asset.description = description.into();
        self
    }

    pub fn creation_date(mut self, date: impl Into<String>) -> Self {
        self.asset.creation_date = date.into();
        self
    }

    pub fn last_modification_date(mut self, date: impl Into<String>) -> Self {
        self.asset.last_modification_date = date.into();
        self
    }

    pub fn build(self) -> Asset {
        self.asset
    }
}
