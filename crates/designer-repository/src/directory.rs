//! Directories as seen by repository callers

/// A folder in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directory {
    unique_id: String,
    name: String,
    location: String,
}

impl Directory {
    pub fn new(
        unique_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            name: name.into(),
            location: location.into(),
        }
    }

    /// Encoded URI of the directory.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent path relative to the repository root.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The directory's own root-relative path, usable as a location.
    pub fn path(&self) -> String {
        if self.location.ends_with('/') {
            format!("{}{}", self.location, self.name)
        } else {
            format!("{}/{}", self.location, self.name)
        }
    }
}
