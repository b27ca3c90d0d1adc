//! Handles returned to callers.
//!
//! A handle always has something renderable: either a link to a file in the
//! derivative tree, or a terminal state whose link is `#` and whose message
//! explains what went wrong.

use crate::identifier::ImageName;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Query parameter carrying the transform in friendly links.
pub const FRIENDLY_QUERY_PARAM: &str = "_image_storage";

/// Link used by terminal handles.
pub const TERMINAL_LINK: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleStatus {
    Ready,
    /// The source file does not exist.
    NotFound,
    /// The source exists but is not a decodable image.
    UnknownFormat,
}

impl HandleStatus {
    /// Message shown instead of an image, `None` for ready handles.
    pub fn message(self) -> Option<&'static str> {
        match self {
            HandleStatus::Ready => None,
            HandleStatus::NotFound => Some("Can not find image"),
            HandleStatus::UnknownFormat => Some("Unknown type of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageHandle {
    identifier: String,
    status: HandleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_name: Option<String>,
}

impl ImageHandle {
    /// Handle for a file at `data_path/identifier`.
    pub fn ready(
        identifier: impl Into<String>,
        data_path: &Path,
        data_dir: &str,
        friendly_url: bool,
    ) -> Self {
        let identifier = identifier.into();
        let link = build_link(&identifier, data_dir, friendly_url);
        Self {
            path: Some(data_path.join(&identifier)),
            identifier,
            status: HandleStatus::Ready,
            link,
            message: None,
            checksum: None,
            original_name: None,
        }
    }

    pub fn not_found() -> Self {
        Self::terminal(HandleStatus::NotFound)
    }

    pub fn unknown_format() -> Self {
        Self::terminal(HandleStatus::UnknownFormat)
    }

    fn terminal(status: HandleStatus) -> Self {
        Self {
            identifier: String::new(),
            status,
            path: None,
            link: TERMINAL_LINK.to_string(),
            message: status.message(),
            checksum: None,
            original_name: None,
        }
    }

    /// Attach the checksum and sanitized name of a freshly saved original.
    pub fn with_origin(mut self, checksum: impl Into<String>, name: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self.original_name = Some(name.into());
        self
    }

    /// Identifier of the referenced file; empty for terminal handles.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn status(&self) -> HandleStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == HandleStatus::Ready
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Location of the file in the derivative tree.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Public link, relative to the site root.
    pub fn create_link(&self) -> &str {
        &self.link
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Decoded identifier, `None` for terminal handles.
    pub fn image_name(&self) -> Option<ImageName> {
        if !self.is_ready() {
            return None;
        }
        ImageName::decode(&self.identifier).ok()
    }
}

/// `data_dir/identifier`, or for friendly derivatives
/// `data_dir/namespace/prefix/name.ext?_image_storage=<transform>`.
fn build_link(identifier: &str, data_dir: &str, friendly_url: bool) -> String {
    let plain = || format!("{data_dir}/{identifier}");
    if !friendly_url {
        return plain();
    }
    match ImageName::decode(identifier) {
        Ok(name) => match &name.transform {
            Some(transform) => format!(
                "{data_dir}/{}?{FRIENDLY_QUERY_PARAM}={}",
                name.original_identifier(),
                transform.suffix().replace('+', "%2B")
            ),
            None => plain(),
        },
        Err(_) => plain(),
    }
}
