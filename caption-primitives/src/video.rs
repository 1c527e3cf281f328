//! Video selection handling.
//!
//! Only the file name is ever used: the video bytes are never read or sent.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use crate::{Error, Result};

const VIDEO_EXTENSIONS: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("ogv", "video/ogg"),
];

/// A video picked by the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VideoSelection {
    name: String,
    media_type: &'static str,
}

impl VideoSelection {
    /// Accepts a file name when its extension maps to a `video/*` media type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVideo`] for empty names or non-video files.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let media_type = Path::new(&name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(media_type_for)
            .ok_or_else(|| Error::UnsupportedVideo { name: name.clone() })?;

        Ok(Self { name, media_type })
    }

    /// Accepts the file at `path`, keeping only its file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVideo`] when the path has no file name or is
    /// not a video.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::UnsupportedVideo {
                name: path.display().to_string(),
            })?;
        Self::new(name)
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the media type inferred from the extension.
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        self.media_type
    }
}

impl Display for VideoSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn media_type_for(extension: &str) -> Option<&'static str> {
    VIDEO_EXTENSIONS
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, media_type)| *media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_video_extensions() {
        let video = VideoSelection::new("dance.MOV").expect("mov is a video");
        assert_eq!(video.name(), "dance.MOV");
        assert_eq!(video.media_type(), "video/quicktime");
    }

    #[test]
    fn rejects_non_video_files() {
        let err = VideoSelection::new("notes.txt").expect_err("text is not a video");
        assert!(matches!(err, Error::UnsupportedVideo { .. }));

        assert!(VideoSelection::new("").is_err());
        assert!(VideoSelection::new("clip").is_err());
    }

    #[test]
    fn from_path_keeps_only_file_name() {
        let video = VideoSelection::from_path("/tmp/uploads/cat.mp4").unwrap();
        assert_eq!(video.name(), "cat.mp4");
    }
}
