//! Image attachments.
//!
//! Picked files are copied into the attachments directory under a fresh
//! generated name; the bug only stores the copied path.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{BugbookError, Result};
use crate::util::generate_id;

/// File extensions accepted as image attachments (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "heic", "tif", "tiff",
];

/// True if the path has a known image extension (case-insensitive).
#[must_use]
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Copy `source` into `attachments_dir` and return the stored path.
///
/// The copy is named `img-<hash>.<ext>`, keeping the original extension.
///
/// # Errors
///
/// Returns `Validation` if `source` is not an image file, or `Io` if the
/// directory cannot be created or the copy fails.
pub fn copy_attachment(attachments_dir: &Path, source: &Path) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(BugbookError::validation(
            "file",
            format!("{} is not a file", source.display()),
        ));
    }
    if !is_image_path(source) {
        return Err(BugbookError::validation(
            "file",
            format!(
                "{} is not an image (expected one of: {})",
                source.display(),
                IMAGE_EXTENSIONS.join(", ")
            ),
        ));
    }

    fs::create_dir_all(attachments_dir)?;

    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let existing = fs::read_dir(attachments_dir)?.count();
    let name = generate_id("img", &stem, Utc::now(), existing, |id| {
        attachments_dir.join(format!("{id}.{extension}")).exists()
    });

    let dest = attachments_dir.join(format!("{name}.{extension}"));
    fs::copy(source, &dest)?;
    tracing::debug!("Copied {} to {}", source.display(), dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("shot.PNG")));
        assert!(is_image_path(Path::new("/a/b/photo.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_copy_attachment_keeps_extension_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("screen.png");
        fs::write(&source, b"\x89PNG fake").unwrap();
        let attachments = dir.path().join("data/attachments");

        let first = copy_attachment(&attachments, &source).unwrap();
        let second = copy_attachment(&attachments, &source).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(&attachments));
        assert_eq!(first.extension().unwrap(), "png");
        assert_eq!(fs::read(&first).unwrap(), b"\x89PNG fake");
        assert!(source.exists());
    }

    #[test]
    fn test_copy_attachment_rejects_non_images_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "hi").unwrap();

        let err = copy_attachment(dir.path(), &text).unwrap_err();
        assert!(matches!(err, BugbookError::Validation { .. }));

        let err = copy_attachment(dir.path(), &dir.path().join("gone.png")).unwrap_err();
        assert!(matches!(err, BugbookError::Validation { .. }));
    }
}
