//! MIME type helpers for image assets.

use std::borrow::Cow;
use std::path::Path;

/// Content type served for an asset, guessed from its extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use notecraft::assets::guess_content_type;
///
/// assert_eq!(guess_content_type(Path::new("2025/01/01/a.png")), "image/png");
/// assert_eq!(guess_content_type(Path::new("notes.txt")), "text/plain; charset=utf-8");
/// assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
/// ```
pub fn guess_content_type(path: &Path) -> Cow<'static, str> {
    mime_guess::from_path(path)
        .first()
        .map_or(Cow::Borrowed("application/octet-stream"), |mime| {
            let mime_str = mime.essence_str();
            match mime_str {
                "image/png" => Cow::Borrowed("image/png"),
                "image/jpeg" => Cow::Borrowed("image/jpeg"),
                "image/webp" => Cow::Borrowed("image/webp"),
                "image/gif" => Cow::Borrowed("image/gif"),
                _ => {
                    if mime_str.starts_with("text/") || mime_str.contains("json") {
                        Cow::Owned(format!("{mime_str}; charset=utf-8"))
                    } else {
                        Cow::Owned(mime_str.to_string())
                    }
                },
            }
        })
}

/// File extension for an image MIME type returned by the model.
///
/// Only png, jpg and webp are kept; anything else is stored as png.
#[must_use]
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// MIME type sent to the model for a source image, from its extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("IMAGE/WEBP"), "webp");
        assert_eq!(extension_for_mime("image/webp; q=1"), "webp");
        assert_eq!(extension_for_mime("image/gif"), "png");
        assert_eq!(extension_for_mime(""), "png");
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a/b.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("b.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("b.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("noext")), "image/png");
    }

    #[test]
    fn test_guess_content_type_images() {
        assert_eq!(guess_content_type(Path::new("x.jpg")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("x.webp")), "image/webp");
    }
}
