//! Image codec calls and native file dialogs.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use rfd::FileDialog;

use crate::error::EditError;

/// Raster extensions offered in the open dialog.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "webp", "tga", "ico",
];

/// Ask the user for an image to open. `None` means the dialog was
/// cancelled, which callers surface as the no-file-selected condition.
pub fn pick_open_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Image files", IMAGE_EXTENSIONS)
        .pick_file()
}

/// Ask the user for a save destination.
pub fn pick_save_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PNG image", &["png"])
        .add_filter("JPEG image", &["jpg", "jpeg"])
        .add_filter("Image files", IMAGE_EXTENSIONS)
        .set_file_name("untitled.png")
        .save_file()
}

/// Decode any supported raster file into RGBA8.
pub fn decode_image(path: &Path) -> Result<RgbaImage, EditError> {
    let image = image::open(path)
        .map_err(|e| EditError::Load(format!("{}: {}", path.display(), e)))?;
    Ok(image.into_rgba8())
}

/// Encode the image to `path`; the format follows the file extension.
/// JPEG cannot carry alpha, so it gets an RGB projection.
pub fn encode_image(image: &RgbaImage, path: &Path) -> Result<(), EditError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let result = match ext.as_str() {
        "jpg" | "jpeg" => DynamicImage::ImageRgba8(image.clone()).to_rgb8().save(path),
        _ => image.save(path),
    };
    result.map_err(|e| EditError::Save(format!("{}: {}", path.display(), e)))
}
