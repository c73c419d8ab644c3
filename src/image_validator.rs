// src/image_validator.rs
//! Loads and checks the optional image attached to a new job posting.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

use crate::types::JobImage;

const MAX_SIZE: u64 = 10 * 1024 * 1024;
const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF_SIGNATURE: &[u8] = b"GIF8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorType {
    FileNotFound,
    UnreadableFile,
    EmptyFile,
    TooLarge,
    WrongFormat,
    CorruptedFile,
}

impl ImageErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound => "IMAGE_NOT_FOUND",
            Self::UnreadableFile => "IMAGE_UNREADABLE",
            Self::EmptyFile => "IMAGE_EMPTY",
            Self::TooLarge => "IMAGE_TOO_LARGE",
            Self::WrongFormat => "IMAGE_WRONG_FORMAT",
            Self::CorruptedFile => "IMAGE_CORRUPTED",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} ({})", path.display())]
pub struct ImageValidationError {
    pub path: PathBuf,
    pub error_type: ImageErrorType,
    pub message: String,
}

impl ImageValidationError {
    fn new(path: &Path, error_type: ImageErrorType, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            error_type,
            message: message.into(),
        }
    }
}

/// Content type for an image file name, by extension.
pub fn image_content_type(file_name: &str) -> Option<&'static str> {
    let lower_name = file_name.to_lowercase();
    if lower_name.ends_with(".png") {
        Some("image/png")
    } else if lower_name.ends_with(".jpg") || lower_name.ends_with(".jpeg") {
        Some("image/jpeg")
    } else if lower_name.ends_with(".gif") {
        Some("image/gif")
    } else if lower_name.ends_with(".webp") {
        Some("image/webp")
    } else {
        None
    }
}

fn check_signature(
    bytes: &[u8],
    content_type: &str,
    path: &Path,
) -> Result<(), ImageValidationError> {
    let valid = match content_type {
        "image/png" => bytes.starts_with(PNG_SIGNATURE),
        "image/jpeg" => bytes.starts_with(JPEG_SIGNATURE),
        "image/gif" => bytes.starts_with(GIF_SIGNATURE),
        "image/webp" => bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        _ => false,
    };
    if valid {
        return Ok(());
    }

    if content_type == "image/png" && bytes.starts_with(JPEG_SIGNATURE) {
        return Err(ImageValidationError::new(
            path,
            ImageErrorType::WrongFormat,
            "File is JPEG but has .png extension",
        ));
    }
    if content_type == "image/jpeg" && bytes.starts_with(PNG_SIGNATURE) {
        return Err(ImageValidationError::new(
            path,
            ImageErrorType::WrongFormat,
            "File is PNG but has .jpg/.jpeg extension",
        ));
    }
    Err(ImageValidationError::new(
        path,
        ImageErrorType::CorruptedFile,
        format!("Invalid {} file - corrupted or wrong format", content_type),
    ))
}

/// Read `path` into a `JobImage`, checking size, extension and file signature.
pub async fn load_job_image(path: &Path) -> Result<JobImage, ImageValidationError> {
    let metadata = fs::metadata(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ImageValidationError::new(path, ImageErrorType::FileNotFound, "Image file not found")
        } else {
            ImageValidationError::new(
                path,
                ImageErrorType::UnreadableFile,
                format!("Cannot read image file metadata: {}", e),
            )
        }
    })?;

    if metadata.len() == 0 {
        return Err(ImageValidationError::new(
            path,
            ImageErrorType::EmptyFile,
            "Image file is empty",
        ));
    }
    if metadata.len() > MAX_SIZE {
        return Err(ImageValidationError::new(
            path,
            ImageErrorType::TooLarge,
            format!(
                "Image file too large: {:.1}MB (max 10MB)",
                metadata.len() as f64 / 1024.0 / 1024.0
            ),
        ));
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();
    let content_type = image_content_type(&file_name).ok_or_else(|| {
        ImageValidationError::new(
            path,
            ImageErrorType::WrongFormat,
            "Unsupported image format - use PNG, JPEG, GIF or WebP",
        )
    })?;

    let bytes = fs::read(path).await.map_err(|e| {
        ImageValidationError::new(
            path,
            ImageErrorType::UnreadableFile,
            format!("Cannot read image file: {}", e),
        )
    })?;

    if let Err(validation_error) = check_signature(&bytes, content_type, path) {
        error!("Image validation failed: {}", validation_error.message);
        return Err(validation_error);
    }

    info!("Job image ready: {} ({} bytes)", file_name, bytes.len());
    Ok(JobImage {
        file_name,
        content_type,
        bytes,
    })
}
