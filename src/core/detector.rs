//! Face-point detection contract
//!
//! Real detection lives in a vision backend; this module only fixes the
//! seam (`FaceDetector`) and checks that a payload is a raster image before
//! handing it over.

use crate::types::{FacePoint, Result, SimError};

/// Bounding box of a detected face, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn centre(&self) -> FacePoint {
        FacePoint::from_bounds(self.x, self.y, self.width, self.height)
    }
}

/// Raster formats accepted as detector input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
}

impl ImageFormat {
    /// Identify the format from magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::WebP)
        } else {
            None
        }
    }
}

/// A face detector operating on encoded image bytes
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &[u8], format: ImageFormat) -> Result<Vec<FaceBox>>;
}

/// Detector used when no vision backend is linked: never finds a face
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDetector;

impl FaceDetector for NullDetector {
    fn detect(&self, _image: &[u8], _format: ImageFormat) -> Result<Vec<FaceBox>> {
        Ok(Vec::new())
    }
}

/// Validate the image and return the centre of every detected face
pub fn detect_face_points(detector: &dyn FaceDetector, image: &[u8]) -> Result<Vec<FacePoint>> {
    let format = ImageFormat::sniff(image)
        .ok_or_else(|| SimError::Detection("Image decode failed".to_string()))?;
    let boxes = detector.detect(image, format)?;
    Ok(boxes.iter().map(FaceBox::centre).collect())
}
