use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, ColorType, DynamicImage, GenericImageView};
use tracing::debug;

use mg_core::builder::ProcessedImage;
use mg_core::ports::ImageProcessorPort;

const FULL_IMAGE_QUALITY: u8 = 90;
/// Longest edge kept by the re-compression pass.
const RECOMPRESS_MAX_EDGE: u32 = 2400;

pub struct InfraImageProcessor {
    thumbnail_max_edge: u32,
}

impl InfraImageProcessor {
    pub fn new(thumbnail_max_edge: u32) -> Self {
        Self { thumbnail_max_edge }
    }
}

#[async_trait]
impl ImageProcessorPort for InfraImageProcessor {
    async fn process_crop(&self, cropped: &[u8]) -> Result<ProcessedImage> {
        let decoded = image::load_from_memory(cropped).context("decode cropped image")?;
        let full_image = encode_jpeg(&decoded, FULL_IMAGE_QUALITY)?;
        let thumbnail = encode_webp_thumbnail(&decoded, self.thumbnail_max_edge)?;
        debug!(
            full_bytes = full_image.len(),
            thumbnail_bytes = thumbnail.len(),
            "Crop processed"
        );

        Ok(ProcessedImage {
            full_image: Bytes::from(full_image),
            full_mime_type: "image/jpeg".to_string(),
            thumbnail: Bytes::from(thumbnail),
            thumbnail_mime_type: "image/webp".to_string(),
        })
    }

    async fn recompress(&self, image_bytes: &[u8], quality: u8) -> Result<Bytes> {
        let decoded =
            image::load_from_memory(image_bytes).context("decode image for re-compression")?;
        let resized = resize_to_max_edge(decoded, RECOMPRESS_MAX_EDGE);
        let encoded = encode_jpeg(&resized, quality.clamp(1, 100))?;
        debug!(
            before = image_bytes.len(),
            after = encoded.len(),
            quality,
            "Image re-compressed"
        );
        Ok(Bytes::from(encoded))
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .context("encode jpeg")?;
    Ok(out)
}

fn encode_webp_thumbnail(image: &DynamicImage, max_edge: u32) -> Result<Vec<u8>> {
    let resized = resize_to_max_edge(image.clone(), max_edge);
    let rgba = resized.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = Vec::new();
    image::codecs::webp::WebPEncoder::new_lossless(&mut out)
        .encode(rgba.as_raw(), width, height, ColorType::Rgba8.into())
        .context("encode thumbnail to webp")?;
    Ok(out)
}

fn resize_to_max_edge(image: DynamicImage, max_edge: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (target_width, target_height) = calculate_target_size(width, height, max_edge);
    if target_width == width && target_height == height {
        image
    } else {
        image.resize_exact(target_width, target_height, FilterType::Triangle)
    }
}

fn calculate_target_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    if width >= height {
        let scaled_height = ((height as f64) * (max_edge as f64) / (width as f64)).round() as u32;
        (max_edge, scaled_height.max(1))
    } else {
        let scaled_width = ((width as f64) * (max_edge as f64) / (height as f64)).round() as u32;
        (scaled_width.max(1), max_edge)
    }
}
