//! Transcoder warm-up hook.
//!
//! Codec tables and lookup caches are expensive to build on first use; a
//! transcoder installed on the engine gets a chance to build them during init,
//! before the renderer comes up.

use anyhow::{Context, Result};

pub trait Transcoder {
    fn warm_up(&mut self) -> Result<()>;
}

/// 1x1 white RGBA PNG.
const SAMPLE_PNG: [u8; 68] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0b, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8,
    0x0f, 0x04, 0x00, 0x09, 0xfb, 0x03, 0xfd, 0xfb, 0x5e, 0x6b, 0x2b, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Warms the `image` decoders (inflate tables, PNG filter paths) by decoding
/// an embedded sample image.
#[derive(Debug, Default)]
pub struct ImageWarmUp {
    warmed: bool,
}

impl ImageWarmUp {
    pub fn is_warm(&self) -> bool {
        self.warmed
    }
}

impl Transcoder for ImageWarmUp {
    fn warm_up(&mut self) -> Result<()> {
        let sample = image::load_from_memory_with_format(&SAMPLE_PNG, image::ImageFormat::Png)
            .context("failed to decode codec sample image")?;
        anyhow::ensure!(
            sample.width() == 1 && sample.height() == 1,
            "codec sample decoded to {}x{}",
            sample.width(),
            sample.height()
        );

        self.warmed = true;
        log::debug!("image codecs warmed up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_decodes() {
        let mut codec = ImageWarmUp::default();
        codec.warm_up().unwrap();
        assert!(codec.is_warm());
    }
}
