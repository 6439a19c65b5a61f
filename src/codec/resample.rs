//! Resampling backed by the `image` crate.

use crate::codec::Resampler;
use crate::error::EncodeError;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::fmt;

/// Resampling filter, selected by the caller for mipmap generation.
///
/// The names mirror `image::imageops::FilterType`; hosts typically expose
/// them in an import dialog and parse the selection with
/// [`ResampleFilter::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResampleFilter {
    /// Nearest neighbor. Fastest, blocky results.
    Nearest,
    /// Linear (bilinear) interpolation.
    #[default]
    Triangle,
    /// Cubic (Catmull-Rom) interpolation.
    CatmullRom,
    /// Gaussian blur kernel.
    Gaussian,
    /// Lanczos windowed sinc, 3-tap. Slowest, sharpest.
    Lanczos3,
}

impl ResampleFilter {
    /// Parse a filter from its lowercase display name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nearest" => Some(Self::Nearest),
            "triangle" => Some(Self::Triangle),
            "catmull-rom" => Some(Self::CatmullRom),
            "gaussian" => Some(Self::Gaussian),
            "lanczos3" => Some(Self::Lanczos3),
            _ => None,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        };
        write!(f, "{}", name)
    }
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Default resampler backed by `image::imageops::resize`.
pub struct ImageResampler;

impl Resampler for ImageResampler {
    fn resample(
        &self,
        image: &RgbaImage,
        width: u32,
        height: u32,
        filter: ResampleFilter,
    ) -> Result<RgbaImage, EncodeError> {
        if width == 0 || height == 0 {
            return Err(EncodeError::InvalidDimensions(width, height));
        }
        if image.dimensions() == (width, height) {
            return Ok(image.clone());
        }
        Ok(imageops::resize(image, width, height, filter.into()))
    }
}
