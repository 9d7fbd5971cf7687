//! Thumbnail and watermark request handling.
//!
//! Image processing itself is not done here. File requests carrying `thumbnail` or `watermark`
//! flags are validated into an [`ImageRequest`] and handed to whatever [`ImageTransformer`] the
//! server was started with.

use api_shared::parse_bool_flag;
use filecdn_core::QueryParams;
use std::path::Path;
use std::str::FromStr;

pub const THUMBNAIL_PARAM: &str = "thumbnail";
pub const WATERMARK_PARAM: &str = "watermark";
pub const SIZE_PARAM: &str = "size";
pub const CROP_PARAM: &str = "crop";
pub const WM_OPACITY_PARAM: &str = "wmOpacity";
pub const WM_INTERVAL_PARAM: &str = "wmInterval";
pub const WM_SIZE_PARAM: &str = "wmSize";
pub const WM_ANGLE_PARAM: &str = "wmAngle";
pub const WM_X_PARAM: &str = "wmX";
pub const WM_Y_PARAM: &str = "wmY";

pub const DEFAULT_THUMBNAIL_SIZE: (u32, u32) = (200, 200);

/// A rejected image parameter. The message is shown to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageParamError(pub String);

impl ImageParamError {
    fn invalid(param: &str, expected: &str) -> Self {
        Self(format!(
            "Incorrect value of parameter '{param}' (should be {expected})"
        ))
    }
}

impl std::fmt::Display for ImageParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailOptions {
    pub width: u32,
    pub height: u32,
    /// Crop to fill the box instead of fitting inside it.
    pub crop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOptions {
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f64,
    /// Gap in pixels between tiled stamps; 0 stamps once in the centre.
    pub interval: u32,
    /// Stamp width relative to the image width.
    pub size: f64,
    /// Rotation in degrees.
    pub angle: f64,
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            opacity: 0.5,
            interval: 0,
            size: 1.0,
            angle: 45.0,
            x: None,
            y: None,
        }
    }
}

/// Derived-image options for one file request. Both `None` means serve the file unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageRequest {
    pub thumbnail: Option<ThumbnailOptions>,
    pub watermark: Option<WatermarkOptions>,
}

impl ImageRequest {
    /// Validates the image parameters of a file request.
    ///
    /// Thumbnail options are only read when `thumbnail` is truthy, watermark options only when
    /// `watermark` is.
    ///
    /// # Errors
    ///
    /// Returns an `ImageParamError` naming the first parameter with an unusable value.
    pub fn from_params(params: &QueryParams) -> Result<Self, ImageParamError> {
        let mut request = Self::default();

        if flag(params, THUMBNAIL_PARAM)? {
            let (width, height) = match params.get(SIZE_PARAM) {
                Some(raw) => parse_size(raw)
                    .ok_or_else(|| ImageParamError::invalid(SIZE_PARAM, "INT or INTxINT"))?,
                None => DEFAULT_THUMBNAIL_SIZE,
            };
            request.thumbnail = Some(ThumbnailOptions {
                width,
                height,
                crop: flag(params, CROP_PARAM)?,
            });
        }

        if flag(params, WATERMARK_PARAM)? {
            let defaults = WatermarkOptions::default();
            let opacity = number(params, WM_OPACITY_PARAM, "a number from 0 to 1")?
                .unwrap_or(defaults.opacity);
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ImageParamError::invalid(
                    WM_OPACITY_PARAM,
                    "a number from 0 to 1",
                ));
            }
            let size = number(params, WM_SIZE_PARAM, "a positive number")?
                .unwrap_or(defaults.size);
            if !(size.is_finite() && size > 0.0) {
                return Err(ImageParamError::invalid(WM_SIZE_PARAM, "a positive number"));
            }
            let angle: f64 =
                number(params, WM_ANGLE_PARAM, "a number")?.unwrap_or(defaults.angle);
            if !angle.is_finite() {
                return Err(ImageParamError::invalid(WM_ANGLE_PARAM, "a number"));
            }

            request.watermark = Some(WatermarkOptions {
                opacity,
                interval: number(params, WM_INTERVAL_PARAM, "a non-negative integer")?
                    .unwrap_or(defaults.interval),
                size,
                angle,
                x: number(params, WM_X_PARAM, "an integer")?,
                y: number(params, WM_Y_PARAM, "an integer")?,
            });
        }

        Ok(request)
    }

    pub fn is_passthrough(&self) -> bool {
        self.thumbnail.is_none() && self.watermark.is_none()
    }
}

/// A derived image ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Produces thumbnails and watermarked copies of image files.
///
/// Implementations apply the thumbnail first (when requested) and stamp the watermark on the
/// result.
pub trait ImageTransformer: Send + Sync {
    fn transform(&self, source: &Path, request: &ImageRequest) -> anyhow::Result<TransformedImage>;
}

fn flag(params: &QueryParams, name: &str) -> Result<bool, ImageParamError> {
    match params.get(name) {
        None => Ok(false),
        Some(raw) => parse_bool_flag(raw).ok_or_else(|| ImageParamError::invalid(name, "boolean")),
    }
}

fn number<T: FromStr>(
    params: &QueryParams,
    name: &str,
    expected: &str,
) -> Result<Option<T>, ImageParamError> {
    params
        .get(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ImageParamError::invalid(name, expected))
        })
        .transpose()
}

/// `"120"` is a 120x120 box, `"320x200"` is 320 wide and 200 high. Zero sides are rejected.
fn parse_size(raw: &str) -> Option<(u32, u32)> {
    let (width, height) = match raw.split_once('x') {
        Some((w, h)) => (w.parse().ok()?, h.parse().ok()?),
        None => {
            let side = raw.parse().ok()?;
            (side, side)
        }
    };
    (width > 0 && height > 0).then_some((width, height))
}
