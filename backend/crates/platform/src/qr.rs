//! QR Code Rendering
//!
//! Encodes text into a QR symbol and rasterizes it onto a square canvas of a
//! fixed pixel size. The module grid is scaled by the largest integer factor
//! that fits and centered; the remainder is filled with the light color.

use base64::{Engine, engine::general_purpose};
use image::{ImageFormat, Rgb, RgbImage};
use qrcodegen::{QrCode, QrCodeEcc};
use std::fmt::Write as _;
use std::io::Cursor;

/// Modules of quiet zone around the symbol
pub const DEFAULT_BORDER_MODULES: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("Payload is too long for a QR code at this error correction level")]
    DataTooLong,

    #[error("Canvas of {size_px}px cannot fit {modules} modules")]
    CanvasTooSmall { size_px: u32, modules: u32 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    #[default]
    High,
}

impl From<ErrorCorrection> for QrCodeEcc {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => QrCodeEcc::Low,
            ErrorCorrection::Medium => QrCodeEcc::Medium,
            ErrorCorrection::Quartile => QrCodeEcc::Quartile,
            ErrorCorrection::High => QrCodeEcc::High,
        }
    }
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self, QrError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(QrError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| QrError::InvalidColor(hex.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// ITU-R BT.601 luma
    pub fn luma(self) -> u8 {
        let [r, g, b] = self.0;
        ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
    }
}

/// Two-tone palette: `dark` paints set modules, `light` the background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPalette {
    pub dark: Color,
    pub light: Color,
}

impl QrPalette {
    /// Classic black on white
    pub const MONOCHROME: QrPalette = QrPalette {
        dark: Color([0x00, 0x00, 0x00]),
        light: Color([0xff, 0xff, 0xff]),
    };

    /// Whether modules are lighter than the background
    pub fn is_inverted(&self) -> bool {
        self.dark.luma() > self.light.luma()
    }
}

/// Rendering parameters
#[derive(Debug, Clone, Copy)]
pub struct QrStyle {
    pub size_px: u32,
    pub palette: QrPalette,
    pub error_correction: ErrorCorrection,
    pub border_modules: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size_px: 256,
            palette: QrPalette::MONOCHROME,
            error_correction: ErrorCorrection::High,
            border_modules: DEFAULT_BORDER_MODULES,
        }
    }
}

/// An encoded QR symbol ready to be rasterized
#[derive(Debug, Clone)]
pub struct QrImage {
    modules: Vec<bool>,
    side: u32,
    style: QrStyle,
}

impl QrImage {
    pub fn encode(text: &str, style: QrStyle) -> Result<Self, QrError> {
        let code = QrCode::encode_text(text, style.error_correction.into())
            .map_err(|_| QrError::DataTooLong)?;

        let side = code.size() as u32;
        let total = side + 2 * style.border_modules;
        if style.size_px < total {
            return Err(QrError::CanvasTooSmall {
                size_px: style.size_px,
                modules: total,
            });
        }

        let mut modules = Vec::with_capacity((side * side) as usize);
        for y in 0..side as i32 {
            for x in 0..side as i32 {
                modules.push(code.get_module(x, y));
            }
        }

        Ok(Self {
            modules,
            side,
            style,
        })
    }

    /// Modules per side, excluding the quiet zone
    pub fn modules_per_side(&self) -> u32 {
        self.side
    }

    pub fn style(&self) -> &QrStyle {
        &self.style
    }

    /// Whether the module at (x, y) is set; out-of-symbol coordinates are unset
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let side = self.side as i64;
        if x < 0 || y < 0 || x >= side || y >= side {
            return false;
        }
        self.modules[(y * side + x) as usize]
    }

    fn scale_and_offset(&self) -> (u32, u32) {
        let total = self.side + 2 * self.style.border_modules;
        let scale = self.style.size_px / total;
        let offset = (self.style.size_px - scale * total) / 2;
        (scale, offset)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let (scale, offset) = self.scale_and_offset();
        let border = self.style.border_modules as i64;
        let QrPalette { dark, light } = self.style.palette;

        RgbImage::from_fn(self.style.size_px, self.style.size_px, |px, py| {
            if px < offset || py < offset {
                return Rgb(light.0);
            }
            let mx = ((px - offset) / scale) as i64 - border;
            let my = ((py - offset) / scale) as i64 - border;
            if self.is_dark(mx, my) {
                Rgb(dark.0)
            } else {
                Rgb(light.0)
            }
        })
    }

    pub fn to_png(&self) -> Result<Vec<u8>, QrError> {
        let mut buf = Cursor::new(Vec::new());
        self.to_rgb_image().write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn to_svg(&self) -> String {
        let total = self.side + 2 * self.style.border_modules;
        let border = self.style.border_modules;
        let QrPalette { dark, light } = self.style.palette;

        let mut path = String::new();
        for y in 0..self.side {
            for x in 0..self.side {
                if self.is_dark(x as i64, y as i64) {
                    write!(path, "M{},{}h1v1h-1z", x + border, y + border).ok();
                }
            }
        }

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" "#,
                r#"viewBox="0 0 {total} {total}" shape-rendering="crispEdges">"#,
                r#"<rect width="{total}" height="{total}" fill="{light}"/>"#,
                r#"<path fill="{dark}" d="{path}"/></svg>"#
            ),
            size = self.style.size_px,
            total = total,
            light = light.to_hex(),
            dark = dark.to_hex(),
            path = path,
        )
    }

}

/// `data:` URL embedding an already rendered image
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}
