// Color models
//
// Colors arrive as a color-model code plus a packed 32-bit value. The four
// stored models (RGB, CMYK and two Lab packings) keep their own channels so
// tints can be applied in the model they were defined in; everything else is
// converted to one of them on construction. Conversion to the canonical
// `0x00RRGGBB` value happens only when a raster or palette needs it.

mod convert;

pub use convert::{hls_to_rgb, hsb_to_rgb, lab_to_rgb};

/// Color-model codes used by color records.
pub mod model {
    pub const PANTONE: u16 = 0x01;
    pub const CMYK100: u16 = 0x02;
    pub const CMYK255: u16 = 0x03;
    pub const CMY: u16 = 0x04;
    pub const BGR: u16 = 0x05;
    pub const HSB: u16 = 0x06;
    pub const HLS: u16 = 0x07;
    pub const BLACK_WHITE: u16 = 0x08;
    pub const GRAYSCALE: u16 = 0x09;
    pub const CMYK255_ALT: u16 = 0x11;
    pub const LAB2: u16 = 0x12;
    pub const SPOT: u16 = 0x19;
    pub const LAB4: u16 = 0x1e;
}

#[inline]
fn lane(value: u32, index: u32) -> u8 {
    ((value >> (8 * index)) & 0xff) as u8
}

#[inline]
fn clamp_tint(tint: f64) -> f64 {
    if tint.is_nan() {
        1.0
    } else {
        tint.clamp(0.0, 1.0)
    }
}

/// A decoded color.
///
/// RGB and CMYK channels are fractions in `[0, 1]` (percentage-scaled CMYK
/// may exceed 1 on corrupt input and is clamped on conversion). Lab uses
/// `L ∈ [0, 100]` and signed `a`, `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb { r: f64, g: f64, b: f64 },
    Cmyk { c: f64, m: f64, y: f64, k: f64 },
    LabV2 { l: f64, a: f64, b: f64 },
    LabV4 { l: f64, a: f64, b: f64 },
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// RGB with red in the lowest byte.
    pub fn rgb(value: u32) -> Self {
        Self::Rgb {
            r: lane(value, 0) as f64 / 255.0,
            g: lane(value, 1) as f64 / 255.0,
            b: lane(value, 2) as f64 / 255.0,
        }
    }

    /// CMYK with cyan in the lowest byte, scaled by 100 or 255.
    ///
    /// # Examples
    ///
    /// ```
    /// use cdrkit::color::Color;
    ///
    /// let color = Color::cmyk(0x0000_00FF, false);
    /// assert_eq!(color, Color::Cmyk { c: 1.0, m: 0.0, y: 0.0, k: 0.0 });
    /// ```
    pub fn cmyk(value: u32, percentage: bool) -> Self {
        let scale = if percentage { 100.0 } else { 255.0 };
        Self::Cmyk {
            c: lane(value, 0) as f64 / scale,
            m: lane(value, 1) as f64 / scale,
            y: lane(value, 2) as f64 / scale,
            k: lane(value, 3) as f64 / scale,
        }
    }

    /// Lab with signed a/b lanes.
    pub fn lab2(value: u32) -> Self {
        Self::LabV2 {
            l: lane(value, 0) as f64 * 100.0 / 255.0,
            a: lane(value, 1) as i8 as f64,
            b: lane(value, 2) as i8 as f64,
        }
    }

    /// Lab with a/b lanes biased by 0x80.
    pub fn lab4(value: u32) -> Self {
        Self::LabV4 {
            l: lane(value, 0) as f64 * 100.0 / 255.0,
            a: lane(value, 1).wrapping_sub(0x80) as i8 as f64,
            b: lane(value, 2).wrapping_sub(0x80) as i8 as f64,
        }
    }

    /// Build a color from a record's color-model code and packed value.
    ///
    /// Models without a stored representation are converted on the spot.
    /// Spot and Pantone colors carry no usable values and become black.
    pub fn from_model(color_model: u16, value: u32) -> Self {
        match color_model {
            model::CMYK100 => Self::cmyk(value, true),
            model::CMYK255 | model::CMYK255_ALT => Self::cmyk(value, false),
            model::CMY => Self::Cmyk {
                c: lane(value, 0) as f64 / 255.0,
                m: lane(value, 1) as f64 / 255.0,
                y: lane(value, 2) as f64 / 255.0,
                k: 0.0,
            },
            model::BGR => Self::Rgb {
                r: lane(value, 2) as f64 / 255.0,
                g: lane(value, 1) as f64 / 255.0,
                b: lane(value, 0) as f64 / 255.0,
            },
            model::HSB => {
                let hue = (lane(value, 1) as u16) << 8 | lane(value, 0) as u16;
                let (r, g, b) = hsb_to_rgb(
                    hue as f64,
                    lane(value, 2) as f64 / 255.0,
                    lane(value, 3) as f64 / 255.0,
                );
                Self::Rgb { r, g, b }
            },
            model::HLS => {
                let hue = (lane(value, 1) as u16) << 8 | lane(value, 0) as u16;
                let (r, g, b) = hls_to_rgb(
                    hue as f64,
                    lane(value, 2) as f64 / 255.0,
                    lane(value, 3) as f64 / 255.0,
                );
                Self::Rgb { r, g, b }
            },
            model::BLACK_WHITE => {
                if lane(value, 0) == 0 {
                    Self::BLACK
                } else {
                    Self::WHITE
                }
            },
            model::GRAYSCALE => {
                let gray = lane(value, 0) as f64 / 255.0;
                Self::Rgb {
                    r: gray,
                    g: gray,
                    b: gray,
                }
            },
            model::LAB2 => Self::lab2(value),
            model::LAB4 => Self::lab4(value),
            model::PANTONE | model::SPOT => Self::BLACK,
            other => {
                log::debug!("Unknown color model 0x{other:02x}, value 0x{value:08x}");
                Self::BLACK
            },
        }
    }

    /// Blend toward the model's paper color. The tint is clamped to `[0, 1]`.
    pub fn apply_tint(&mut self, tint: f64) {
        let tint = clamp_tint(tint);
        match self {
            Self::Rgb { r, g, b } => {
                for channel in [r, g, b] {
                    *channel = *channel * tint + (1.0 - tint);
                }
            },
            Self::Cmyk { c, m, y, k } => {
                for channel in [c, m, y, k] {
                    *channel *= tint;
                }
            },
            Self::LabV2 { l, a, b } | Self::LabV4 { l, a, b } => {
                *l = (1.0 - tint) * 100.0 + tint * *l;
                *a *= tint;
                *b *= tint;
            },
        }
    }

    /// Copy of this color with a tint applied.
    pub fn tinted(mut self, tint: f64) -> Self {
        self.apply_tint(tint);
        self
    }

    /// Canonical `0x00RRGGBB` value.
    pub fn to_rgb(&self) -> u32 {
        let (r, g, b) = match *self {
            Self::Rgb { r, g, b } => (r, g, b),
            Self::Cmyk { c, m, y, k } => {
                let k = k.clamp(0.0, 1.0);
                (
                    (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
                    (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
                    (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
                )
            },
            Self::LabV2 { l, a, b } | Self::LabV4 { l, a, b } => lab_to_rgb(l, a, b),
        };
        (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
    }

    /// `#RRGGBB` rendering of [`Color::to_rgb`].
    pub fn to_hex(&self) -> String {
        format!("#{:06X}", self.to_rgb())
    }
}

#[inline]
fn to_byte(channel: f64) -> u32 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmyk_byte_scale() {
        assert_eq!(
            Color::cmyk(0x0000_00FF, false),
            Color::Cmyk {
                c: 1.0,
                m: 0.0,
                y: 0.0,
                k: 0.0
            }
        );
    }

    #[test]
    fn test_cmyk_percentage_scale() {
        let color = Color::cmyk(0x6400_3200, true);
        assert_eq!(
            color,
            Color::Cmyk {
                c: 0.0,
                m: 0.5,
                y: 0.0,
                k: 1.0
            }
        );
        assert_eq!(color.to_rgb(), 0x000000);
    }

    #[test]
    fn test_rgb_lanes() {
        let color = Color::rgb(0x00_80_40_FF);
        assert_eq!(color.to_rgb(), 0xFF4080);
        assert_eq!(color.to_hex(), "#FF4080");
    }

    #[test]
    fn test_bgr_model_puts_red_high() {
        assert_eq!(Color::from_model(model::BGR, 0x00FF_0000).to_rgb(), 0xFF0000);
    }

    #[test]
    fn test_tint_is_clamped() {
        let base = Color::rgb(0x0020_4060);
        assert_eq!(base.tinted(-0.5), base.tinted(0.0));
        assert_eq!(base.tinted(1.5), base.tinted(1.0));
        assert_eq!(base.tinted(1.0), base);
        assert_eq!(base.tinted(0.0), Color::WHITE);

        let cmyk = Color::cmyk(0x1020_3040, false);
        assert_eq!(cmyk.tinted(7.0), cmyk);
    }

    #[test]
    fn test_cmyk_tint_scales_all_channels() {
        let color = Color::cmyk(0x6464_6464, true).tinted(0.5);
        assert_eq!(
            color,
            Color::Cmyk {
                c: 0.5,
                m: 0.5,
                y: 0.5,
                k: 0.5
            }
        );
    }

    #[test]
    fn test_lab_tint_moves_lightness_toward_white() {
        let mut color = Color::lab2(0x00_F6_0A_00);
        assert_eq!(
            color,
            Color::LabV2 {
                l: 0.0,
                a: 10.0,
                b: -10.0
            }
        );
        color.apply_tint(0.25);
        assert_eq!(
            color,
            Color::LabV2 {
                l: 75.0,
                a: 2.5,
                b: -2.5
            }
        );
    }

    #[test]
    fn test_lab4_bias() {
        assert_eq!(
            Color::lab4(0x00_80_90_FF),
            Color::LabV4 {
                l: 100.0,
                a: 16.0,
                b: 0.0
            }
        );
    }

    #[test]
    fn test_lab_white_and_black() {
        assert_eq!(Color::lab4(0x0080_80FF).to_rgb(), 0xFFFFFF);
        assert_eq!(Color::lab4(0x0080_8000).to_rgb(), 0x000000);
    }

    #[test]
    fn test_grayscale_and_black_white() {
        assert_eq!(Color::from_model(model::GRAYSCALE, 0x80).to_rgb(), 0x808080);
        assert_eq!(Color::from_model(model::BLACK_WHITE, 1), Color::WHITE);
        assert_eq!(Color::from_model(model::BLACK_WHITE, 0), Color::BLACK);
    }

    #[test]
    fn test_unknown_model_is_black() {
        assert_eq!(Color::from_model(0x77, 0xFFFF_FFFF), Color::BLACK);
    }
}
