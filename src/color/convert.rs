//! Conversions from the non-stored color models to RGB fractions.

/// Reference white (D50) used by the Lab models.
const WHITE_X: f64 = 0.964_22;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 0.825_21;

/// Hue in degrees, saturation and brightness in `[0, 1]`.
pub fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0);
    let chroma = brightness * saturation;
    let (r, g, b) = hue_to_channels(hue, chroma);
    let m = brightness - chroma;
    (r + m, g + m, b + m)
}

/// Hue in degrees, lightness and saturation in `[0, 1]`.
pub fn hls_to_rgb(hue: f64, lightness: f64, saturation: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0);
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let (r, g, b) = hue_to_channels(hue, chroma);
    let m = lightness - chroma / 2.0;
    (r + m, g + m, b + m)
}

fn hue_to_channels(hue: f64, chroma: f64) -> (f64, f64, f64) {
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    }
}

/// CIE Lab (D50) to gamma-encoded sRGB fractions, unclamped.
pub fn lab_to_rgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = WHITE_X * lab_inverse(fx);
    let y = WHITE_Y * lab_inverse(fy);
    let z = WHITE_Z * lab_inverse(fz);

    // XYZ (D50) to linear sRGB, Bradford-adapted
    let r = 3.133_856_1 * x - 1.616_866_7 * y - 0.490_614_6 * z;
    let g = -0.978_768_4 * x + 1.916_141_5 * y + 0.033_454_0 * z;
    let bl = 0.071_945_3 * x - 0.228_991_4 * y + 1.405_242_7 * z;

    (gamma(r), gamma(g), gamma(bl))
}

fn lab_inverse(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

fn gamma(linear: f64) -> f64 {
    if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}
