/// ITU-R BT.709 luma weights for linear `r`, `g`, `b`.
pub const LUMA_R: f64 = 0.2126;
pub const LUMA_G: f64 = 0.7152;
pub const LUMA_B: f64 = 0.0722;

/// BT.709 luma of an RGB triple, rounded to nearest and clamped to `[0, 255]`.
#[inline]
pub fn luma_bt709(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
