//! Empirically tuned skin-colour predicates.
//!
//! Two rules are OR-ed: one for lighter skin under normal light, one for
//! darker or warmer-lit skin. Both are kept exactly as tuned; they are not
//! meant to be a general classifier.

/// Lighter skin: red-dominant with a bounded red/blue spread.
pub fn is_bright_skin(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    r > 60
        && g > 40
        && b > 20
        && r > b
        && r > g - 20
        && (r - g).abs() < 50
        && r - b > 10
        && r - b < 80
}

/// Darker skin: red at least as strong as green and blue.
pub fn is_dark_skin(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    r > 40 && g > 30 && b > 20 && r >= g && r >= b && r - b < 60
}

pub fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    is_bright_skin(r, g, b) || is_dark_skin(r, g, b)
}
