/// One RGBA pixel as handed to a display sink.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new_rgb(0xFF, 0xFF, 0xFF);

    /// The four DMG grey levels, indexed by the 2-bit shade a palette
    /// register produces (0 = lightest, 3 = darkest).
    pub const DMG_SHADES: [Color; 4] = [
        Color::new_rgb(0xFF, 0xFF, 0xFF),
        Color::new_rgb(0xAA, 0xAA, 0xAA),
        Color::new_rgb(0x55, 0x55, 0x55),
        Color::new_rgb(0x00, 0x00, 0x00),
    ];

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Map a 2-bit shade to its DMG grey. Upper bits are ignored.
    #[inline]
    pub const fn from_shade(shade: u8) -> Color {
        Color::DMG_SHADES[(shade & 0x03) as usize]
    }

    #[inline]
    pub const fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn shade_lookup_ignores_upper_bits() {
        assert_eq!(Color::from_shade(0), Color::WHITE);
        assert_eq!(Color::from_shade(3), Color::BLACK);
        assert_eq!(Color::from_shade(0xFD), Color::DMG_SHADES[1]);
    }
}
