use palette::{FromColor, LinSrgba, Srgba};

/// Element tint in sRGB, as authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Vertex-stream color: linear, premultiplied by alpha.
    #[inline]
    pub fn to_linear_premul(self) -> [f32; 4] {
        let s = Srgba::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        );
        let lin: LinSrgba = LinSrgba::from_color(s);
        [
            lin.red * lin.alpha,
            lin.green * lin.alpha,
            lin.blue * lin.alpha,
            lin.alpha,
        ]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}
