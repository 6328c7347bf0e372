/// Weight variant, selecting one of the face's per-style parameter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// One of the nine recognized alignment presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAlignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl TextAlignment {
    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl Default for TextAlignment {
    fn default() -> Self {
        Self::new(HorizontalAlign::Center, VerticalAlign::Middle)
    }
}

/// Per-element typesetting options.
#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    /// Requested text size, in the same units as element dimensions.
    pub size: f32,
    pub style: FontStyle,
    pub alignment: TextAlignment,
}

impl TextOptions {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            style: FontStyle::default(),
            alignment: TextAlignment::default(),
        }
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_alignment(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.alignment = TextAlignment::new(horizontal, vertical);
        self
    }
}
