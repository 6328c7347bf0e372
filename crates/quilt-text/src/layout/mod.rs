pub mod line_breaker;
pub mod options;
pub mod typesetter;

pub use line_breaker::{break_lines, LineInfo};
pub use options::{FontStyle, HorizontalAlign, TextAlignment, TextOptions, VerticalAlign};
pub use typesetter::{count_renderable_glyphs, layout_text, GlyphQuad, TextLayout};
