use crate::math::Vec2;
use crate::tree::TreeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Bottom,
    Middle,
    Top,
}

/// One of the nine recognized anchor presets, mapping to a point of the
/// parent box: `{0, extent/2, extent}` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPoint {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl AnchorPoint {
    pub const fn new(horizontal: HorizontalAnchor, vertical: VerticalAnchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const CENTER: Self = Self::new(HorizontalAnchor::Center, VerticalAnchor::Middle);

    /// Parse a preset from import-layer names. Unknown names are
    /// rejected here; inside the engine the enums are closed.
    pub fn from_names(horizontal: &str, vertical: &str) -> Result<Self, TreeError> {
        let h = match horizontal.to_ascii_lowercase().as_str() {
            "left" => HorizontalAnchor::Left,
            "center" => HorizontalAnchor::Center,
            "right" => HorizontalAnchor::Right,
            _ => return Err(TreeError::InvalidAnchor(horizontal.to_string())),
        };
        let v = match vertical.to_ascii_lowercase().as_str() {
            "bottom" => VerticalAnchor::Bottom,
            "middle" => VerticalAnchor::Middle,
            "top" => VerticalAnchor::Top,
            _ => return Err(TreeError::InvalidAnchor(vertical.to_string())),
        };
        Ok(Self::new(h, v))
    }

    /// The anchored point inside a parent of the given extent, with the
    /// parent's bottom-left corner at the origin.
    pub fn resolve(self, parent_extent: Vec2) -> Vec2 {
        let x = match self.horizontal {
            HorizontalAnchor::Left => 0.0,
            HorizontalAnchor::Center => parent_extent.x * 0.5,
            HorizontalAnchor::Right => parent_extent.x,
        };
        let y = match self.vertical {
            VerticalAnchor::Bottom => 0.0,
            VerticalAnchor::Middle => parent_extent.y * 0.5,
            VerticalAnchor::Top => parent_extent.y,
        };
        Vec2::new(x, y)
    }
}

/// Anchored placement: a preset point plus a fixed offset pulled back
/// toward the parent interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: AnchorPoint,
    pub distance: Vec2,
}

impl Anchor {
    pub fn new(point: AnchorPoint, distance: Vec2) -> Self {
        Self { point, distance }
    }

    /// Element center position in parent-local coordinates.
    pub fn position(self, parent_extent: Vec2) -> Vec2 {
        self.point.resolve(parent_extent) - self.distance
    }
}

/// How an element derives its position (and possibly size) from its
/// parent each layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Anchored(Anchor),
    /// Occupy the full parent extent; authored dimension is replaced by
    /// the parent's at resolve time.
    Stretch,
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Anchored(Anchor::new(AnchorPoint::CENTER, Vec2::ZERO))
    }
}

/// Reference-resolution canvas scaling.
///
/// The scale blends the width and height ratios in log2 space so that a
/// weight of 0.5 behaves like a geometric mean, then the whole canvas
/// is translated to keep its center at the screen center. The state is
/// only recomputed when the physical screen size actually changes.
#[derive(Debug, Clone)]
pub struct CanvasScaler {
    pub(crate) last_screen: Option<Vec2>,
    pub scale: f32,
    pub translation: Vec2,
}

impl CanvasScaler {
    pub fn new() -> Self {
        Self {
            last_screen: None,
            scale: 1.0,
            translation: Vec2::ZERO,
        }
    }

    /// Recompute for a new screen size. Returns false (and does no
    /// work) when the screen size is unchanged.
    pub fn update(&mut self, screen: Vec2, reference: Vec2, width_height_weight: f32) -> bool {
        if self.last_screen == Some(screen) {
            return false;
        }

        let log_w = (screen.x / reference.x).log2();
        let log_h = (screen.y / reference.y).log2();
        let blended = log_w + (log_h - log_w) * width_height_weight.clamp(0.0, 1.0);
        self.scale = blended.exp2();
        self.translation = screen * 0.5;
        self.last_screen = Some(screen);

        log::debug!(
            "canvas scaler: screen {:?} reference {:?} -> scale {}",
            screen,
            reference,
            self.scale
        );
        true
    }
}

impl Default for CanvasScaler {
    fn default() -> Self {
        Self::new()
    }
}
