use crate::ir::DrillLink;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawing surface offered by the host. A zero or non-finite `height` means
/// the host does not know it yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub const FALLBACK_WIDTH: f32 = 800.0;
    /// Larger offered extents are capped so every coordinate stays finite.
    pub const MAX_EXTENT: f32 = 10_000_000.0;

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn with_width(width: f32) -> Self {
        Self { width, height: 0.0 }
    }

    pub fn effective_width(&self) -> f32 {
        if self.width.is_finite() && self.width > 0.0 {
            self.width.min(Self::MAX_EXTENT)
        } else {
            Self::FALLBACK_WIDTH
        }
    }

    pub fn available_height(&self) -> f32 {
        if self.height.is_finite() && self.height > 0.0 {
            self.height.min(Self::MAX_EXTENT)
        } else {
            0.0
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::with_width(Self::FALLBACK_WIDTH)
    }
}

/// Axis-aligned clip region used to approximate rounded step corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepGeometry {
    pub index: usize,
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
    pub y_top: f32,
    pub height: f32,
}

impl StepGeometry {
    pub fn top_width(&self) -> f32 {
        self.top_right.x - self.top_left.x
    }

    pub fn bottom_width(&self) -> f32 {
        self.bottom_right.x - self.bottom_left.x
    }

    pub fn y_bottom(&self) -> f32 {
        self.y_top + self.height
    }

    pub fn center_x(&self) -> f32 {
        (self.top_left.x + self.top_right.x) / 2.0
    }

    /// Corners in drawing order: TL, TR, BR, BL.
    pub fn polygon(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Bounding box of the trapezoid. Rounded corners are drawn by clipping
    /// the polygon to this box, so only the wider edge actually gets rounded.
    pub fn bounding_box(&self, radius: f32) -> ClipRect {
        let x = self.top_left.x.min(self.bottom_left.x);
        let right = self.top_right.x.max(self.bottom_right.x);
        ClipRect {
            x,
            y: self.y_top,
            width: right - x,
            height: self.height,
            radius,
        }
    }
}

/// Everything needed to paint one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepVisual {
    pub geometry: StepGeometry,
    pub stage: String,
    pub value: f64,
    pub percent: f64,
    pub fill_color: String,
    pub text_color: String,
    pub label_text: String,
    pub label_x: f32,
    pub label_y: f32,
    pub font_size: f32,
    pub corner_radius: f32,
    pub clip: Option<ClipRect>,
    pub drill_links: Vec<DrillLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelLayout {
    pub width: f32,
    pub height: f32,
    pub step_height: f32,
    pub reference_value: f64,
    pub steps: Vec<StepVisual>,
}
