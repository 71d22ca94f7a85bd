//! Box geometry: rotation-aware corners, handles, resize and move math.
//!
//! A layer box is described by its unrotated top-left `position`, its
//! `box_size` and a rotation in degrees around the box center. All functions
//! here are pure; gestures feed them cursor positions in screen space together
//! with the viewport scale.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum width and height of a resized box, in page units.
pub const MIN_BOX_SIZE: f64 = 20.0;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Angle step used when rotation snapping is requested.
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// Position, size and rotation of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxData {
    /// Top-left corner of the unrotated box.
    pub position: Point,
    pub box_size: Size,
    /// Rotation in degrees, clockwise, around the box center.
    #[serde(default)]
    pub rotate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl Default for BoxData {
    fn default() -> Self {
        Self::new(Point::ZERO, Size::new(100.0, 100.0))
    }
}

/// One of the eight resize handles around a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    /// All handles, corners first so they win hit-tests over edges.
    pub const ALL: [Direction; 8] = [
        Direction::TopLeft,
        Direction::TopRight,
        Direction::BottomLeft,
        Direction::BottomRight,
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    pub fn has_north(self) -> bool {
        matches!(self, Direction::Top | Direction::TopLeft | Direction::TopRight)
    }

    pub fn has_south(self) -> bool {
        matches!(
            self,
            Direction::Bottom | Direction::BottomLeft | Direction::BottomRight
        )
    }

    pub fn has_west(self) -> bool {
        matches!(self, Direction::Left | Direction::TopLeft | Direction::BottomLeft)
    }

    pub fn has_east(self) -> bool {
        matches!(
            self,
            Direction::Right | Direction::TopRight | Direction::BottomRight
        )
    }

    pub fn is_corner(self) -> bool {
        (self.has_north() || self.has_south()) && (self.has_east() || self.has_west())
    }

    /// CSS cursor shown over this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            Direction::Top => "n-resize",
            Direction::Bottom => "s-resize",
            Direction::Left => "w-resize",
            Direction::Right => "e-resize",
            Direction::TopLeft => "nw-resize",
            Direction::TopRight => "ne-resize",
            Direction::BottomLeft => "sw-resize",
            Direction::BottomRight => "se-resize",
        }
    }

    /// Handle location in box-local coordinates.
    fn local_point(self, size: Size) -> Point {
        let x = if self.has_west() {
            0.0
        } else if self.has_east() {
            size.width
        } else {
            size.width / 2.0
        };
        let y = if self.has_north() {
            0.0
        } else if self.has_south() {
            size.height
        } else {
            size.height / 2.0
        };
        Point::new(x, y)
    }

    /// The box-local point that stays fixed while dragging this handle.
    fn anchor(self, size: Size) -> Point {
        Point::new(
            if self.has_west() { size.width } else { 0.0 },
            if self.has_north() { size.height } else { 0.0 },
        )
    }
}

/// Rotate a vector by `radians` (clockwise in screen space, y down).
pub fn rotate_vec(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Convert a screen-space cursor movement into the box-local frame.
pub fn local_delta(start: Point, current: Point, scale: f64, rotate_degrees: f64) -> Vec2 {
    let delta = (current - start) / scale;
    rotate_vec(delta, -rotate_degrees.to_radians())
}

impl BoxData {
    pub fn new(position: Point, box_size: Size) -> Self {
        Self {
            position,
            box_size,
            rotate: 0.0,
            scale: None,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn center(&self) -> Point {
        self.position + Vec2::new(self.box_size.width / 2.0, self.box_size.height / 2.0)
    }

    /// Transform from box-local coordinates (origin at the unrotated top-left)
    /// to page coordinates.
    pub fn transform(&self) -> Affine {
        let half = Vec2::new(self.box_size.width / 2.0, self.box_size.height / 2.0);
        Affine::translate(self.center().to_vec2())
            * Affine::rotate(self.rotate.to_radians())
            * Affine::translate(-half)
    }

    /// Visual corners in page coordinates: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let t = self.transform();
        let Size { width, height } = self.box_size;
        [
            t * Point::new(0.0, 0.0),
            t * Point::new(width, 0.0),
            t * Point::new(width, height),
            t * Point::new(0.0, height),
        ]
    }

    /// Axis-aligned bounding rectangle of the rotated box.
    pub fn bounds(&self) -> Rect {
        let [first, rest @ ..] = self.corners();
        rest.iter()
            .fold(Rect::from_points(first, first), |rect, &p| rect.union_pt(p))
    }

    /// Check if a page-space point lies inside the rotated box.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.transform().inverse() * point;
        local.x >= 0.0
            && local.y >= 0.0
            && local.x <= self.box_size.width
            && local.y <= self.box_size.height
    }

    /// Page-space position of a resize handle.
    pub fn handle_position(&self, direction: Direction) -> Point {
        self.transform() * direction.local_point(self.box_size)
    }

    /// Find which handle (if any) is hit at the given page-space point.
    /// `tolerance` should already be divided by the viewport scale.
    pub fn hit_test_handles(&self, point: Point, tolerance: f64) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.handle_position(direction).distance(point) <= tolerance)
    }

    /// Move the box by a screen-space cursor movement.
    pub fn moved(&self, start: Point, current: Point, scale: f64) -> BoxData {
        let mut moved = *self;
        moved.position += (current - start) / scale;
        moved
    }

    /// Resize the box by dragging `direction` from `start` to `current`
    /// (screen space) at the given viewport `scale`.
    ///
    /// The moved edges follow the cursor in the box's rotated frame, each
    /// dimension is floored at [`MIN_BOX_SIZE`], then `lock_aspect` recomputes
    /// one dimension from the other using the original ratio. The opposite
    /// edge or corner keeps its page position.
    pub fn resized(
        &self,
        direction: Direction,
        start: Point,
        current: Point,
        scale: f64,
        lock_aspect: bool,
    ) -> BoxData {
        let delta = local_delta(start, current, scale, self.rotate);
        let Size { width: old_w, height: old_h } = self.box_size;

        let mut width = if direction.has_east() {
            old_w + delta.x
        } else if direction.has_west() {
            old_w - delta.x
        } else {
            old_w
        };
        let mut height = if direction.has_south() {
            old_h + delta.y
        } else if direction.has_north() {
            old_h - delta.y
        } else {
            old_h
        };

        width = width.max(MIN_BOX_SIZE);
        height = height.max(MIN_BOX_SIZE);

        if lock_aspect && old_w > 0.0 && old_h > 0.0 {
            let ratio = old_w / old_h;
            if direction.has_north() || direction.has_south() {
                width = height * ratio;
            } else {
                height = width / ratio;
            }
        }

        let new_size = Size::new(width, height);
        let radians = self.rotate.to_radians();

        // Keep the anchor fixed in page space
        let old_half = Vec2::new(old_w / 2.0, old_h / 2.0);
        let new_half = Vec2::new(width / 2.0, height / 2.0);
        let world_anchor =
            self.center() + rotate_vec(direction.anchor(self.box_size).to_vec2() - old_half, radians);
        let new_center =
            world_anchor - rotate_vec(direction.anchor(new_size).to_vec2() - new_half, radians);

        BoxData {
            position: new_center - new_half,
            box_size: new_size,
            rotate: self.rotate,
            scale: self.scale,
        }
    }

    /// Rotation (degrees, `[0, 360)`) that points the box's top toward `cursor`.
    pub fn rotation_toward(&self, cursor: Point, snap: bool) -> f64 {
        let d = cursor - self.center();
        let mut degrees = d.y.atan2(d.x).to_degrees() + 90.0;
        if snap {
            degrees = (degrees / ROTATION_SNAP_DEGREES).round() * ROTATION_SNAP_DEGREES;
        }
        degrees.rem_euclid(360.0)
    }
}
