//! Minimal 2D geometry used by attack regions and collision tests.
//!
//! Screen convention: `x` grows to the right, `y` grows downward.

use core::fmt;

/// Unique identifier for any entity tracked by an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl core::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` rectangle centered on `center`.
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.x += offset.x;
        self.y += offset.y;
    }

    pub fn translated(mut self, offset: Vec2) -> Self {
        self.translate(offset);
        self
    }
}

/// Four-way facing of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit vector pointing where the entity looks.
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Facing that best points from `from` toward `to`.
    pub fn towards(from: Vec2, to: Vec2) -> Facing {
        let delta = to - from;
        if delta.x.abs() >= delta.y.abs() {
            if delta.x >= 0.0 { Facing::Right } else { Facing::Left }
        } else if delta.y >= 0.0 {
            Facing::Down
        } else {
            Facing::Up
        }
    }

    /// Region of depth `reach` directly in front of `bounds`.
    pub fn region_in_front(self, bounds: &Rect, reach: f32) -> Rect {
        match self {
            Facing::Up => Rect::new(bounds.x, bounds.y - reach, bounds.width, reach),
            Facing::Down => Rect::new(bounds.x, bounds.bottom(), bounds.width, reach),
            Facing::Left => Rect::new(bounds.x - reach, bounds.y, reach, bounds.height),
            Facing::Right => Rect::new(bounds.right(), bounds.y, reach, bounds.height),
        }
    }
}
