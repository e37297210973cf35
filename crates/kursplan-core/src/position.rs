//! Anchored placement for the event popover: above the anchor, flipped
//! below when the top overflows, shifted sideways to stay inside the
//! boundary.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64
}

impl Rect {
  pub const fn new(
    x: f64,
    y: f64,
    width: f64,
    height: f64
  ) -> Self {
    Self {
      x,
      y,
      width,
      height
    }
  }

  pub fn right(&self) -> f64 {
    self.x + self.width
  }

  pub fn bottom(&self) -> f64 {
    self.y + self.height
  }

  pub fn center_x(&self) -> f64 {
    self.x + self.width / 2.0
  }

  /// The overlap of both rectangles; disjoint inputs give a zero-sized rect.
  pub fn intersection(
    &self,
    other: &Rect
  ) -> Rect {
    let x = self.x.max(other.x);
    let y = self.y.max(other.y);
    Rect::new(
      x,
      y,
      (self.right().min(other.right()) - x)
        .max(0.0),
      (self.bottom().min(other.bottom())
        - y)
        .max(0.0)
    )
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
  pub width:  f64,
  pub height: f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
  Top,
  Bottom
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
  /// Gap between anchor and popover.
  pub offset:  f64,
  /// Minimum distance from the boundary's left and right edges.
  pub padding: f64
}

impl Default for PositionOptions {
  fn default() -> Self {
    Self {
      offset:  10.0,
      padding: 10.0
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
  pub x:    f64,
  pub y:    f64,
  pub side: Side
}

/// All rectangles share one coordinate space, normally the popover's
/// positioned container.
pub fn compute_position(
  anchor: Rect,
  floating: Size,
  boundary: Rect,
  options: PositionOptions
) -> Position {
  let top_y =
    anchor.y - floating.height - options.offset;
  let bottom_y =
    anchor.bottom() + options.offset;

  let top_overflow =
    (boundary.y - top_y).max(0.0);
  let bottom_overflow = (bottom_y
    + floating.height
    - boundary.bottom())
  .max(0.0);

  let (side, y) = if top_overflow > 0.0
    && bottom_overflow < top_overflow
  {
    (Side::Bottom, bottom_y)
  } else {
    (Side::Top, top_y)
  };

  let min_x = boundary.x + options.padding;
  let max_x = boundary.right()
    - options.padding
    - floating.width;
  let centered =
    anchor.center_x() - floating.width / 2.0;
  let x = if max_x < min_x {
    min_x
  } else {
    centered.clamp(min_x, max_x)
  };

  Position { x, y, side }
}
