pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Builds a rectangle from BPMN DI `dc:Bounds` style coordinates.
pub fn bounds(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(point(x, y), euclid::size2(width, height))
}
