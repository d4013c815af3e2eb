//! Outline paths in absolute diagram coordinates, used for hit-testing and selection
//! outlines.

use crate::util::fmt;
use annotator_model::geom::{Point, Rect, bounds};
use svgtypes::{PathParser, PathSegment};

/// Corner radius actually used for a `width`x`height` box: never more than half of either side.
pub fn clamp_radius(radius: f64, width: f64, height: f64) -> f64 {
    radius.max(0.0).min(width / 2.0).min(height / 2.0).max(0.0)
}

pub fn round_rect_path(rect: &Rect, radius: f64) -> String {
    let (x, y) = (rect.origin.x, rect.origin.y);
    let (w, h) = (rect.size.width, rect.size.height);
    let r = clamp_radius(radius, w, h);
    if r == 0.0 {
        return rect_path(rect);
    }
    format!(
        "M {} {} H {} A {r} {r} 0 0 1 {} {} V {} A {r} {r} 0 0 1 {} {} H {} A {r} {r} 0 0 1 {} {} V {} A {r} {r} 0 0 1 {} {} Z",
        fmt(x + r),
        fmt(y),
        fmt(x + w - r),
        fmt(x + w),
        fmt(y + r),
        fmt(y + h - r),
        fmt(x + w - r),
        fmt(y + h),
        fmt(x + r),
        fmt(x),
        fmt(y + h - r),
        fmt(y + r),
        fmt(x + r),
        fmt(y),
        r = fmt(r),
    )
}

pub fn rect_path(rect: &Rect) -> String {
    let (x, y) = (rect.origin.x, rect.origin.y);
    format!(
        "M {} {} H {} V {} H {} Z",
        fmt(x),
        fmt(y),
        fmt(x + rect.size.width),
        fmt(y + rect.size.height),
        fmt(x)
    )
}

/// Ellipse inscribed in `rect`, as four quarter arcs through the extreme points.
pub fn ellipse_path(rect: &Rect) -> String {
    let rx = rect.size.width / 2.0;
    let ry = rect.size.height / 2.0;
    let cx = rect.origin.x + rx;
    let cy = rect.origin.y + ry;
    let (rx_s, ry_s) = (fmt(rx), fmt(ry));
    format!(
        "M {} {} A {rx_s} {ry_s} 0 0 1 {} {} A {rx_s} {ry_s} 0 0 1 {} {} A {rx_s} {ry_s} 0 0 1 {} {} A {rx_s} {ry_s} 0 0 1 {} {} Z",
        fmt(cx),
        fmt(cy - ry),
        fmt(cx + rx),
        fmt(cy),
        fmt(cx),
        fmt(cy + ry),
        fmt(cx - rx),
        fmt(cy),
        fmt(cx),
        fmt(cy - ry),
    )
}

pub fn diamond_path(rect: &Rect) -> String {
    let (x, y) = (rect.origin.x, rect.origin.y);
    let (w, h) = (rect.size.width, rect.size.height);
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        fmt(x + w / 2.0),
        fmt(y),
        fmt(x + w),
        fmt(y + h / 2.0),
        fmt(x + w / 2.0),
        fmt(y + h),
        fmt(x),
        fmt(y + h / 2.0),
    )
}

pub fn polyline_path(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(if i == 0 { "M " } else { "L " });
        out.push_str(&fmt(p.x));
        out.push(' ');
        out.push_str(&fmt(p.y));
    }
    out
}

/// Bounding box of the points a path passes through (control points included).
///
/// Arc extents are taken from their end points, which is exact for the quarter arcs the
/// outlines in this module are made of. Returns `None` for empty or unparsable paths.
pub fn path_bounds(d: &str) -> Option<Rect> {
    let mut cur = (0.0f64, 0.0f64);
    let mut start = cur;
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut add = |x: f64, y: f64| {
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    };

    for seg in PathParser::from(d) {
        let seg = seg.ok()?;
        let abs = is_absolute(&seg);
        let resolve = |x: f64, y: f64, cur: (f64, f64)| {
            if abs { (x, y) } else { (cur.0 + x, cur.1 + y) }
        };
        match seg {
            PathSegment::MoveTo { x, y, .. } => {
                cur = resolve(x, y, cur);
                start = cur;
                add(cur.0, cur.1);
            }
            PathSegment::LineTo { x, y, .. }
            | PathSegment::SmoothQuadratic { x, y, .. }
            | PathSegment::EllipticalArc { x, y, .. } => {
                cur = resolve(x, y, cur);
                add(cur.0, cur.1);
            }
            PathSegment::HorizontalLineTo { x, .. } => {
                cur.0 = if abs { x } else { cur.0 + x };
                add(cur.0, cur.1);
            }
            PathSegment::VerticalLineTo { y, .. } => {
                cur.1 = if abs { y } else { cur.1 + y };
                add(cur.0, cur.1);
            }
            PathSegment::CurveTo {
                x1, y1, x2, y2, x, y, ..
            } => {
                let c1 = resolve(x1, y1, cur);
                let c2 = resolve(x2, y2, cur);
                add(c1.0, c1.1);
                add(c2.0, c2.1);
                cur = resolve(x, y, cur);
                add(cur.0, cur.1);
            }
            PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
                let c2 = resolve(x2, y2, cur);
                add(c2.0, c2.1);
                cur = resolve(x, y, cur);
                add(cur.0, cur.1);
            }
            PathSegment::Quadratic { x1, y1, x, y, .. } => {
                let c1 = resolve(x1, y1, cur);
                add(c1.0, c1.1);
                cur = resolve(x, y, cur);
                add(cur.0, cur.1);
            }
            PathSegment::ClosePath { .. } => {
                cur = start;
            }
        }
    }

    if !min.0.is_finite() {
        return None;
    }
    Some(bounds(min.0, min.1, max.0 - min.0, max.1 - min.1))
}

fn is_absolute(seg: &PathSegment) -> bool {
    match *seg {
        PathSegment::MoveTo { abs, .. }
        | PathSegment::LineTo { abs, .. }
        | PathSegment::HorizontalLineTo { abs, .. }
        | PathSegment::VerticalLineTo { abs, .. }
        | PathSegment::CurveTo { abs, .. }
        | PathSegment::SmoothCurveTo { abs, .. }
        | PathSegment::Quadratic { abs, .. }
        | PathSegment::SmoothQuadratic { abs, .. }
        | PathSegment::EllipticalArc { abs, .. }
        | PathSegment::ClosePath { abs } => abs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(r: Rect) -> (f64, f64, f64, f64) {
        (r.origin.x, r.origin.y, r.size.width, r.size.height)
    }

    #[test]
    fn round_rect_path_matches_expected_commands() {
        let d = round_rect_path(&bounds(0.0, 0.0, 100.0, 80.0), 10.0);
        assert_eq!(
            d,
            "M 10 0 H 90 A 10 10 0 0 1 100 10 V 70 A 10 10 0 0 1 90 80 H 10 A 10 10 0 0 1 0 70 V 10 A 10 10 0 0 1 10 0 Z"
        );
    }

    #[test]
    fn outline_bounds_equal_the_source_rect() {
        for (x, y, w, h) in [
            (0.0, 0.0, 100.0, 80.0),
            (260.0, 80.0, 36.0, 36.0),
            (-5.5, 3.25, 12.0, 300.0),
        ] {
            let r = bounds(x, y, w, h);
            assert_eq!(
                tuple(path_bounds(&round_rect_path(&r, 10.0)).unwrap()),
                (x, y, w, h)
            );
            assert_eq!(tuple(path_bounds(&ellipse_path(&r)).unwrap()), (x, y, w, h));
            assert_eq!(tuple(path_bounds(&diamond_path(&r)).unwrap()), (x, y, w, h));
            assert_eq!(tuple(path_bounds(&rect_path(&r)).unwrap()), (x, y, w, h));
        }
    }

    #[test]
    fn radius_is_clamped_for_small_shapes() {
        assert_eq!(clamp_radius(10.0, 12.0, 300.0), 6.0);
        assert_eq!(clamp_radius(10.0, 100.0, 80.0), 10.0);
        assert_eq!(clamp_radius(-1.0, 100.0, 80.0), 0.0);
        let d = round_rect_path(&bounds(0.0, 0.0, 0.0, 0.0), 10.0);
        assert_eq!(d, "M 0 0 H 0 V 0 H 0 Z");
    }

    #[test]
    fn relative_segments_are_resolved() {
        let r = path_bounds("m 10 10 l 20 0 v 5 h -20 z").unwrap();
        assert_eq!(tuple(r), (10.0, 10.0, 20.0, 5.0));
        assert_eq!(path_bounds(""), None);
        assert_eq!(path_bounds("M 0 0 L nope"), None);
    }

    #[test]
    fn mixed_absolute_and_relative_segments() {
        let r = path_bounds("M 10 10 a 5 5 0 0 1 5 5 Q 40 0 30 20 t 10 0").unwrap();
        assert_eq!(tuple(r), (10.0, 0.0, 30.0, 20.0));

        let r = path_bounds("M 0 0 L 10 0 m 5 5 l 5 0 Z").unwrap();
        assert_eq!(tuple(r), (0.0, 0.0, 20.0, 5.0));
    }

    #[test]
    fn polyline_joins_points() {
        let pts = [
            annotator_model::geom::point(1.0, 2.0),
            annotator_model::geom::point(3.5, 2.0),
        ];
        assert_eq!(polyline_path(&pts), "M 1 2 L 3.5 2");
    }
}
