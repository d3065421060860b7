//! Crop geometry.
//!
//! Two coordinate spaces are involved: *displayed* space, the preview as
//! laid out on screen, and *natural* space, the decoded image. The user drags
//! in displayed space; sampling happens in natural space.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A crop in displayed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Zero or negative in either dimension.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Clip to `0..bounds`, keeping the part that overlaps.
    pub fn clip_to(&self, bounds: Size) -> Self {
        let (bw, bh) = (f64::from(bounds.width), f64::from(bounds.height));
        let x0 = self.x.clamp(0.0, bw);
        let y0 = self.y.clamp(0.0, bh);
        let x1 = (self.x + self.width).clamp(0.0, bw);
        let y1 = (self.y + self.height).clamp(0.0, bh);
        Self::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }

    /// Shift so the whole rectangle lies inside `0..bounds`, keeping its size
    /// where it fits.
    pub fn keep_within(&self, bounds: Size) -> Self {
        let (bw, bh) = (f64::from(bounds.width), f64::from(bounds.height));
        let width = self.width.min(bw);
        let height = self.height.min(bh);
        Self::new(
            self.x.clamp(0.0, bw - width),
            self.y.clamp(0.0, bh - height),
            width,
            height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropUnit {
    /// Percent of the displayed size.
    Percent,
    Pixels,
}

/// The crop as the user is shaping it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub unit: CropUnit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub const fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    pub const fn pixels(rect: PixelRect) -> Self {
        Self {
            unit: CropUnit::Pixels,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    /// Resolve against the displayed size.
    pub fn to_pixels(&self, displayed: Size) -> PixelRect {
        match self.unit {
            CropUnit::Pixels => PixelRect::new(self.x, self.y, self.width, self.height),
            CropUnit::Percent => {
                let (w, h) = (f64::from(displayed.width), f64::from(displayed.height));
                PixelRect::new(
                    self.x * w / 100.0,
                    self.y * h / 100.0,
                    self.width * w / 100.0,
                    self.height * h / 100.0,
                )
            }
        }
    }
}

impl Default for CropRect {
    /// The centred half-size crop the modal opens with.
    fn default() -> Self {
        Self::percent(25.0, 25.0, 50.0, 50.0)
    }
}

/// Natural pixels per displayed pixel, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// `None` when nothing is displayed.
    pub fn between(natural: Size, displayed: Size) -> Option<Self> {
        if displayed.is_empty() {
            return None;
        }
        Some(Self {
            x: f64::from(natural.width) / f64::from(displayed.width),
            y: f64::from(natural.height) / f64::from(displayed.height),
        })
    }
}

/// An integer region of the natural image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Map a displayed-space crop to the natural-space region it covers.
///
/// Each axis scales independently. Edges are rounded to whole pixels and the
/// result is clipped to the natural image.
pub fn map_to_natural(crop: &PixelRect, scale: ScaleFactors, natural: Size) -> Region {
    let edge = |v: f64, limit: u32| -> u32 { v.round().clamp(0.0, f64::from(limit)) as u32 };
    let x0 = edge(crop.x * scale.x, natural.width);
    let y0 = edge(crop.y * scale.y, natural.height);
    let x1 = edge((crop.x + crop.width) * scale.x, natural.width);
    let y1 = edge((crop.y + crop.height) * scale.y, natural.height);
    Region {
        x: x0,
        y: y0,
        width: x1.saturating_sub(x0),
        height: y1.saturating_sub(y0),
    }
}

/// Size of the output raster: the displayed crop, truncated to whole pixels.
pub fn output_size(crop: &PixelRect) -> Size {
    let dim = |v: f64| -> u32 { v.max(0.0).min(f64::from(u32::MAX)).floor() as u32 };
    Size::new(dim(crop.width), dim(crop.height))
}

/// Fit `natural` inside a `max`×`max` box without enlarging it, keeping the
/// aspect ratio.
pub fn fit_displayed_size(natural: Size, max: u32) -> Size {
    if natural.is_empty() {
        return natural;
    }
    let scale = (f64::from(max) / f64::from(natural.width))
        .min(f64::from(max) / f64::from(natural.height))
        .min(1.0);
    let side = |v: u32| -> u32 { ((f64::from(v) * scale).round() as u32).max(1) };
    Size::new(side(natural.width), side(natural.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_scale_scenario() {
        let natural = Size::new(1200, 800);
        let displayed = Size::new(600, 400);
        let scale = ScaleFactors::between(natural, displayed).unwrap();
        assert_eq!(scale, ScaleFactors { x: 2.0, y: 2.0 });

        let crop = PixelRect::new(100.0, 50.0, 200.0, 150.0);
        assert_eq!(
            map_to_natural(&crop, scale, natural),
            Region {
                x: 200,
                y: 100,
                width: 400,
                height: 300
            }
        );
        insta::assert_snapshot!(output_size(&crop), @"200x150");
    }

    #[test]
    fn test_independent_axis_scales() {
        let scale = ScaleFactors::between(Size::new(1000, 300), Size::new(500, 300)).unwrap();
        let crop = PixelRect::new(10.0, 10.0, 20.0, 20.0);
        let region = map_to_natural(&crop, scale, Size::new(1000, 300));
        assert_eq!(region.size(), Size::new(40, 20));
        assert_eq!((region.x, region.y), (20, 10));
    }

    #[test]
    fn test_region_clipped_to_natural() {
        let natural = Size::new(100, 100);
        let scale = ScaleFactors::between(natural, Size::new(50, 50)).unwrap();
        let region = map_to_natural(&PixelRect::new(40.0, -5.0, 30.0, 20.0), scale, natural);
        assert_eq!(
            region,
            Region {
                x: 80,
                y: 0,
                width: 20,
                height: 30
            }
        );
    }

    #[test]
    fn test_output_size_truncates() {
        assert_eq!(output_size(&PixelRect::new(0.0, 0.0, 99.9, 0.4)), Size::new(99, 0));
    }

    #[test]
    fn test_percent_crop_resolves_against_display() {
        let px = CropRect::default().to_pixels(Size::new(384, 256));
        assert_eq!(px, PixelRect::new(96.0, 64.0, 192.0, 128.0));
    }

    #[test]
    fn test_fit_displayed_size() {
        assert_eq!(fit_displayed_size(Size::new(1200, 800), 384), Size::new(384, 256));
        assert_eq!(fit_displayed_size(Size::new(300, 900), 384), Size::new(128, 384));
        assert_eq!(fit_displayed_size(Size::new(200, 100), 384), Size::new(200, 100));
        assert_eq!(fit_displayed_size(Size::new(0, 10), 384), Size::new(0, 10));
    }

    #[test]
    fn test_rect_helpers() {
        let r = PixelRect::from_corners(Point::new(50.0, 40.0), Point::new(10.0, 60.0));
        assert_eq!(r, PixelRect::new(10.0, 40.0, 40.0, 20.0));
        assert!(r.contains(Point::new(20.0, 50.0)));
        assert!(!r.contains(Point::new(5.0, 50.0)));
        assert!(PixelRect::new(0.0, 0.0, 0.0, 10.0).is_empty());

        let bounds = Size::new(100, 100);
        assert_eq!(
            PixelRect::new(90.0, -10.0, 30.0, 30.0).keep_within(bounds),
            PixelRect::new(70.0, 0.0, 30.0, 30.0)
        );
        assert_eq!(
            PixelRect::new(90.0, -10.0, 30.0, 30.0).clip_to(bounds),
            PixelRect::new(90.0, 0.0, 10.0, 20.0)
        );
    }
}
