//! # Visual primitives
//!
//! Scene-space geometry for the rank animation. The visible frame is
//! [`FRAME_WIDTH`] x [`FRAME_HEIGHT`] units centred on the origin, y pointing up.
//!
//! ## Main Components
//! - [`Point3`], [`BoundingBox`]: positions and extents
//! - [`Color`]: the named palette used by the scenes
//! - [`Mobject`]: a text label, line segment, arrow, polygon or a group of those
//! - [`Shape`]: the geometric interface every primitive implements
//!
//! ## Layout helpers
//! `next_to`, `to_edge`, `move_to`, `scale` and `shift` follow the usual semantics of
//! scene-graph animation libraries: `next_to` puts the object beside a target, separated
//! by a buffer, with an optional aligned edge; `to_edge` pushes it against a frame border.
//!
//! ## Text metrics
//! There is no typesetting engine: a glyph is `0.55 * h` wide where `h = font_size / 100`
//! is the line height, lines are stacked `1.2 * h` apart. An empty string has no extent,
//! only an anchor point, and is ignored by group bounds.
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

pub const FRAME_WIDTH: f64 = 128.0 / 9.0;
pub const FRAME_HEIGHT: f64 = 8.0;
/// buffer between an object and the frame border in `to_edge`
pub const EDGE_BUFF: f64 = 0.5;
/// default buffer of `next_to`
pub const NEXT_TO_BUFF: f64 = 0.25;
const GLYPH_WIDTH: f64 = 0.55;
const LINE_SPACING: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);
    pub const UP: Point3 = Point3::new(0.0, 1.0, 0.0);
    pub const DOWN: Point3 = Point3::new(0.0, -1.0, 0.0);
    pub const LEFT: Point3 = Point3::new(-1.0, 0.0, 0.0);
    pub const RIGHT: Point3 = Point3::new(1.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn lerp(&self, other: Point3, t: f64) -> Point3 {
        *self + (other - *self) * t
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, o: Point3) -> Point3 {
        Point3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, o: Point3) -> Point3 {
        Point3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;
    fn mul(self, f: f64) -> Point3 {
        Point3::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Neg for Point3 {
    type Output = Point3;
    fn neg(self) -> Point3 {
        self * -1.0
    }
}

/// axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox::point(p),
                Some(b) => b.union(&BoundingBox::point(p)),
            })
        })
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn center(&self) -> Point3 {
        self.min.lerp(self.max, 0.5)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn left(&self) -> f64 {
        self.min.x
    }

    pub fn right(&self) -> f64 {
        self.max.x
    }

    pub fn top(&self) -> f64 {
        self.max.y
    }

    pub fn bottom(&self) -> f64 {
        self.min.y
    }

    /// point of the box in `direction`: max along positive components, min along negative
    /// ones, centre along zero ones
    pub fn critical_point(&self, direction: Point3) -> Point3 {
        let pick = |d: f64, lo: f64, hi: f64| {
            if d > 0.0 {
                hi
            } else if d < 0.0 {
                lo
            } else {
                0.5 * (lo + hi)
            }
        };
        Point3::new(
            pick(direction.x, self.min.x, self.max.x),
            pick(direction.y, self.min.y, self.max.y),
            pick(direction.z, self.min.z, self.max.z),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const BLUE: Color = Color::rgb(0x58, 0xC4, 0xDD);
    pub const RED: Color = Color::rgb(0xFC, 0x62, 0x55);
    pub const GREEN: Color = Color::rgb(0x83, 0xC1, 0x67);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
    pub const GREY_A: Color = Color::rgb(0xDD, 0xDD, 0xDD);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// translucent rectangle drawn behind a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundRect {
    pub color: Color,
    pub opacity: f64,
    pub buff: f64,
}

#[enum_dispatch]
pub trait Shape {
    /// extent of the shape, `None` for an empty text
    fn bounds(&self) -> Option<BoundingBox>;
    /// reference point used when the shape has no extent
    fn anchor(&self) -> Point3;
    /// applies a point transform to every defining point
    fn map_points(&mut self, f: &dyn Fn(Point3) -> Point3);
    /// scales sizes that are not points (font size)
    fn scale_sizes(&mut self, factor: f64);
    fn set_z_index(&mut self, z_index: i32);
    fn set_color(&mut self, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub font_size: f64,
    /// centre of the text block
    pub center: Point3,
    pub color: Color,
    pub z_index: i32,
    pub background: Option<BackgroundRect>,
}

impl TextItem {
    pub fn new(text: &str, font_size: f64) -> Self {
        Self {
            text: text.to_string(),
            font_size,
            center: Point3::ORIGIN,
            color: Color::WHITE,
            z_index: 0,
            background: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// line height in scene units
    pub fn line_height(&self) -> f64 {
        self.font_size / 100.0
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    pub fn size(&self) -> (f64, f64) {
        let h = self.line_height();
        let lines = self.lines();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let n = lines.len() as f64;
        (
            widest as f64 * GLYPH_WIDTH * h,
            n * h + (n - 1.0) * (LINE_SPACING - 1.0) * h,
        )
    }
}

impl Shape for TextItem {
    fn bounds(&self) -> Option<BoundingBox> {
        if self.text.is_empty() {
            return None;
        }
        let (w, h) = self.size();
        let half = Point3::new(w / 2.0, h / 2.0, 0.0);
        Some(BoundingBox::new(self.center - half, self.center + half))
    }

    fn anchor(&self) -> Point3 {
        self.center
    }

    fn map_points(&mut self, f: &dyn Fn(Point3) -> Point3) {
        self.center = f(self.center);
    }

    fn scale_sizes(&mut self, factor: f64) {
        self.font_size *= factor;
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub start: Point3,
    pub end: Point3,
    pub color: Color,
    pub stroke_width: f64,
    pub z_index: i32,
}

impl LineSegment {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self {
            start,
            end,
            color: Color::WHITE,
            stroke_width: 4.0,
            z_index: 0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }
}

impl Shape for LineSegment {
    fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points([self.start, self.end])
    }

    fn anchor(&self) -> Point3 {
        self.start.lerp(self.end, 0.5)
    }

    fn map_points(&mut self, f: &dyn Fn(Point3) -> Point3) {
        self.start = f(self.start);
        self.end = f(self.end);
    }

    fn scale_sizes(&mut self, _factor: f64) {}

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

/// Straight arrow with a triangular tip at `end`
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub start: Point3,
    pub end: Point3,
    pub color: Color,
    pub stroke_width: f64,
    pub tip_length: f64,
    pub z_index: i32,
}

impl Arrow {
    pub fn new(start: Point3, end: Point3, color: Color) -> Self {
        Self {
            start,
            end,
            color,
            stroke_width: 6.0,
            tip_length: 0.35,
            z_index: 0,
        }
    }

    /// tip length, at most a quarter of the arrow
    pub fn effective_tip_length(&self) -> f64 {
        self.tip_length.min(0.25 * (self.end - self.start).length())
    }
}

impl Shape for Arrow {
    fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points([self.start, self.end])
    }

    fn anchor(&self) -> Point3 {
        self.start.lerp(self.end, 0.5)
    }

    fn map_points(&mut self, f: &dyn Fn(Point3) -> Point3) {
        self.start = f(self.start);
        self.end = f(self.end);
    }

    fn scale_sizes(&mut self, factor: f64) {
        self.tip_length *= factor;
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub vertices: Vec<Point3>,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub z_index: i32,
}

impl PolygonShape {
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self {
            vertices,
            stroke_color: Color::WHITE,
            stroke_width: 4.0,
            fill_color: Color::WHITE,
            fill_opacity: 0.0,
            z_index: 0,
        }
    }

    pub fn with_fill(mut self, color: Color, opacity: f64) -> Self {
        self.fill_color = color;
        self.fill_opacity = opacity;
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }
}

impl Shape for PolygonShape {
    fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().copied())
    }

    fn anchor(&self) -> Point3 {
        self.bounds().map(|b| b.center()).unwrap_or(Point3::ORIGIN)
    }

    fn map_points(&mut self, f: &dyn Fn(Point3) -> Point3) {
        for v in self.vertices.iter_mut() {
            *v = f(*v);
        }
    }

    fn scale_sizes(&mut self, _factor: f64) {}

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    fn set_color(&mut self, color: Color) {
        self.stroke_color = color;
        self.fill_color = color;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub children: Vec<Mobject>,
}

impl Group {
    pub fn new(children: Vec<Mobject>) -> Self {
        Self { children }
    }
}

impl Shape for Group {
    fn bounds(&self) -> Option<BoundingBox> {
        self.children
            .iter()
            .filter_map(|c| c.bounds())
            .reduce(|a, b| a.union(&b))
    }

    fn anchor(&self) -> Point3 {
        match self.bounds() {
            Some(b) => b.center(),
            None => self
                .children
                .first()
                .map(|c| c.anchor())
                .unwrap_or(Point3::ORIGIN),
        }
    }

    fn map_points(&mut self, f: &dyn Fn(Point3) -> Point3) {
        for c in self.children.iter_mut() {
            c.map_points(f);
        }
    }

    fn scale_sizes(&mut self, factor: f64) {
        for c in self.children.iter_mut() {
            c.scale_sizes(factor);
        }
    }

    fn set_z_index(&mut self, z_index: i32) {
        for c in self.children.iter_mut() {
            c.set_z_index(z_index);
        }
    }

    fn set_color(&mut self, color: Color) {
        for c in self.children.iter_mut() {
            c.set_color(color);
        }
    }
}

/// Any object that can be placed in a scene
#[enum_dispatch(Shape)]
#[derive(Debug, Clone, PartialEq)]
pub enum Mobject {
    Text(TextItem),
    Line(LineSegment),
    Arrow(Arrow),
    Polygon(PolygonShape),
    Group(Group),
}

impl Mobject {
    /// bounds, or a zero-size box at the anchor for empty objects
    pub fn extent(&self) -> BoundingBox {
        self.bounds()
            .unwrap_or_else(|| BoundingBox::point(self.anchor()))
    }

    pub fn center(&self) -> Point3 {
        self.extent().center()
    }

    pub fn shift(mut self, delta: Point3) -> Self {
        self.map_points(&|p| p + delta);
        self
    }

    pub fn move_to(self, target: Point3) -> Self {
        let delta = target - self.center();
        self.shift(delta)
    }

    /// scales about the centre, font sizes included
    pub fn scale(mut self, factor: f64) -> Self {
        let c = self.center();
        self.map_points(&|p| c + (p - c) * factor);
        self.scale_sizes(factor);
        self
    }

    pub fn next_to(self, target: &Mobject, direction: Point3, buff: f64) -> Self {
        self.next_to_aligned(target, direction, buff, Point3::ORIGIN)
    }

    /// places the object beside `target` in `direction`; `aligned_edge` selects which
    /// edges of both objects are lined up (`ORIGIN` centres them)
    pub fn next_to_aligned(
        self,
        target: &Mobject,
        direction: Point3,
        buff: f64,
        aligned_edge: Point3,
    ) -> Self {
        let target_point = target.extent().critical_point(direction + aligned_edge);
        let own_point = self.extent().critical_point(aligned_edge - direction);
        self.shift(target_point - own_point + direction * buff)
    }

    /// pushes the object against the frame border in `direction`
    pub fn to_edge(self, direction: Point3) -> Self {
        self.to_edge_with_buff(direction, EDGE_BUFF)
    }

    pub fn to_edge_with_buff(self, direction: Point3, buff: f64) -> Self {
        let own = self.extent().critical_point(direction);
        let border = |d: f64, half: f64, current: f64| {
            if d == 0.0 {
                current
            } else {
                d.signum() * (half - buff)
            }
        };
        let target = Point3::new(
            border(direction.x, FRAME_WIDTH / 2.0, own.x),
            border(direction.y, FRAME_HEIGHT / 2.0, own.y),
            own.z,
        );
        self.shift(target - own)
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.set_z_index(z_index);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    /// adds a translucent black rectangle behind every text in the object
    pub fn with_background(mut self, opacity: f64, buff: f64) -> Self {
        self.for_each_text(&mut |t| {
            t.background = Some(BackgroundRect {
                color: Color::BLACK,
                opacity,
                buff,
            })
        });
        self
    }

    fn for_each_text(&mut self, f: &mut dyn FnMut(&mut TextItem)) {
        match self {
            Mobject::Text(t) => f(t),
            Mobject::Group(g) => {
                for c in g.children.iter_mut() {
                    c.for_each_text(f);
                }
            }
            _ => {}
        }
    }

    /// leaves of the object tree in drawing order
    pub fn leaves(&self) -> Vec<&Mobject> {
        match self {
            Mobject::Group(g) => g.children.iter().flat_map(|c| c.leaves()).collect(),
            other => vec![other],
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            Mobject::Text(t) => t.z_index,
            Mobject::Line(l) => l.z_index,
            Mobject::Arrow(a) => a.z_index,
            Mobject::Polygon(p) => p.z_index,
            Mobject::Group(g) => g.children.iter().map(|c| c.z_index()).max().unwrap_or(0),
        }
    }
}

/// Coordinate system drawn as axis lines with tick marks.
///
/// Axis coordinates map to scene points through `origin + unit * (x, y, z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x_range: [f64; 3],
    pub y_range: [f64; 3],
    pub z_range: Option<[f64; 3]>,
    /// scene point of the coordinate origin
    pub origin: Point3,
    /// scene units per axis unit
    pub unit: f64,
    pub color: Color,
    pub stroke_width: f64,
}

impl Axes {
    const TICK_SIZE: f64 = 0.1;

    /// 2D axes centred on the scene origin
    pub fn new(x_range: [f64; 3], y_range: [f64; 3]) -> Self {
        let mut axes = Self {
            x_range,
            y_range,
            z_range: None,
            origin: Point3::ORIGIN,
            unit: 1.0,
            color: Color::WHITE,
            stroke_width: 2.0,
        };
        let c = axes.center();
        axes.origin = axes.origin - c;
        axes
    }

    pub fn three_d(x_range: [f64; 3], y_range: [f64; 3], z_range: [f64; 3]) -> Self {
        let mut axes = Self::new(x_range, y_range);
        axes.z_range = Some(z_range);
        let c = axes.center();
        axes.origin = axes.origin - c;
        axes
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    fn mid(range: &[f64; 3]) -> f64 {
        0.5 * (range[0] + range[1])
    }

    /// scene point at the middle of every range
    pub fn center(&self) -> Point3 {
        self.c2p(
            Self::mid(&self.x_range),
            Self::mid(&self.y_range),
            self.z_range.as_ref().map(Self::mid).unwrap_or(0.0),
        )
    }

    /// coordinates to scene point
    pub fn c2p(&self, x: f64, y: f64, z: f64) -> Point3 {
        self.origin + Point3::new(x, y, z) * self.unit
    }

    pub fn scale(mut self, factor: f64) -> Self {
        let c = self.center();
        self.origin = c + (self.origin - c) * factor;
        self.unit *= factor;
        self
    }

    pub fn move_to(mut self, target: Point3) -> Self {
        let delta = target - self.center();
        self.origin = self.origin + delta;
        self
    }

    fn axis(&self, range: &[f64; 3], dir: Point3, tick_dir: Point3) -> Mobject {
        let line = LineSegment::new(
            self.origin + dir * (range[0] * self.unit),
            self.origin + dir * (range[1] * self.unit),
        )
        .with_color(self.color)
        .with_stroke_width(self.stroke_width);
        let mut children = vec![Mobject::from(line)];
        if range[2] > 0.0 {
            let n = ((range[1] - range[0]) / range[2]).round() as i64;
            for i in 0..=n {
                let v = range[0] + range[2] * i as f64;
                if v.abs() < 1e-12 {
                    continue;
                }
                let at = self.origin + dir * (v * self.unit);
                let half = tick_dir * (Self::TICK_SIZE / 2.0);
                children.push(Mobject::from(
                    LineSegment::new(at - half, at + half)
                        .with_color(self.color)
                        .with_stroke_width(self.stroke_width),
                ));
            }
        }
        Mobject::from(Group::new(children))
    }

    /// drawable axis lines and ticks
    pub fn mobject(&self) -> Mobject {
        let mut axes = vec![
            self.axis(&self.x_range, Point3::RIGHT, Point3::UP),
            self.axis(&self.y_range, Point3::UP, Point3::RIGHT),
        ];
        if let Some(z_range) = &self.z_range {
            axes.push(self.axis(z_range, Point3::new(0.0, 0.0, 1.0), Point3::RIGHT));
        }
        Mobject::from(Group::new(axes))
    }
}
