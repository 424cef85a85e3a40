//! # Frame rendering
//!
//! Turns a [`Scene`] timeline into an animated GIF. Frame `k` shows the scene at
//! `t = k / fps`; the number of frames is `round(duration * fps)`.
//!
//! Drawing order inside a frame follows `z_index`, objects with equal index are drawn in
//! the order they entered the stage. Partially drawn objects (`Create`, `GrowArrow`,
//! `Write` in progress) are truncated to their progress; fading objects carry their opacity.
use super::primitives::{
    Arrow, Color as SceneColor, FRAME_HEIGHT, LineSegment, Mobject, Point3,
    PolygonShape, Shape, TextItem,
};
use super::scene::Scene;
use crate::settings::AnimationConfig;
use clap::ValueEnum;
use log::{debug, info};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// subdirectory of `videos/` holding the rank animation renders
pub const RENDER_MODULE_DIR: &str = "rank_scenes";
/// stroke widths are given in hundredths of a scene unit
const STROKE_UNIT: f64 = 0.01;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create output directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("drawing backend failed: {0}")]
    Backend(String),
    #[error("scene '{0}' has zero duration, nothing to render")]
    EmptyScene(String),
}

fn backend_err<E: fmt::Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderQuality {
    /// 854x480, 15 fps
    #[value(name = "l", alias = "low")]
    Low,
    /// 1280x720, 30 fps
    #[value(name = "m", alias = "medium")]
    Medium,
    /// 1920x1080, 60 fps
    #[value(name = "h", alias = "high")]
    High,
}

impl RenderQuality {
    pub fn pixel_size(&self) -> (u32, u32) {
        match self {
            RenderQuality::Low => (854, 480),
            RenderQuality::Medium => (1280, 720),
            RenderQuality::High => (1920, 1080),
        }
    }

    pub fn fps(&self) -> u32 {
        match self {
            RenderQuality::Low => 15,
            RenderQuality::Medium => 30,
            RenderQuality::High => 60,
        }
    }

    /// `480p15`, `720p30`, `1080p60`
    pub fn dir_name(&self) -> String {
        format!("{}p{}", self.pixel_size().1, self.fps())
    }
}

impl fmt::Display for RenderQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// `<media>/videos/rank_scenes/<quality>/<Scene>.gif`
pub fn output_path(media_dir: &Path, quality: RenderQuality, scene_name: &str) -> PathBuf {
    media_dir
        .join("videos")
        .join(RENDER_MODULE_DIR)
        .join(quality.dir_name())
        .join(format!("{}.gif", scene_name))
}

pub fn frame_count(duration: f64, fps: u32) -> usize {
    (duration * fps as f64).round().max(0.0) as usize
}

/// A leaf shape in screen coordinates, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub shape: Mobject,
    pub opacity: f64,
    pub progress: f64,
    pub z_index: i32,
}

/// leaves visible at time `t`, projected and sorted by `z_index`
pub fn frame_items(scene: &Scene, t: f64) -> Vec<DrawItem> {
    let snap = scene.snapshot(t);
    let mut items: Vec<DrawItem> = Vec::new();
    for v in &snap.visible {
        let Some(screen) = scene.screen_mobject(v.id, &snap.camera) else {
            continue;
        };
        for leaf in screen.leaves() {
            items.push(DrawItem {
                shape: leaf.clone(),
                opacity: v.opacity,
                progress: v.progress,
                z_index: leaf.z_index(),
            });
        }
    }
    // stable: equal z keeps stage order
    items.sort_by_key(|i| i.z_index);
    items
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub scene: String,
    pub path: PathBuf,
    pub frames: usize,
    pub duration: f64,
    pub quality: RenderQuality,
}

pub trait SceneRenderer {
    fn render(&self, scene: &Scene, path: &Path) -> Result<RenderSummary, RenderError>;
}

/// Maps scene units to pixels, origin in the frame centre, y up
#[derive(Debug, Clone, Copy)]
struct PixelMap {
    width: u32,
    height: u32,
}

impl PixelMap {
    fn scale(&self) -> f64 {
        self.height as f64 / FRAME_HEIGHT
    }

    fn px(&self, p: Point3) -> (i32, i32) {
        let s = self.scale();
        (
            (self.width as f64 / 2.0 + p.x * s).round() as i32,
            (self.height as f64 / 2.0 - p.y * s).round() as i32,
        )
    }

    fn stroke(&self, width: f64) -> u32 {
        ((width * STROKE_UNIT * self.scale()).round() as u32).max(1)
    }
}

fn rgb(c: SceneColor) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

/// Writes GIFs through the plotters bitmap backend
#[derive(Debug, Clone)]
pub struct GifRenderer {
    pub quality: RenderQuality,
    pub background: SceneColor,
    /// overrides the pixel size of `quality`
    pub resolution: Option<(u32, u32)>,
}

impl GifRenderer {
    pub fn new(quality: RenderQuality) -> Self {
        Self {
            quality,
            background: SceneColor::BLACK,
            resolution: None,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            quality: config.quality,
            background: config.background,
            resolution: config.resolution.map(|[w, h]| (w, h)),
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.resolution.unwrap_or_else(|| self.quality.pixel_size())
    }

    fn draw_line(
        &self,
        area: &Area,
        map: &PixelMap,
        line: &LineSegment,
        opacity: f64,
        progress: f64,
    ) -> Result<(), RenderError> {
        let end = line.start.lerp(line.end, progress);
        let style = rgb(line.color)
            .mix(opacity)
            .stroke_width(map.stroke(line.stroke_width));
        area.draw(&PathElement::new(vec![map.px(line.start), map.px(end)], style))
            .map_err(backend_err)
    }

    fn draw_arrow(
        &self,
        area: &Area,
        map: &PixelMap,
        arrow: &Arrow,
        opacity: f64,
        progress: f64,
    ) -> Result<(), RenderError> {
        let end = arrow.start.lerp(arrow.end, progress);
        let grown = Arrow {
            end,
            tip_length: arrow.tip_length * progress,
            ..arrow.clone()
        };
        let dir = end - arrow.start;
        let len = dir.length();
        if len <= f64::EPSILON {
            return Ok(());
        }
        let unit = dir * (1.0 / len);
        let normal = Point3::new(-unit.y, unit.x, 0.0);
        let tip = grown.effective_tip_length();
        let base = end - unit * tip;
        let color = rgb(arrow.color).mix(opacity);
        area.draw(&PathElement::new(
            vec![map.px(arrow.start), map.px(base)],
            color.stroke_width(map.stroke(arrow.stroke_width)),
        ))
        .map_err(backend_err)?;
        let half = normal * (tip * 0.5);
        area.draw(&Polygon::new(
            vec![map.px(end), map.px(base + half), map.px(base - half)],
            color.filled(),
        ))
        .map_err(backend_err)
    }

    fn draw_polygon(
        &self,
        area: &Area,
        map: &PixelMap,
        polygon: &PolygonShape,
        opacity: f64,
        progress: f64,
    ) -> Result<(), RenderError> {
        let points: Vec<(i32, i32)> = polygon.vertices.iter().map(|v| map.px(*v)).collect();
        if points.len() < 2 {
            return Ok(());
        }
        if polygon.fill_opacity > 0.0 {
            area.draw(&Polygon::new(
                points.clone(),
                rgb(polygon.fill_color)
                    .mix(polygon.fill_opacity * opacity * progress)
                    .filled(),
            ))
            .map_err(backend_err)?;
        }
        // outline, closed and cut at the drawn share of the perimeter
        let mut closed = polygon.vertices.clone();
        closed.push(polygon.vertices[0]);
        let perimeter: f64 = closed.windows(2).map(|w| (w[1] - w[0]).length()).sum();
        let mut remaining = perimeter * progress;
        let mut path = vec![map.px(closed[0])];
        for w in closed.windows(2) {
            let seg = (w[1] - w[0]).length();
            if remaining >= seg {
                path.push(map.px(w[1]));
                remaining -= seg;
            } else {
                if seg > 0.0 {
                    path.push(map.px(w[0].lerp(w[1], remaining / seg)));
                }
                break;
            }
        }
        let style = rgb(polygon.stroke_color)
            .mix(opacity)
            .stroke_width(map.stroke(polygon.stroke_width));
        area.draw(&PathElement::new(path, style)).map_err(backend_err)
    }

    fn draw_text(
        &self,
        area: &Area,
        map: &PixelMap,
        text: &TextItem,
        opacity: f64,
        progress: f64,
    ) -> Result<(), RenderError> {
        let Some(bounds) = text.bounds() else {
            return Ok(());
        };
        if let Some(bg) = &text.background {
            let (x0, y0) = map.px(Point3::new(bounds.left() - bg.buff, bounds.top() + bg.buff, 0.0));
            let (x1, y1) =
                map.px(Point3::new(bounds.right() + bg.buff, bounds.bottom() - bg.buff, 0.0));
            area.draw(&Rectangle::new(
                [(x0, y0), (x1, y1)],
                rgb(bg.color).mix(bg.opacity * opacity).filled(),
            ))
            .map_err(backend_err)?;
        }
        let total: usize = text.text.chars().filter(|c| *c != '\n').count();
        let mut budget = (total as f64 * progress).round() as usize;
        let h = text.line_height();
        let font_px = (h * map.scale()).max(1.0);
        let style = ("sans-serif", font_px)
            .into_font()
            .color(&rgb(text.color).mix(opacity))
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (i, line) in text.lines().iter().enumerate() {
            if budget == 0 {
                break;
            }
            let shown: String = line.chars().take(budget).collect();
            budget -= shown.chars().count();
            let y = bounds.top() - h / 2.0 - i as f64 * h * 1.2;
            area.draw(&plotters::element::Text::new(
                shown,
                map.px(Point3::new(bounds.left(), y, 0.0)),
                style.clone(),
            ))
            .map_err(backend_err)?;
        }
        Ok(())
    }

    fn draw_item(&self, area: &Area, map: &PixelMap, item: &DrawItem) -> Result<(), RenderError> {
        match &item.shape {
            Mobject::Text(t) => self.draw_text(area, map, t, item.opacity, item.progress),
            Mobject::Line(l) => self.draw_line(area, map, l, item.opacity, item.progress),
            Mobject::Arrow(a) => self.draw_arrow(area, map, a, item.opacity, item.progress),
            Mobject::Polygon(p) => self.draw_polygon(area, map, p, item.opacity, item.progress),
            Mobject::Group(g) => {
                for child in &g.children {
                    let child_item = DrawItem {
                        shape: child.clone(),
                        z_index: child.z_index(),
                        ..item.clone()
                    };
                    self.draw_item(area, map, &child_item)?;
                }
                Ok(())
            }
        }
    }
}

impl SceneRenderer for GifRenderer {
    fn render(&self, scene: &Scene, path: &Path) -> Result<RenderSummary, RenderError> {
        let duration = scene.duration();
        let fps = self.quality.fps();
        let frames = frame_count(duration, fps);
        if frames == 0 {
            return Err(RenderError::EmptyScene(scene.name.clone()));
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        let (width, height) = self.pixel_size();
        let map = PixelMap { width, height };
        let delay_ms = (1000.0 / fps as f64).round() as u32;
        info!(
            "rendering {} ({} frames, {:.1} s at {}) to {}",
            scene.name,
            frames,
            duration,
            self.quality,
            path.display()
        );
        let root = BitMapBackend::gif(path, (map.width, map.height), delay_ms)
            .map_err(backend_err)?
            .into_drawing_area();
        for k in 0..frames {
            let t = k as f64 / fps as f64;
            root.fill(&rgb(self.background)).map_err(backend_err)?;
            for item in frame_items(scene, t) {
                self.draw_item(&root, &map, &item)?;
            }
            root.present().map_err(backend_err)?;
            if k % (fps as usize * 5) == 0 {
                debug!("frame {}/{} (t = {:.2} s)", k + 1, frames, t);
            }
        }
        info!("File ready at {}", path.display());
        Ok(RenderSummary {
            scene: scene.name.clone(),
            path: path.to_path_buf(),
            frames,
            duration,
            quality: self.quality,
        })
    }
}
