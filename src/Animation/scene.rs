//! # Scene
//!
//! A [`Scene`] is a registry of objects plus an ordered timeline of [`Step`]s. Objects are
//! registered first (they are not visible yet) and then enter the frame through `add` or
//! through an animation that introduces them (`FadeIn`, `Create`, `GrowArrow`, `Write`).
//! `FadeOut` removes its target once it completes.
//!
//! [`Scene::snapshot`] replays the timeline up to a time and returns what is on stage with
//! per-object opacity and drawing progress; the renderer turns snapshots into frames.
use super::primitives::{Mobject, Point3, Shape};
use std::f64::consts::PI;

pub const DEGREES: f64 = PI / 180.0;
/// run time of a `play` without an explicit one
pub const DEFAULT_RUN_TIME: f64 = 1.0;
/// `Write` of an object with this many glyphs or more takes twice as long
const LONG_WRITE_GLYPHS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MobjectId(usize);

impl MobjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    FadeIn(MobjectId),
    FadeOut(MobjectId),
    /// draws strokes progressively
    Create(MobjectId),
    /// grows an arrow from its start point
    GrowArrow(MobjectId),
    /// reveals text glyph by glyph
    Write(MobjectId),
}

impl Animation {
    pub fn target(&self) -> MobjectId {
        match *self {
            Animation::FadeIn(id)
            | Animation::FadeOut(id)
            | Animation::Create(id)
            | Animation::GrowArrow(id)
            | Animation::Write(id) => id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Animation::FadeIn(_) => "FadeIn",
            Animation::FadeOut(_) => "FadeOut",
            Animation::Create(_) => "Create",
            Animation::GrowArrow(_) => "GrowArrow",
            Animation::Write(_) => "Write",
        }
    }
}

/// Camera direction in spherical angles (radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrientation {
    /// polar angle from the +z axis
    pub phi: f64,
    /// azimuth of the camera around z
    pub theta: f64,
}

impl Default for CameraOrientation {
    /// looking straight down the z axis, x to the right
    fn default() -> Self {
        Self {
            phi: 0.0,
            theta: -90.0 * DEGREES,
        }
    }
}

impl CameraOrientation {
    pub fn from_degrees(phi: f64, theta: f64) -> Self {
        Self {
            phi: phi * DEGREES,
            theta: theta * DEGREES,
        }
    }

    /// orthographic projection to the frame plane (z of the result is depth)
    pub fn project(&self, p: Point3) -> Point3 {
        let a = -(self.theta + PI / 2.0);
        let (sa, ca) = a.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        let x1 = p.x * ca - p.y * sa;
        let y1 = p.x * sa + p.y * ca;
        Point3::new(x1, y1 * cp + p.z * sp, p.z * cp - y1 * sp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Add(Vec<MobjectId>),
    Remove(Vec<MobjectId>),
    Play {
        animations: Vec<Animation>,
        run_time: f64,
    },
    Wait(f64),
    SetCamera(CameraOrientation),
}

impl Step {
    pub fn duration(&self) -> f64 {
        match self {
            Step::Play { run_time, .. } => *run_time,
            Step::Wait(s) => *s,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    pub mobject: Mobject,
    /// drawn in frame coordinates, unaffected by the camera (titles, HUD)
    pub fixed_in_frame: bool,
    /// position follows the camera, shape stays facing the viewer (labels in 3D)
    pub fixed_orientation: bool,
}

/// One object on stage at a given time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visible {
    pub id: MobjectId,
    pub opacity: f64,
    /// share of the object drawn, 1 when complete
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub camera: CameraOrientation,
    /// in the order the objects entered the stage
    pub visible: Vec<Visible>,
}

impl Snapshot {
    pub fn get(&self, id: MobjectId) -> Option<&Visible> {
        self.visible.iter().find(|v| v.id == id)
    }

    fn upsert(&mut self, id: MobjectId, opacity: f64, progress: f64) {
        match self.visible.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.opacity = opacity;
                v.progress = progress;
            }
            None => self.visible.push(Visible {
                id,
                opacity,
                progress,
            }),
        }
    }

    fn remove(&mut self, id: MobjectId) {
        self.visible.retain(|v| v.id != id);
    }

    fn apply(&mut self, animation: &Animation, alpha: f64) {
        let id = animation.target();
        match animation {
            Animation::FadeIn(_) => self.upsert(id, alpha, 1.0),
            Animation::FadeOut(_) => {
                if alpha >= 1.0 {
                    self.remove(id)
                } else {
                    self.upsert(id, 1.0 - alpha, 1.0)
                }
            }
            Animation::Create(_) | Animation::GrowArrow(_) | Animation::Write(_) => {
                self.upsert(id, 1.0, alpha)
            }
        }
    }
}

/// `3t^2 - 2t^3`, eases in and out
pub fn smooth(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub name: String,
    entries: Vec<SceneEntry>,
    steps: Vec<Step>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// stores an object without putting it on stage
    pub fn register<M: Into<Mobject>>(&mut self, mobject: M) -> MobjectId {
        self.entries.push(SceneEntry {
            mobject: mobject.into(),
            fixed_in_frame: false,
            fixed_orientation: false,
        });
        MobjectId(self.entries.len() - 1)
    }

    pub fn entry(&self, id: MobjectId) -> Option<&SceneEntry> {
        self.entries.get(id.0)
    }

    pub fn mobject(&self, id: MobjectId) -> Option<&Mobject> {
        self.entry(id).map(|e| &e.mobject)
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn add(&mut self, ids: &[MobjectId]) {
        self.steps.push(Step::Add(ids.to_vec()));
    }

    pub fn remove(&mut self, ids: &[MobjectId]) {
        self.steps.push(Step::Remove(ids.to_vec()));
    }

    pub fn add_fixed_in_frame(&mut self, ids: &[MobjectId]) {
        for id in ids {
            if let Some(e) = self.entries.get_mut(id.0) {
                e.fixed_in_frame = true;
            }
        }
    }

    pub fn add_fixed_orientation(&mut self, ids: &[MobjectId]) {
        for id in ids {
            if let Some(e) = self.entries.get_mut(id.0) {
                e.fixed_orientation = true;
            }
        }
    }

    fn glyph_count(&self, id: MobjectId) -> usize {
        self.mobject(id)
            .map(|m| {
                m.leaves()
                    .iter()
                    .map(|leaf| match leaf {
                        Mobject::Text(t) => t.text.chars().filter(|c| !c.is_whitespace()).count(),
                        _ => 1,
                    })
                    .sum()
            })
            .unwrap_or(0)
    }

    fn default_run_time(&self, animations: &[Animation]) -> f64 {
        animations
            .iter()
            .map(|a| match a {
                Animation::Write(id) if self.glyph_count(*id) >= LONG_WRITE_GLYPHS => 2.0,
                _ => DEFAULT_RUN_TIME,
            })
            .fold(DEFAULT_RUN_TIME, f64::max)
    }

    /// plays animations together; long `Write`s take 2 s, everything else 1 s
    pub fn play(&mut self, animations: Vec<Animation>) {
        let run_time = self.default_run_time(&animations);
        self.play_for(animations, run_time);
    }

    pub fn play_for(&mut self, animations: Vec<Animation>, run_time: f64) {
        self.steps.push(Step::Play {
            animations,
            run_time,
        });
    }

    pub fn wait(&mut self, seconds: f64) {
        self.steps.push(Step::Wait(seconds));
    }

    pub fn set_camera_orientation(&mut self, camera: CameraOrientation) {
        self.steps.push(Step::SetCamera(camera));
    }

    /// total running time in seconds
    pub fn duration(&self) -> f64 {
        self.steps.iter().map(Step::duration).sum()
    }

    /// state of the stage at time `t` (seconds from the start)
    pub fn snapshot(&self, t: f64) -> Snapshot {
        let mut snap = Snapshot {
            camera: CameraOrientation::default(),
            visible: Vec::new(),
        };
        let mut clock = 0.0;
        for step in &self.steps {
            match step {
                Step::Add(ids) => {
                    for id in ids {
                        if snap.get(*id).is_none() {
                            snap.upsert(*id, 1.0, 1.0);
                        }
                    }
                }
                Step::Remove(ids) => ids.iter().for_each(|id| snap.remove(*id)),
                Step::SetCamera(camera) => snap.camera = *camera,
                Step::Wait(s) => {
                    if t < clock + s {
                        return snap;
                    }
                    clock += s;
                }
                Step::Play {
                    animations,
                    run_time,
                } => {
                    if t < clock + run_time {
                        let alpha = smooth((t - clock) / run_time);
                        animations.iter().for_each(|a| snap.apply(a, alpha));
                        return snap;
                    }
                    animations.iter().for_each(|a| snap.apply(a, 1.0));
                    clock += run_time;
                }
            }
        }
        snap
    }

    /// the object as it appears on screen under `camera`
    pub fn screen_mobject(&self, id: MobjectId, camera: &CameraOrientation) -> Option<Mobject> {
        let entry = self.entry(id)?;
        let mut m = entry.mobject.clone();
        if entry.fixed_in_frame {
            return Some(m);
        }
        if entry.fixed_orientation {
            let anchor = m.center();
            let projected = camera.project(anchor);
            return Some(m.shift(Point3::new(projected.x, projected.y, anchor.z) - anchor));
        }
        m.map_points(&|p| camera.project(p));
        Some(m)
    }
}
