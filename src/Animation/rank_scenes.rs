//! Geometric meaning of matrix rank, told in three consecutive scenes:
//! a full-rank 2x2 matrix spanning the plane, a rank-1 2x2 matrix whose columns lie on a
//! line, and a rank-2 3x3 matrix whose columns lie in the xy plane.
use super::matrix_box::{MatrixBoxStyle, make_matrix_box};
use super::primitives::{
    Arrow, Axes, Color, LineSegment, Mobject, Point3, PolygonShape, TextItem,
};
use super::scene::{Animation, CameraOrientation, MobjectId, Scene};
use log::debug;

const TITLE_FONT: f64 = 40.0;
const LABEL_FONT: f64 = 20.0;
const LABEL_BACKGROUND_OPACITY: f64 = 0.85;
const LABEL_BACKGROUND_BUFF: f64 = 0.06;
const ARROW_Z: i32 = 3;
const LABEL_Z: i32 = 5;

/// A named scene built from a fixed script
pub trait SceneScript {
    fn name(&self) -> &'static str;
    /// appends the script's objects and steps to `scene`
    fn construct(&self, scene: &mut Scene);

    fn build(&self) -> Scene {
        let mut scene = Scene::new(self.name());
        self.construct(&mut scene);
        debug!(
            "scene {} built: {} objects, {} steps, {:.1} s",
            self.name(),
            scene.entries().len(),
            scene.steps().len(),
            scene.duration()
        );
        scene
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixRankGeometry;

pub fn available_scenes() -> Vec<&'static str> {
    vec![MatrixRankGeometry.name()]
}

pub fn scene_by_name(name: &str) -> Option<Box<dyn SceneScript>> {
    match name {
        "MatrixRankGeometry" => Some(Box::new(MatrixRankGeometry)),
        _ => None,
    }
}

/// title pinned to the top of the frame
fn title(scene: &mut Scene, text: &str) -> MobjectId {
    let title = Mobject::from(TextItem::new(text, TITLE_FONT)).to_edge(Point3::UP);
    let id = scene.register(title);
    scene.add(&[id]);
    scene.add_fixed_in_frame(&[id]);
    id
}

/// matrix in the upper left corner of the frame
fn matrix(scene: &mut Scene, values: &[Vec<i32>], font_size: f64) -> MobjectId {
    let style = MatrixBoxStyle::default().with_font_size(font_size);
    let m = Mobject::from(make_matrix_box(values, &style))
        .scale(0.9)
        .move_to(Point3::LEFT * 4.0 + Point3::UP * 2.0);
    let id = scene.register(m);
    scene.add_fixed_in_frame(&[id]);
    id
}

fn explanation(scene: &mut Scene, text: &str, font_size: f64) -> MobjectId {
    let e = Mobject::from(TextItem::new(text, font_size)).to_edge(Point3::DOWN);
    let id = scene.register(e);
    scene.add_fixed_in_frame(&[id]);
    id
}

fn label(text: &str, font_size: f64, color: Color) -> Mobject {
    Mobject::from(TextItem::new(text, font_size).with_color(color))
}

fn finish_label(label: Mobject) -> Mobject {
    label
        .with_background(LABEL_BACKGROUND_OPACITY, LABEL_BACKGROUND_BUFF)
        .with_z_index(LABEL_Z)
}

fn plane_axes(x_range: [f64; 3], y_range: [f64; 3]) -> Axes {
    Axes::new(x_range, y_range)
        .with_color(Color::GREY_A)
        .with_stroke_width(2.0)
        .scale(1.5)
        .move_to(Point3::RIGHT * 2.0)
}

fn fade_out_all(ids: &[MobjectId]) -> Vec<Animation> {
    ids.iter().map(|id| Animation::FadeOut(*id)).collect()
}

impl MatrixRankGeometry {
    fn show_full_rank(&self, scene: &mut Scene) {
        let title = title(scene, "Full Rank Matrix (rank = 2)");
        let matrix = matrix(scene, &[vec![2, 0], vec![0, 1]], 28.0);

        let axes = plane_axes([-1.0, 3.0, 1.0], [-1.0, 3.0, 1.0]);
        let origin = axes.c2p(0.0, 0.0, 0.0);
        let v1 = Mobject::from(Arrow::new(origin, axes.c2p(2.0, 0.0, 0.0), Color::BLUE))
            .with_z_index(ARROW_Z);
        let v2 = Mobject::from(Arrow::new(origin, axes.c2p(0.0, 1.0, 0.0), Color::RED))
            .with_z_index(ARROW_Z);
        let v1_label = finish_label(label("v₁", LABEL_FONT, Color::BLUE).next_to(
            &v1,
            Point3::DOWN,
            0.25,
        ));
        let v2_label = finish_label(label("v₂", LABEL_FONT, Color::RED).next_to(
            &v2,
            Point3::LEFT,
            0.25,
        ));
        let region = PolygonShape::new(vec![
            axes.c2p(0.0, 0.0, 0.0),
            axes.c2p(2.0, 0.0, 0.0),
            axes.c2p(2.0, 1.0, 0.0),
            axes.c2p(0.0, 1.0, 0.0),
        ])
        .with_fill(Color::YELLOW, 0.2)
        .with_stroke(Color::YELLOW, 3.0);

        let axes = scene.register(axes.mobject().with_z_index(1));
        let v1 = scene.register(v1);
        let v2 = scene.register(v2);
        let v1_label = scene.register(v1_label);
        let v2_label = scene.register(v2_label);
        let region = scene.register(Mobject::from(region).with_z_index(2));

        scene.play(vec![Animation::FadeIn(matrix)]);
        scene.play(vec![Animation::Create(axes)]);
        scene.play(vec![Animation::GrowArrow(v1), Animation::FadeIn(v1_label)]);
        scene.play(vec![Animation::GrowArrow(v2), Animation::FadeIn(v2_label)]);
        scene.play(vec![Animation::FadeIn(region)]);

        let explanation = explanation(
            scene,
            "The columns are independent ⇒ they generate a 2D space (the plane).\n\
             rank(A) = 2 = number of columns.",
            20.0,
        );
        scene.play(vec![Animation::Write(explanation)]);
        scene.wait(2.0);

        scene.play(fade_out_all(&[axes, v1, v2, v1_label, v2_label, region]));
        scene.play(fade_out_all(&[title, matrix, explanation]));
    }

    fn show_rank_deficient(&self, scene: &mut Scene) {
        let title = title(scene, "Rank Deficient Matrix (rank = 1)");
        let matrix = matrix(scene, &[vec![2, 4], vec![1, 2]], 28.0);

        let axes = plane_axes([-1.0, 5.0, 1.0], [-1.0, 3.0, 1.0]);
        let origin = axes.c2p(0.0, 0.0, 0.0);
        let v1 = Mobject::from(Arrow::new(origin, axes.c2p(2.0, 1.0, 0.0), Color::BLUE))
            .with_z_index(ARROW_Z);
        let v2 = Mobject::from(Arrow::new(origin, axes.c2p(4.0, 2.0, 0.0), Color::RED))
            .with_z_index(ARROW_Z);
        let v1_label = finish_label(label("v₁", LABEL_FONT, Color::BLUE).next_to(
            &v1,
            Point3::DOWN,
            0.25,
        ));
        let v2_label = finish_label(label("v₂ = 2·v₁", LABEL_FONT, Color::RED).next_to(
            &v2,
            Point3::UP,
            0.25,
        ));
        let line = LineSegment::new(axes.c2p(-2.0, -1.0, 0.0), axes.c2p(6.0, 3.0, 0.0))
            .with_color(Color::YELLOW)
            .with_stroke_width(3.0);

        let axes = scene.register(axes.mobject().with_z_index(1));
        let v1 = scene.register(v1);
        let v2 = scene.register(v2);
        let v1_label = scene.register(v1_label);
        let v2_label = scene.register(v2_label);
        let line = scene.register(Mobject::from(line).with_z_index(2));

        scene.play(vec![Animation::FadeIn(matrix)]);
        scene.play(vec![Animation::Create(axes)]);
        scene.play(vec![Animation::GrowArrow(v1), Animation::FadeIn(v1_label)]);
        scene.play(vec![Animation::GrowArrow(v2), Animation::FadeIn(v2_label)]);
        scene.play(vec![Animation::Create(line)]);

        let explanation = explanation(
            scene,
            "v₂ is a multiple of v₁ ⇒ linear dependence.\n\
             Generated space = a 1D line.\n\
             rank(A) = 1 < number of columns.",
            20.0,
        );
        scene.play(vec![Animation::Write(explanation)]);
        scene.wait(2.0);

        scene.play(fade_out_all(&[axes, v1, v2, v1_label, v2_label, line]));
        scene.play(fade_out_all(&[title, matrix, explanation]));
    }

    fn show_rank_deficient_3d(&self, scene: &mut Scene) {
        title(scene, "Rank Deficient in 3D (rank = 2)");
        let matrix = matrix(
            scene,
            &[vec![1, 0, 1], vec![0, 1, 1], vec![0, 0, 0]],
            24.0,
        );

        let axes = Axes::three_d([-1.0, 3.0, 1.0], [-1.0, 3.0, 1.0], [-1.0, 1.0, 1.0])
            .with_stroke_width(2.0)
            .scale(1.2)
            .move_to(Point3::RIGHT * 2.0);

        scene.set_camera_orientation(CameraOrientation::from_degrees(65.0, -45.0));

        let origin = axes.c2p(0.0, 0.0, 0.0);
        let vectors = [
            (axes.c2p(1.0, 0.0, 0.0), Color::BLUE),
            (axes.c2p(0.0, 1.0, 0.0), Color::RED),
            (axes.c2p(1.0, 1.0, 0.0), Color::GREEN),
        ];
        let labels = [
            ("v₁", axes.c2p(1.1, 0.0, 0.0), Color::BLUE),
            ("v₂", axes.c2p(0.0, 1.1, 0.0), Color::RED),
            ("v₃ = v₁ + v₂", axes.c2p(1.1, 1.1, 0.0), Color::GREEN),
        ];
        let plane = PolygonShape::new(vec![
            axes.c2p(0.0, 0.0, 0.0),
            axes.c2p(2.0, 0.0, 0.0),
            axes.c2p(2.0, 2.0, 0.0),
            axes.c2p(0.0, 2.0, 0.0),
        ])
        .with_fill(Color::YELLOW, 0.12)
        .with_stroke(Color::YELLOW, 3.0);

        let axes = scene.register(axes.mobject().with_z_index(1));
        let arrows: Vec<MobjectId> = vectors
            .iter()
            .map(|(end, color)| {
                scene.register(Mobject::from(Arrow::new(origin, *end, *color)).with_z_index(ARROW_Z))
            })
            .collect();
        let label_ids: Vec<MobjectId> = labels
            .iter()
            .map(|(text, at, color)| {
                scene.register(finish_label(label(text, 22.0, *color).move_to(*at)))
            })
            .collect();
        scene.add_fixed_orientation(&label_ids);

        scene.play(vec![Animation::FadeIn(matrix)]);
        scene.play(vec![Animation::Create(axes)]);
        for arrow in &arrows {
            scene.add(&[*arrow]);
        }
        scene.play(label_ids.iter().map(|id| Animation::FadeIn(*id)).collect());

        let plane = scene.register(Mobject::from(plane).with_z_index(2));
        scene.add(&[plane]);

        let explanation = explanation(
            scene,
            "3 columns but v₃ = v₁ + v₂ ⇒ only 2 independent.\n\
             All live in the xy plane.\n\
             rank(A) = 2 < 3 columns.",
            18.0,
        );
        scene.play(vec![Animation::Write(explanation)]);
        scene.wait(2.0);
    }
}

impl SceneScript for MatrixRankGeometry {
    fn name(&self) -> &'static str {
        "MatrixRankGeometry"
    }

    fn construct(&self, scene: &mut Scene) {
        self.show_full_rank(scene);
        self.show_rank_deficient(scene);
        self.show_rank_deficient_3d(scene);
    }
}
