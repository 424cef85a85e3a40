#[cfg(test)]
mod tests {
    use crate::Animation::matrix_box::{
        MatrixBoxStyle, make_bullets, make_default_bullets, make_matrix_box,
    };
    use crate::Animation::primitives::{
        Arrow, Axes, Color, EDGE_BUFF, FRAME_HEIGHT, FRAME_WIDTH, LineSegment, Mobject, Point3,
        PolygonShape, Shape, TextItem,
    };
    use crate::Animation::rank_scenes::{MatrixRankGeometry, SceneScript, scene_by_name};
    use crate::Animation::renderer::{
        GifRenderer, RenderError, RenderQuality, SceneRenderer, frame_count, frame_items,
        output_path,
    };
    use crate::Animation::scene::{Animation, CameraOrientation, Scene, Step, smooth};
    use approx::assert_relative_eq;
    use std::path::Path;

    fn text(s: &str, font: f64) -> Mobject {
        Mobject::from(TextItem::new(s, font))
    }

    fn line_of(m: &Mobject) -> &LineSegment {
        match m {
            Mobject::Line(l) => l,
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn text_metrics() {
        let t = TextItem::new("abcd", 20.0);
        let (w, h) = t.size();
        assert_relative_eq!(w, 4.0 * 0.55 * 0.2, epsilon = 1e-12);
        assert_relative_eq!(h, 0.2, epsilon = 1e-12);
        let two = TextItem::new("ab\ncdef", 20.0);
        let (w, h) = two.size();
        assert_relative_eq!(w, 4.0 * 0.55 * 0.2, epsilon = 1e-12);
        assert_relative_eq!(h, 2.0 * 0.2 + 0.2 * 0.2, epsilon = 1e-12);
        assert!(TextItem::new("", 20.0).bounds().is_none());
    }

    #[test]
    fn next_to_places_with_buffer() {
        let a = text("aa", 100.0);
        let b = text("b", 100.0).next_to(&a, Point3::RIGHT, 0.25);
        let bb = b.extent();
        assert_relative_eq!(bb.left(), 0.55 + 0.25, epsilon = 1e-12);
        assert_relative_eq!(bb.center().y, 0.0, epsilon = 1e-12);

        let below = text("cccc", 100.0).next_to_aligned(&a, Point3::DOWN, 0.5, Point3::LEFT);
        let e = below.extent();
        assert_relative_eq!(e.left(), a.extent().left(), epsilon = 1e-12);
        assert_relative_eq!(e.top(), a.extent().bottom() - 0.5, epsilon = 1e-12);
    }

    #[test]
    fn to_edge_respects_frame_buffer() {
        let up = text("Title", 40.0).to_edge(Point3::UP).extent();
        assert_relative_eq!(up.top(), FRAME_HEIGHT / 2.0 - EDGE_BUFF, epsilon = 1e-12);
        assert_relative_eq!(up.center().x, 0.0, epsilon = 1e-12);
        let down = text("one\ntwo", 20.0).to_edge(Point3::DOWN).extent();
        assert_relative_eq!(down.bottom(), -(FRAME_HEIGHT / 2.0 - EDGE_BUFF), epsilon = 1e-12);
        let left = text("x", 20.0).to_edge(Point3::LEFT).extent();
        assert_relative_eq!(left.left(), -(FRAME_WIDTH / 2.0 - EDGE_BUFF), epsilon = 1e-12);
    }

    #[test]
    fn scale_changes_font_and_keeps_center() {
        let m = text("abc", 28.0).move_to(Point3::new(1.0, 2.0, 0.0)).scale(0.9);
        match &m {
            Mobject::Text(t) => assert_relative_eq!(t.font_size, 25.2, epsilon = 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        assert_relative_eq!(m.center().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.center().y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn grid_rows_are_padded_and_left_aligned() {
        let values = vec![vec![1, 2, 3], vec![4], vec![5, 60]];
        let m = make_matrix_box(&values, &MatrixBoxStyle::default());
        assert_eq!(m.rows().len(), 3);
        let first_left = m.rows()[0].extent().left();
        for row in m.rows() {
            match row {
                Mobject::Group(g) => assert_eq!(g.children.len(), 3),
                other => panic!("row is not a group: {:?}", other),
            }
            assert_relative_eq!(row.extent().left(), first_left, epsilon = 1e-12);
        }
        // rows go downwards, v_pad apart
        let r0 = m.rows()[0].extent();
        let r1 = m.rows()[1].extent();
        assert_relative_eq!(r1.top(), r0.bottom() - 0.25, epsilon = 1e-12);
    }

    #[test]
    fn cells_are_h_pad_apart() {
        let m = make_matrix_box(&[vec![7, 8]], &MatrixBoxStyle::default());
        let Mobject::Group(row) = &m.rows()[0] else {
            panic!("row is not a group");
        };
        let a = row.children[0].extent();
        let b = row.children[1].extent();
        assert_relative_eq!(b.left() - a.right(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn brackets_bound_the_grid_exactly() {
        for scale in [1.0, 2.0] {
            let style = MatrixBoxStyle {
                bracket_scale: scale,
                ..MatrixBoxStyle::default()
            };
            let m = make_matrix_box(&[vec![1, 0, 1], vec![0, 1, 1], vec![0, 0, 0]], &style);
            let grid = Mobject::from(m.grid.clone()).extent();
            let pad = 0.15 * scale;
            let cap = 0.25 * scale;

            let left = line_of(&m.left_bracket.children[0]);
            assert_relative_eq!(left.start.x, grid.left() - pad, epsilon = 1e-12);
            assert_relative_eq!(left.end.x, grid.left() - pad, epsilon = 1e-12);
            assert_relative_eq!(left.start.y, grid.top(), epsilon = 1e-12);
            assert_relative_eq!(left.end.y, grid.bottom(), epsilon = 1e-12);
            let left_cap = line_of(&m.left_bracket.children[1]);
            assert_relative_eq!(left_cap.end.x, grid.left() - pad + cap, epsilon = 1e-12);

            let right = line_of(&m.right_bracket.children[0]);
            assert_relative_eq!(right.start.x, grid.right() + pad, epsilon = 1e-12);
            assert_relative_eq!(right.start.y, grid.top(), epsilon = 1e-12);
            assert_relative_eq!(right.end.y, grid.bottom(), epsilon = 1e-12);
            let right_cap = line_of(&m.right_bracket.children[2]);
            assert_relative_eq!(right_cap.end.x, grid.right() + pad - cap, epsilon = 1e-12);
            assert_relative_eq!(right_cap.end.y, grid.bottom(), epsilon = 1e-12);
        }
    }

    #[test]
    fn bullets_stack_with_aligned_left_edges() {
        let g = make_default_bullets(&["first point", "second"]);
        assert_eq!(g.children.len(), 2);
        match &g.children[1] {
            Mobject::Text(t) => {
                assert_eq!(t.text, "• second");
                assert_relative_eq!(t.font_size, 24.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        let a = g.children[0].extent();
        let b = g.children[1].extent();
        assert_relative_eq!(a.left(), b.left(), epsilon = 1e-12);
        assert_relative_eq!(b.top(), a.bottom() - 0.25, epsilon = 1e-12);

        let custom = make_bullets(&["a"], 30.0, 0.1, "-");
        match &custom.children[0] {
            Mobject::Text(t) => assert_eq!(t.text, "- a"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn axes_map_coordinates() {
        let axes = Axes::new([-1.0, 3.0, 1.0], [-1.0, 3.0, 1.0])
            .scale(1.5)
            .move_to(Point3::RIGHT * 2.0);
        let o = axes.c2p(0.0, 0.0, 0.0);
        assert_relative_eq!(o.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(o.y, -1.5, epsilon = 1e-12);
        let p = axes.c2p(2.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 3.5, epsilon = 1e-12);
        let b = axes.mobject().extent();
        assert_relative_eq!(b.center().x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(b.width(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn arrow_tip_is_at_most_a_quarter_of_the_length() {
        let short = Arrow::new(Point3::ORIGIN, Point3::RIGHT, Color::BLUE);
        assert_relative_eq!(short.effective_tip_length(), 0.25);
        let long = Arrow::new(Point3::ORIGIN, Point3::RIGHT * 4.0, Color::BLUE);
        assert_relative_eq!(long.effective_tip_length(), 0.35);
    }

    #[test]
    fn fades_follow_the_rate_function() {
        let mut scene = Scene::new("Fade");
        let id = scene.register(text("x", 20.0));
        scene.play(vec![Animation::FadeIn(id)]);
        scene.play(vec![Animation::FadeOut(id)]);
        assert_relative_eq!(scene.duration(), 2.0);

        assert_relative_eq!(smooth(0.5), 0.5);
        assert_relative_eq!(smooth(0.25), 0.15625);
        let v = scene.snapshot(0.25).get(id).copied().unwrap();
        assert_relative_eq!(v.opacity, 0.15625, epsilon = 1e-12);
        assert_relative_eq!(scene.snapshot(1.0).get(id).unwrap().opacity, 1.0);
        assert_relative_eq!(scene.snapshot(1.75).get(id).unwrap().opacity, 0.15625, epsilon = 1e-12);
        assert!(scene.snapshot(2.0).get(id).is_none());
    }

    #[test]
    fn create_and_write_track_progress() {
        let mut scene = Scene::new("Progress");
        let line = scene.register(LineSegment::new(Point3::ORIGIN, Point3::RIGHT));
        let short = scene.register(text("short", 20.0));
        let long = scene.register(text("a rather long explanation", 20.0));
        scene.play(vec![Animation::Create(line)]);
        scene.play(vec![Animation::Write(short)]);
        scene.play(vec![Animation::Write(long)]);
        let run_times: Vec<f64> = scene.steps().iter().map(Step::duration).collect();
        assert_eq!(run_times, vec![1.0, 1.0, 2.0]);

        let v = scene.snapshot(0.5).get(line).copied().unwrap();
        assert_relative_eq!(v.progress, 0.5);
        assert_relative_eq!(v.opacity, 1.0);
        // objects stay after their animation completes
        let snap = scene.snapshot(10.0);
        assert_eq!(snap.visible.len(), 3);
        assert!(snap.visible.iter().all(|v| v.progress == 1.0));
    }

    #[test]
    fn camera_projection() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let flat = CameraOrientation::default().project(p);
        assert_relative_eq!(flat.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(flat.y, 2.0, epsilon = 1e-12);

        let tilted = CameraOrientation::from_degrees(65.0, -45.0);
        let z = tilted.project(Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(z.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.y, (65.0f64).to_radians().sin(), epsilon = 1e-12);
    }

    #[test]
    fn fixed_in_frame_objects_ignore_the_camera() {
        let mut scene = Scene::new("Hud");
        let hud = scene.register(text("hud", 20.0).move_to(Point3::new(1.0, 1.0, 0.0)));
        let world = scene.register(LineSegment::new(Point3::ORIGIN, Point3::RIGHT));
        let tag = scene.register(text("tag", 20.0).move_to(Point3::RIGHT));
        scene.add_fixed_in_frame(&[hud]);
        scene.add_fixed_orientation(&[tag]);
        let camera = CameraOrientation::from_degrees(65.0, -45.0);

        assert_eq!(
            scene.screen_mobject(hud, &camera),
            scene.mobject(hud).cloned()
        );
        let moved = scene.screen_mobject(world, &camera).unwrap();
        assert_ne!(Some(&moved), scene.mobject(world));
        // label follows the projected anchor, keeps its size
        let Some(Mobject::Text(t)) = scene.screen_mobject(tag, &camera) else {
            panic!("label lost");
        };
        let expected = camera.project(Point3::RIGHT);
        assert_relative_eq!(t.center.x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(t.center.y, expected.y, epsilon = 1e-12);
        assert_relative_eq!(t.font_size, 20.0);
    }

    #[test]
    fn rank_scene_timeline() {
        let scene = MatrixRankGeometry.build();
        assert_eq!(scene.name, "MatrixRankGeometry");
        assert!(matches!(scene.steps()[0], Step::Add(_)));
        let cameras: Vec<usize> = scene
            .steps()
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Step::SetCamera(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(cameras.len(), 1);
        let waits = scene
            .steps()
            .iter()
            .filter(|s| matches!(s, Step::Wait(w) if *w == 2.0))
            .count();
        assert_eq!(waits, 3);
        assert_relative_eq!(scene.duration(), 29.0, epsilon = 1e-9);

        // camera change happens before the 3D arrows enter the stage; v3 = v1 + v2 is the green one
        let first_arrow_3d = scene
            .entries()
            .iter()
            .position(|e| matches!(e.mobject, Mobject::Arrow(ref a) if a.color == Color::GREEN))
            .unwrap();
        let added_at = scene
            .steps()
            .iter()
            .position(|s| matches!(s, Step::Add(ids) if ids.iter().any(|id| id.index() == first_arrow_3d)))
            .unwrap();
        assert!(cameras[0] < added_at);

        // after the two 2D scenes only the new title is visible, the 3D matrix starts fading in
        let shown: Vec<_> = frame_items(&scene, 22.0)
            .into_iter()
            .filter(|i| i.opacity > 0.0)
            .collect();
        assert_eq!(shown.len(), 1);
        match &shown[0].shape {
            Mobject::Text(t) => assert_eq!(t.text, "Rank Deficient in 3D (rank = 2)"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(scene_by_name("Unknown").is_none());
    }

    #[test]
    fn frame_items_are_sorted_by_z() {
        let scene = MatrixRankGeometry.build();
        // first scene during the wait: everything is on stage
        let items = frame_items(&scene, 8.5);
        assert!(items.windows(2).all(|w| w[0].z_index <= w[1].z_index));
        assert!(items.iter().any(|i| i.z_index == 5));
        assert!(items.iter().all(|i| i.opacity == 1.0 && i.progress == 1.0));
    }

    #[test]
    fn frame_counts_and_paths() {
        assert_eq!(frame_count(29.0, RenderQuality::Low.fps()), 435);
        assert_eq!(frame_count(2.5, 15), 38);
        assert_eq!(frame_count(0.0, 60), 0);
        assert_eq!(RenderQuality::Medium.dir_name(), "720p30");
        assert_eq!(RenderQuality::High.dir_name(), "1080p60");
        assert_eq!(
            output_path(Path::new("media"), RenderQuality::Low, "MatrixRankGeometry"),
            Path::new("media/videos/rank_scenes/480p15/MatrixRankGeometry.gif")
        );
    }

    #[test]
    fn renders_a_small_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos").join("Tiny.gif");
        let mut scene = Scene::new("Tiny");
        let line = scene.register(LineSegment::new(Point3::LEFT, Point3::RIGHT));
        let arrow = scene.register(Arrow::new(Point3::ORIGIN, Point3::UP * 2.0, Color::RED));
        let square = scene.register(
            PolygonShape::new(vec![
                Point3::ORIGIN,
                Point3::RIGHT,
                Point3::new(1.0, 1.0, 0.0),
                Point3::UP,
            ])
            .with_fill(Color::YELLOW, 0.2),
        );
        scene.play_for(
            vec![
                Animation::Create(line),
                Animation::GrowArrow(arrow),
                Animation::FadeIn(square),
            ],
            0.2,
        );
        let renderer = GifRenderer {
            resolution: Some((64, 36)),
            ..GifRenderer::new(RenderQuality::Low)
        };
        let summary = renderer.render(&scene, &path).unwrap();
        assert_eq!(summary.frames, 3);
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn empty_scene_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let scene = Scene::new("Nothing");
        let err = GifRenderer::new(RenderQuality::Low)
            .render(&scene, &dir.path().join("Nothing.gif"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyScene(_)));
    }
}
