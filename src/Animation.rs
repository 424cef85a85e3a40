/// points, colors, text/line/arrow/polygon shapes, groups and axes
pub mod primitives;
/// text-only matrices with drawn brackets, bullet lists
pub mod matrix_box;
/// object registry, timeline of steps, camera
pub mod scene;
/// the matrix rank animation
/// # Examples
/// ```
/// use GeoSorb::Animation::rank_scenes::{SceneScript, scene_by_name};
/// use GeoSorb::Animation::renderer::{RenderQuality, frame_count, frame_items};
/// let script = scene_by_name("MatrixRankGeometry").unwrap();
/// let scene = script.build();
/// // three scenes, 29 s in total
/// assert!((scene.duration() - 29.0).abs() < 1e-9);
/// assert_eq!(frame_count(scene.duration(), RenderQuality::Low.fps()), 435);
/// // only the first title is visible at t = 0, the matrix starts fading in from zero
/// let shown = frame_items(&scene, 0.0).iter().filter(|i| i.opacity > 0.0).count();
/// assert_eq!(shown, 1);
/// ```
pub mod rank_scenes;
/// GIF output through plotters
pub mod renderer;
mod animation_tests;
