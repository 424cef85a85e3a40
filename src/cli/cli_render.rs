use crate::Animation::rank_scenes::{available_scenes, scene_by_name};
use crate::Animation::renderer::{
    GifRenderer, RenderQuality, RenderSummary, SceneRenderer, output_path,
};
use crate::Utils::show_this_pic::open_with_default_viewer;
use crate::errors::GeoSorbError;
use crate::settings::AnimationConfig;
use clap::Args;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// scene to render
    pub scene: Option<String>,
    /// l = 480p15, m = 720p30, h = 1080p60
    #[arg(short, long, value_enum)]
    pub quality: Option<RenderQuality>,
    /// media directory receiving `videos/rank_scenes/<quality>/<Scene>.gif`
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// open the result with the default viewer
    #[arg(long)]
    pub open: bool,
}

impl RenderArgs {
    pub fn apply(&self, config: &mut AnimationConfig) {
        if let Some(scene) = &self.scene {
            config.scene = scene.clone();
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(dir) = &self.output {
            config.media_dir = dir.clone();
        }
    }
}

/// Builds the configured scene and writes it as a GIF
pub fn render_scene(config: &AnimationConfig) -> Result<RenderSummary, GeoSorbError> {
    let script = scene_by_name(&config.scene).ok_or_else(|| {
        GeoSorbError::UnknownScene(format!(
            "{} (available: {})",
            config.scene,
            available_scenes().join(", ")
        ))
    })?;
    let scene = script.build();
    let path = output_path(&config.media_dir, config.quality, script.name());
    let summary = GifRenderer::from_config(config).render(&scene, &path)?;
    Ok(summary)
}

pub fn run_render(config: &AnimationConfig, open: bool) -> Result<RenderSummary, GeoSorbError> {
    let summary = render_scene(config)?;
    info!(
        "{}: {} frames, {:.1} s, written to {}",
        summary.scene,
        summary.frames,
        summary.duration,
        summary.path.display()
    );
    if open {
        if let Err(e) = open_with_default_viewer(&summary.path) {
            warn!("cannot open {}: {}", summary.path.display(), e);
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scene_lists_the_available_ones() {
        let config = AnimationConfig {
            scene: "Spiral".to_string(),
            ..Default::default()
        };
        match render_scene(&config) {
            Err(GeoSorbError::UnknownScene(msg)) => assert!(msg.contains("MatrixRankGeometry")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = AnimationConfig::default();
        RenderArgs {
            quality: Some(RenderQuality::High),
            output: Some(PathBuf::from("out")),
            ..Default::default()
        }
        .apply(&mut config);
        assert_eq!(config.quality, RenderQuality::High);
        assert_eq!(config.media_dir, PathBuf::from("out"));
        assert_eq!(config.scene, "MatrixRankGeometry");
    }
}
