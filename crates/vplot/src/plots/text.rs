//! Screen-space and world-space text.

use glam::{DVec2, DVec3};
use vplot_core::{PlotConfig, PlotError, PlotResult};
use vplot_renderer::{Actor, ActorKind, Follower, Mapper, Source, TextActor, VectorTextSource};

use super::DEFAULT_TEXT_COLOR;
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

/// Text pinned to the window, positioned in pixels from the bottom-left
#[derive(Debug, Clone)]
pub struct Text {
    plot: Plot,
}

plot_handle!(Text);

impl Text {
    fn with_text<R>(&self, f: impl FnOnce(&mut TextActor) -> R) -> PlotResult<R> {
        self.with_actor_mut(|a| match &mut a.kind {
            ActorKind::Text(text) => Ok(f(text)),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn text(&self) -> PlotResult<String> {
        self.with_text(|t| t.text.clone())
    }

    pub fn set_text(&self, text: impl Into<String>) -> PlotResult<()> {
        let text = text.into();
        self.with_text(|t| t.text = text)
    }

    pub fn position(&self) -> PlotResult<DVec2> {
        self.with_text(|t| t.position)
    }

    pub fn set_position(&self, position: impl Into<DVec2>) -> PlotResult<()> {
        let position = position.into();
        self.with_text(|t| t.position = position)
    }

    pub fn font_size(&self) -> PlotResult<f64> {
        self.with_text(|t| t.font_size)
    }

    pub fn set_font_size(&self, size: f64) -> PlotResult<()> {
        self.with_text(|t| t.font_size = size)
    }
}

#[derive(Debug, Clone)]
pub struct TextBuilder {
    text: String,
    position: DVec2,
    font_size: Option<f64>,
    options: PlotOptions,
}

impl TextBuilder {
    pub fn new(text: impl Into<String>, position: impl Into<DVec2>) -> Self {
        Self {
            text: text.into(),
            position: position.into(),
            font_size: None,
            options: PlotOptions::default(),
        }
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }
}

impl PlotBuilder for TextBuilder {
    type Output = Text;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Text> {
        let (rgb, alpha) = self.options.resolve_color(DEFAULT_TEXT_COLOR)?;
        let figure = self.options.figure()?;
        let actor = Actor::new(ActorKind::Text(TextActor {
            text: self.text,
            position: self.position,
            font_size: self
                .font_size
                .unwrap_or(PlotConfig::global().quality.font_size as f64),
        }))
        .with_color(rgb)
        .with_opacity(alpha);
        let plot = self.options.attach(&figure, actor, PlotKind::Text)?;
        Ok(Text { plot })
    }
}

/// Text placed in the scene, optionally turning to face the camera
#[derive(Debug, Clone)]
pub struct Text3D {
    plot: Plot,
}

plot_handle!(Text3D);

impl Text3D {
    fn with_follower<R>(&self, f: impl FnOnce(&mut Follower) -> R) -> PlotResult<R> {
        self.with_actor_mut(|a| match &mut a.kind {
            ActorKind::Follower(follower) => Ok(f(follower)),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn text(&self) -> PlotResult<String> {
        self.with_follower(|f| match f.mapper.source() {
            Some(Source::VectorText(source)) => source.text.clone(),
            _ => String::new(),
        })
    }

    pub fn set_text(&self, text: impl Into<String>) -> PlotResult<()> {
        let text = text.into();
        self.with_follower(|f| {
            if let Some(Source::VectorText(source)) = f.mapper.source_mut() {
                source.text = text;
            }
        })
    }

    pub fn position(&self) -> PlotResult<DVec3> {
        self.with_follower(|f| f.position)
    }

    pub fn set_position(&self, position: impl Into<DVec3>) -> PlotResult<()> {
        let position = position.into();
        self.with_follower(|f| f.position = position)
    }

    pub fn scale(&self) -> PlotResult<f64> {
        self.with_follower(|f| f.scale)
    }

    pub fn set_scale(&self, scale: f64) -> PlotResult<()> {
        self.with_follower(|f| f.scale = scale)
    }

    pub fn follow_cam(&self) -> PlotResult<bool> {
        self.with_follower(|f| f.follow_camera)
    }

    pub fn set_follow_cam(&self, follow: bool) -> PlotResult<()> {
        self.with_follower(|f| f.follow_camera = follow)
    }
}

#[derive(Debug, Clone)]
pub struct Text3DBuilder {
    text: String,
    position: DVec3,
    follow_cam: bool,
    scale: f64,
    options: PlotOptions,
}

impl Text3DBuilder {
    pub fn new(text: impl Into<String>, position: impl Into<DVec3>) -> Self {
        Self {
            text: text.into(),
            position: position.into(),
            follow_cam: true,
            scale: 1.0,
            options: PlotOptions::default(),
        }
    }

    /// Keep the text facing the active camera (on by default)
    pub fn follow_cam(mut self, follow: bool) -> Self {
        self.follow_cam = follow;
        self
    }

    /// Height of one line of text in world units
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl PlotBuilder for Text3DBuilder {
    type Output = Text3D;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Text3D> {
        let (rgb, alpha) = self.options.resolve_color(DEFAULT_TEXT_COLOR)?;
        let figure = self.options.figure()?;
        let follower = Follower {
            mapper: Mapper::from_source(Source::VectorText(VectorTextSource::new(self.text))),
            position: self.position,
            scale: self.scale,
            follow_camera: self.follow_cam,
        };
        let actor = Actor::new(ActorKind::Follower(follower))
            .with_color(rgb)
            .with_opacity(alpha);
        let plot = self.options.attach(&figure, actor, PlotKind::Text3D)?;
        Ok(Text3D { plot })
    }
}
