//! Text labels drawn on top of a rendered frame.
//!
//! The rasterizer draws world-space text as stroke glyphs but leaves
//! screen-space text and scalar bar ticks out; frames carry those as labels
//! to paint, in pixel coordinates with the origin at the top-left.

use glam::DVec2;

use crate::actor::ActorKind;
use crate::raster::{legend_rect, scalar_bar_rect};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Top-left corner in pixels
    pub position: DVec2,
    /// Line height in pixels
    pub size: f64,
    pub color: [f64; 3],
}

/// Labels for every visible text-bearing actor, for a `width` x `height`
/// frame rendered at `scale` times the window size.
pub fn labels(scene: &Scene, width: u32, height: u32, scale: f64) -> Vec<Label> {
    let h = height as f64;
    let mut labels = Vec::new();

    for actor in scene.actors().filter(|a| a.visible) {
        let color = actor.property.color;
        match &actor.kind {
            ActorKind::Text(text) => {
                let size = text.font_size * scale;
                labels.push(Label {
                    text: text.text.clone(),
                    position: DVec2::new(text.position.x * scale, h - text.position.y * scale - size),
                    size,
                    color,
                });
            }
            ActorKind::ScalarBar(bar) => {
                let [x0, y0, x1, y1] = scalar_bar_rect(width, height);
                let size = 12.0 * scale;
                let [low, high] = bar.lookup_table.read().range();
                let count = bar.label_count.max(2);
                for i in 0..count {
                    let t = i as f64 / (count - 1) as f64;
                    let y = y1 as f64 - t * (y1 - y0) as f64 - size * 0.5;
                    labels.push(Label {
                        text: format_tick(low + t * (high - low)),
                        position: DVec2::new(x1 as f64 + 4.0 * scale, y),
                        size,
                        color,
                    });
                }
                if !bar.title.is_empty() {
                    labels.push(Label {
                        text: bar.title.clone(),
                        position: DVec2::new(x0 as f64, y0 as f64 - 2.0 * size),
                        size,
                        color,
                    });
                }
            }
            ActorKind::Legend(legend) if !legend.entries.is_empty() => {
                let [x0, y0, _, y1] = legend_rect(legend, width, height);
                let row = (y1 - y0) as f64 / legend.entries.len() as f64;
                let size = (row * 0.6).max(1.0);
                for (i, entry) in legend.entries.iter().enumerate() {
                    labels.push(Label {
                        text: entry.label.clone(),
                        position: DVec2::new(
                            x0 as f64 + 8.0 + size,
                            y0 as f64 + row * i as f64 + (row - size) * 0.5,
                        ),
                        size,
                        color: [0.0, 0.0, 0.0],
                    });
                }
            }
            _ => {}
        }
    }
    labels
}

fn format_tick(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e4 || value.abs() < 1e-2) {
        format!("{value:.2e}")
    } else {
        format!("{value:.3}")
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::actor::{Actor, Follower, TextActor};
    use crate::mapper::Mapper;
    use crate::source::{Source, VectorTextSource};

    #[test]
    fn test_text_label_flips_to_top_left() {
        let mut scene = Scene::new();
        scene.add_actor(Actor::new(ActorKind::Text(TextActor {
            text: "hello".into(),
            position: DVec2::new(10.0, 20.0),
            font_size: 18.0,
        })));
        let labels = labels(&scene, 200, 100, 2.0);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].position, DVec2::new(20.0, 100.0 - 40.0 - 36.0));
        assert_eq!(labels[0].size, 36.0);
    }

    #[test]
    fn test_followers_are_rasterized_not_labelled() {
        let mut scene = Scene::new();
        scene.add_actor(Actor::new(ActorKind::Follower(Follower {
            mapper: Mapper::from_source(Source::VectorText(VectorTextSource::new("p"))),
            position: DVec3::ZERO,
            scale: 0.1,
            follow_camera: true,
        })));
        assert!(labels(&scene, 100, 100, 1.0).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.5), "0.500");
        assert_eq!(format_tick(0.0), "0.000");
        assert_eq!(format_tick(12345.0), "1.23e4");
    }
}
