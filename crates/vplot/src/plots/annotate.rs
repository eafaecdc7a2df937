//! Text labels pointing at the highest point of a set of points.

use glam::DVec3;
use vplot_core::{
    ArrayArg, ColorInput, PlotError, PlotResult, arrow_transform, highest, normalise, process_color,
};

use super::{Arrow, ArrowBuilder, Text3D, Text3DBuilder};
use crate::plot::{PlotBuilder, PlotOptions};

/// The text and arrow of an annotation
#[derive(Debug, Clone)]
pub struct Annotation {
    pub text: Text3D,
    pub arrow: Arrow,
}

/// Places `text` at `distance` beyond the highest point along `direction`
/// with an arrow back to that point
#[derive(Debug, Clone)]
pub struct AnnotateBuilder {
    points: ArrayArg,
    text: String,
    direction: DVec3,
    arrow_color: Option<ColorInput>,
    distance: f64,
    text_size: f64,
    options: PlotOptions,
}

impl AnnotateBuilder {
    pub fn new(points: impl Into<ArrayArg>, text: impl Into<String>) -> Self {
        Self {
            points: points.into(),
            text: text.into(),
            direction: DVec3::Z,
            arrow_color: None,
            distance: 1.0,
            text_size: 0.2,
            options: PlotOptions::default(),
        }
    }

    pub fn direction(mut self, direction: impl Into<DVec3>) -> Self {
        self.direction = direction.into();
        self
    }

    /// Alias of `color`: the text color
    pub fn text_color(mut self, color: impl Into<ColorInput>) -> Self {
        self.options.color = Some(color.into());
        self
    }

    pub fn arrow_color(mut self, color: impl Into<ColorInput>) -> Self {
        self.arrow_color = Some(color.into());
        self
    }

    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Height of the text in world units
    pub fn text_size(mut self, size: f64) -> Self {
        self.text_size = size;
        self
    }
}

impl PlotBuilder for AnnotateBuilder {
    type Output = Annotation;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Annotation> {
        let direction = normalise(self.direction)?;
        let points = self.points.to_points("points")?;
        let (_, peak) = highest(&points, direction)
            .ok_or_else(|| PlotError::shape("points", self.points.shape(), "at least one point"))?;
        let label_at = peak + direction * self.distance;

        // Both plots are validated before either is attached.
        arrow_transform(label_at, peak - label_at, self.distance.abs())?;
        process_color(self.arrow_color.as_ref())?;
        self.options.resolve_color(super::DEFAULT_TEXT_COLOR)?;
        let figure = self.options.figure()?;

        let mut text = Text3DBuilder::new(self.text, label_at).scale(self.text_size);
        *text.options_mut() = PlotOptions {
            fig: Some(figure.clone()),
            ..self.options.clone()
        };
        let text = text.build()?;

        let mut arrow = ArrowBuilder::new(label_at, peak).fig(&figure);
        if let Some(color) = self.arrow_color {
            arrow = arrow.color(color);
        }
        if let Some(opacity) = self.options.opacity {
            arrow = arrow.opacity(opacity);
        }
        let arrow = match arrow.build_one() {
            Ok(arrow) => arrow,
            Err(e) => {
                if let Err(remove) = figure.remove_plot(&text) {
                    tracing::debug!("Failed to detach annotation text: {}", remove);
                }
                return Err(e);
            }
        };

        Ok(Annotation { text, arrow })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::figure::FigureBuilder;

    #[test]
    fn test_label_above_highest_point() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let annotation = AnnotateBuilder::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 2.0], [0.0, 1.0, 1.0]],
            "summit",
        )
        .distance(0.5)
        .arrow_color("red")
        .fig(&fig)
        .build()
        .unwrap();

        let position = annotation.text.position().unwrap();
        assert_eq!(position, DVec3::new(1.0, 0.0, 2.5));
        assert_eq!(annotation.arrow.color().unwrap(), [1.0, 0.0, 0.0]);
        let tip = annotation
            .arrow
            .transform()
            .unwrap()
            .transform_point3(DVec3::X);
        assert_relative_eq!(tip.z, 2.0, epsilon = 1e-12);
        assert_eq!(fig.plots().len(), 2);
    }

    #[test]
    fn test_bad_arrow_color_adds_nothing() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let result = AnnotateBuilder::new([0.0, 0.0, 0.0], "x")
            .arrow_color("no such color")
            .fig(&fig)
            .build();
        assert!(matches!(result, Err(PlotError::UnknownColor(_))));
        assert!(fig.plots().is_empty());
    }

    #[test]
    fn test_zero_distance_adds_nothing() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let before = fig.plots().len();
        let result = AnnotateBuilder::new(vec![[0.0, 0.0, 0.0]], "x")
            .distance(0.0)
            .fig(&fig)
            .build();
        assert!(matches!(result, Err(PlotError::ShapeMismatch { .. })));
        assert_eq!(fig.plots().len(), before);
        assert_eq!(fig.actor_count(), 0);
    }

    #[test]
    fn test_negative_distance_points_back() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let annotation = AnnotateBuilder::new([0.0, 0.0, 1.0], "below")
            .distance(-2.0)
            .fig(&fig)
            .build()
            .unwrap();
        assert_eq!(annotation.text.position().unwrap(), DVec3::new(0.0, 0.0, -1.0));
        let tip = annotation
            .arrow
            .transform()
            .unwrap()
            .transform_point3(DVec3::X);
        assert_relative_eq!(tip.z, 1.0, epsilon = 1e-12);
    }
}
