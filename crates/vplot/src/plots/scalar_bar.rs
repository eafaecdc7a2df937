//! Scalar bars showing the colormap of another plot.

use vplot_core::{PlotError, PlotResult};
use vplot_renderer::{Actor, ActorKind, ScalarBarActor};

use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

#[derive(Debug, Clone)]
pub struct ScalarBar {
    plot: Plot,
}

plot_handle!(ScalarBar);

impl ScalarBar {
    fn with_bar<R>(&self, f: impl FnOnce(&mut ScalarBarActor) -> R) -> PlotResult<R> {
        self.with_actor_mut(|a| match &mut a.kind {
            ActorKind::ScalarBar(bar) => Ok(f(bar)),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn title(&self) -> PlotResult<String> {
        self.with_bar(|b| b.title.clone())
    }

    pub fn set_title(&self, title: impl Into<String>) -> PlotResult<()> {
        let title = title.into();
        self.with_bar(|b| b.title = title)
    }

    /// The `[min, max]` shown, shared with the source plot
    pub fn range(&self) -> PlotResult<[f64; 2]> {
        self.with_bar(|b| b.lookup_table.read().range())
    }
}

/// A scalar bar for a plot that maps scalars through a lookup table
#[derive(Debug, Clone)]
pub struct ScalarBarBuilder {
    source: Plot,
    title: String,
    label_count: usize,
    options: PlotOptions,
}

impl ScalarBarBuilder {
    pub fn new(plot: impl AsRef<Plot>) -> Self {
        Self {
            source: plot.as_ref().clone(),
            title: String::new(),
            label_count: 5,
            options: PlotOptions::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Number of tick labels along the bar
    pub fn label_count(mut self, count: usize) -> Self {
        self.label_count = count;
        self
    }
}

impl PlotBuilder for ScalarBarBuilder {
    type Output = ScalarBar;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    /// The bar goes into the source plot's figure unless one is given.
    fn build(mut self) -> PlotResult<ScalarBar> {
        let lookup_table = self
            .source
            .lookup_table()?
            .ok_or_else(|| PlotError::Unavailable(format!("a colormap on a {} plot", self.source.kind().name())))?;
        if self.options.fig.is_none() {
            self.options.fig = self.source.fig();
        }
        let figure = self.options.figure()?;
        let (rgb, alpha) = self.options.resolve_color(super::DEFAULT_TEXT_COLOR)?;
        let actor = Actor::new(ActorKind::ScalarBar(ScalarBarActor {
            lookup_table,
            title: self.title,
            label_count: self.label_count,
        }))
        .with_color(rgb)
        .with_opacity(alpha);
        let plot = self.options.attach(&figure, actor, PlotKind::ScalarBar)?;
        Ok(ScalarBar { plot })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use vplot_core::TriangleMesh;

    use super::*;
    use crate::figure::FigureBuilder;
    use crate::plots::{MeshPlotBuilder, TextBuilder};
    use glam::DVec3;

    #[test]
    fn test_bar_shares_lookup_table() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let mesh = TriangleMesh::new(vec![[DVec3::ZERO, DVec3::X, DVec3::Y]]);
        let plot = MeshPlotBuilder::new(mesh)
            .scalars(Array2::from_shape_vec((1, 3), vec![0.0, 1.0, 2.0]).unwrap())
            .fig(&fig)
            .build()
            .unwrap();
        let bar = ScalarBarBuilder::new(&plot).title("height").build().unwrap();
        assert_eq!(bar.fig(), Some(fig.clone()));
        assert_eq!(bar.range().unwrap(), [0.0, 2.0]);

        plot.set_scalar_range([-1.0, 1.0]).unwrap();
        assert_eq!(bar.range().unwrap(), [-1.0, 1.0]);
        assert_eq!(bar.title().unwrap(), "height");
    }

    #[test]
    fn test_plot_without_mapper() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let text = TextBuilder::new("x", [0.0, 0.0]).fig(&fig).build().unwrap();
        assert!(matches!(
            ScalarBarBuilder::new(&text).build(),
            Err(PlotError::Unavailable(_))
        ));
    }
}
