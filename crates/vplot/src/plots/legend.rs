//! Legends listing labeled plots.

use glam::DVec2;
use vplot_core::{ColorInput, PlotError, PlotResult, process_color};
use vplot_renderer::{Actor, ActorKind, LegendActor, LegendEntry, LegendSymbol};

use super::DEFAULT_COLOR;
use crate::figure::Figure;
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

#[derive(Debug, Clone)]
pub struct Legend {
    plot: Plot,
}

plot_handle!(Legend);

impl Legend {
    fn with_legend<R>(&self, f: impl FnOnce(&mut LegendActor) -> R) -> PlotResult<R> {
        self.with_actor_mut(|a| match &mut a.kind {
            ActorKind::Legend(legend) => Ok(f(legend)),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn entries(&self) -> PlotResult<Vec<LegendEntry>> {
        self.with_legend(|l| l.entries.clone())
    }

    /// Add an entry unless one with the same label exists.
    pub fn add_entry(&self, label: impl Into<String>, color: impl Into<ColorInput>, symbol: LegendSymbol) -> PlotResult<bool> {
        let entry = LegendEntry {
            label: label.into(),
            color: process_color(Some(&color.into()))?.rgb.unwrap_or(DEFAULT_COLOR),
            symbol,
        };
        self.with_legend(|l| push_unique(&mut l.entries, entry))
    }

    /// Re-read the labeled plots of the figure, keeping explicit entries.
    pub fn refresh(&self) -> PlotResult<()> {
        let figure = self.fig().ok_or_else(|| PlotError::FigureClosed("<dropped>".to_string()))?;
        let mut entries = labeled_entries(&figure, Some(self.actor_id()))?;
        let previous = self.entries()?;
        for entry in previous {
            push_unique(&mut entries, entry);
        }
        self.with_legend(|l| l.entries = entries)
    }
}

fn push_unique(entries: &mut Vec<LegendEntry>, entry: LegendEntry) -> bool {
    if entries.iter().any(|e| e.label == entry.label) {
        return false;
    }
    entries.push(entry);
    true
}

/// One entry per distinct label, in plot order; the first plot with a label
/// decides its color and symbol.
fn labeled_entries(figure: &Figure, skip: Option<vplot_renderer::ActorId>) -> PlotResult<Vec<LegendEntry>> {
    let state = figure.open()?;
    let mut entries = Vec::new();
    for entry in &state.plots {
        let Some(label) = &entry.label else { continue };
        if Some(entry.actor) == skip {
            continue;
        }
        let Some(actor) = state.actor(entry.actor) else { continue };
        push_unique(
            &mut entries,
            LegendEntry {
                label: label.clone(),
                color: actor.property.color,
                symbol: entry.kind.legend_symbol(),
            },
        );
    }
    Ok(entries)
}

/// A legend box, filled from the figure's labeled plots
#[derive(Debug, Clone)]
pub struct LegendBuilder {
    entries: Vec<(String, ColorInput, LegendSymbol)>,
    auto_fill: bool,
    position: DVec2,
    size: DVec2,
    options: PlotOptions,
}

impl Default for LegendBuilder {
    fn default() -> Self {
        let defaults = LegendActor::default();
        Self {
            entries: Vec::new(),
            auto_fill: true,
            position: defaults.position,
            size: defaults.size,
            options: PlotOptions::default(),
        }
    }
}

impl LegendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit entry after the labeled plots
    pub fn entry(mut self, label: impl Into<String>, color: impl Into<ColorInput>, symbol: LegendSymbol) -> Self {
        self.entries.push((label.into(), color.into(), symbol));
        self
    }

    /// Fill from labeled plots (on by default)
    pub fn auto_fill(mut self, on: bool) -> Self {
        self.auto_fill = on;
        self
    }

    /// Lower-left corner as a fraction of the window
    pub fn position(mut self, position: impl Into<DVec2>) -> Self {
        self.position = position.into();
        self
    }

    /// Width and height as a fraction of the window
    pub fn size(mut self, size: impl Into<DVec2>) -> Self {
        self.size = size.into();
        self
    }
}

impl PlotBuilder for LegendBuilder {
    type Output = Legend;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Legend> {
        let explicit = self
            .entries
            .iter()
            .map(|(label, color, symbol)| {
                Ok(LegendEntry {
                    label: label.clone(),
                    color: process_color(Some(color))?.rgb.unwrap_or(DEFAULT_COLOR),
                    symbol: *symbol,
                })
            })
            .collect::<PlotResult<Vec<_>>>()?;
        let (rgb, alpha) = self.options.resolve_color(super::DEFAULT_TEXT_COLOR)?;
        let figure = self.options.figure()?;

        let mut entries = if self.auto_fill {
            labeled_entries(&figure, None)?
        } else {
            Vec::new()
        };
        for entry in explicit {
            push_unique(&mut entries, entry);
        }
        if entries.is_empty() {
            tracing::warn!("Legend has no entries");
        }

        let actor = Actor::new(ActorKind::Legend(LegendActor {
            entries,
            position: self.position,
            size: self.size,
        }))
        .with_color(rgb)
        .with_opacity(alpha);
        let plot = self.options.attach(&figure, actor, PlotKind::Legend)?;
        Ok(Legend { plot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;
    use crate::plots::{LinesBuilder, SphereBuilder};

    #[test]
    fn test_auto_fill_dedups_by_label() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        SphereBuilder::new(vec![[0.0; 3], [1.0; 3]])
            .color(vec!["red", "blue"])
            .label("points")
            .fig(&fig)
            .build()
            .unwrap();
        LinesBuilder::new(vec![[0.0; 3], [1.0; 3]])
            .color("green")
            .label("path")
            .fig(&fig)
            .build()
            .unwrap();
        SphereBuilder::new([2.0, 2.0, 2.0]).fig(&fig).build().unwrap();

        let legend = LegendBuilder::new()
            .entry("extra", "black", LegendSymbol::Square)
            .entry("path", "white", LegendSymbol::Square)
            .fig(&fig)
            .build()
            .unwrap();
        let entries = legend.entries().unwrap();
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["points", "path", "extra"]);
        assert_eq!(entries[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(entries[0].symbol, LegendSymbol::Circle);
        assert_eq!(entries[1].symbol, LegendSymbol::Line);
    }

    #[test]
    fn test_refresh_picks_up_new_labels() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let legend = LegendBuilder::new()
            .entry("fixed", "red", LegendSymbol::Square)
            .fig(&fig)
            .build()
            .unwrap();
        let sphere = SphereBuilder::new([0.0, 0.0, 0.0]).fig(&fig).build_one().unwrap();
        sphere.set_label("ball").unwrap();
        legend.refresh().unwrap();
        let labels: Vec<String> = legend.entries().unwrap().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["ball", "fixed"]);
        assert!(!legend.add_entry("ball", "red", LegendSymbol::Circle).unwrap());
    }
}
