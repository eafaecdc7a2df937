//! The plot handle shared by every plot kind.
//!
//! A [`Plot`] is a non-owning handle: the figure owns the plot's actor and
//! bookkeeping, the handle addresses them by id. Attributes such as color
//! and visibility are read from and written to the actor directly, so they
//! always reflect what will be drawn.

use glam::DMat4;
use parking_lot::MutexGuard;
use uuid::Uuid;
use vplot_core::{ColorInput, ColorSpec, PlotError, PlotResult, broadcast_colors, process_color_opacity};
use vplot_renderer::{Actor, ActorId, LegendSymbol, SharedLookupTable};

use crate::figure::{Figure, FigureState, PlotEntry, WeakFigureState};
use crate::registry;

/// Identity of a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotId(Uuid);

impl PlotId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a plot's geometry is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotVariant {
    /// A procedural source feeds the mapper
    Sourced,
    /// Explicit vertices and cells feed the mapper
    Constructed,
    /// A specialized actor with no mapper
    ActorOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Arrow,
    Lines,
    Mesh,
    Polygon,
    Sphere,
    Cursor,
    Surface,
    Text,
    Text3D,
    ScalarBar,
    Legend,
    ImageOverlay,
}

impl PlotKind {
    pub fn variant(self) -> PlotVariant {
        match self {
            PlotKind::Arrow | PlotKind::Sphere | PlotKind::Cursor | PlotKind::Text3D => {
                PlotVariant::Sourced
            }
            PlotKind::Lines | PlotKind::Mesh | PlotKind::Polygon | PlotKind::Surface => {
                PlotVariant::Constructed
            }
            PlotKind::Text | PlotKind::ScalarBar | PlotKind::Legend | PlotKind::ImageOverlay => {
                PlotVariant::ActorOnly
            }
        }
    }

    /// Marker used for this kind in a legend
    pub fn legend_symbol(self) -> LegendSymbol {
        match self {
            PlotKind::Sphere => LegendSymbol::Circle,
            PlotKind::Cursor => LegendSymbol::Cross,
            PlotKind::Lines => LegendSymbol::Line,
            PlotKind::Arrow => LegendSymbol::Arrow,
            _ => LegendSymbol::Square,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlotKind::Arrow => "arrow",
            PlotKind::Lines => "lines",
            PlotKind::Mesh => "mesh",
            PlotKind::Polygon => "polygon",
            PlotKind::Sphere => "sphere",
            PlotKind::Cursor => "cursor",
            PlotKind::Surface => "surface",
            PlotKind::Text => "text",
            PlotKind::Text3D => "text3d",
            PlotKind::ScalarBar => "scalar bar",
            PlotKind::Legend => "legend",
            PlotKind::ImageOverlay => "image overlay",
        }
    }
}

/// Handle to a plot owned by a figure
#[derive(Clone)]
pub struct Plot {
    id: PlotId,
    actor: ActorId,
    kind: PlotKind,
    figure: WeakFigureState,
}

impl PartialEq for Plot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for Plot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plot")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("actor", &self.actor)
            .finish()
    }
}

impl Plot {
    pub(crate) fn from_entry(entry: &PlotEntry, figure: WeakFigureState) -> Self {
        Self {
            id: entry.id,
            actor: entry.actor,
            kind: entry.kind,
            figure,
        }
    }

    pub fn id(&self) -> PlotId {
        self.id
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn variant(&self) -> PlotVariant {
        self.kind.variant()
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor
    }

    /// The owning figure, while it is alive
    pub fn fig(&self) -> Option<Figure> {
        self.figure.upgrade().map(Figure::from_state)
    }

    fn live_figure(&self) -> PlotResult<Figure> {
        self.fig()
            .ok_or_else(|| PlotError::FigureClosed("<dropped>".to_string()))
    }

    /// Run `f` with the owning figure locked, failing if it is gone or closed.
    fn with_state<R>(
        &self,
        f: impl FnOnce(&mut MutexGuard<'_, FigureState>) -> PlotResult<R>,
    ) -> PlotResult<R> {
        let figure = self.live_figure()?;
        let mut state = figure.open()?;
        f(&mut state)
    }

    /// Read the plot's actor.
    pub(crate) fn with_actor<R>(&self, f: impl FnOnce(&Actor) -> R) -> PlotResult<R> {
        self.with_state(|state| {
            let actor = state.actor(self.actor).ok_or(PlotError::PlotRemoved)?;
            Ok(f(actor))
        })
    }

    /// Change the plot's actor and schedule a redraw.
    pub(crate) fn with_actor_mut<R>(&self, f: impl FnOnce(&mut Actor) -> R) -> PlotResult<R> {
        self.with_state(|state| {
            let actor = state.actor_mut(self.actor).ok_or(PlotError::PlotRemoved)?;
            let result = f(actor);
            state.scene.mark_dirty();
            state.request_redraw();
            Ok(result)
        })
    }

    fn with_entry_mut<R>(&self, f: impl FnOnce(&mut PlotEntry) -> R) -> PlotResult<R> {
        self.with_state(|state| {
            let entry = state.entry_mut(self.id).ok_or(PlotError::PlotRemoved)?;
            Ok(f(entry))
        })
    }

    pub fn color(&self) -> PlotResult<[f64; 3]> {
        self.with_actor(|a| a.property.color)
    }

    /// Set the color. An RGBA value also sets the opacity.
    pub fn set_color(&self, color: impl Into<ColorInput>) -> PlotResult<()> {
        let spec = process_color_opacity(Some(&color.into()), None)?;
        self.with_actor_mut(|a| apply_color(a, spec))
    }

    pub fn opacity(&self) -> PlotResult<f64> {
        self.with_actor(|a| a.property.opacity)
    }

    pub fn set_opacity(&self, opacity: f64) -> PlotResult<()> {
        self.with_actor_mut(|a| a.property.opacity = opacity)
    }

    pub fn visible(&self) -> PlotResult<bool> {
        self.with_actor(|a| a.visible)
    }

    pub fn set_visible(&self, visible: bool) -> PlotResult<()> {
        self.with_actor_mut(|a| a.visible = visible)
    }

    pub fn name(&self) -> PlotResult<Option<String>> {
        self.with_state(|state| {
            let entry = state.entry(self.id).ok_or(PlotError::PlotRemoved)?;
            Ok(entry.name.clone())
        })
    }

    pub fn set_name(&self, name: impl Into<String>) -> PlotResult<()> {
        let name = name.into();
        self.with_entry_mut(|e| e.name = Some(name))
    }

    /// Text shown for this plot in a legend
    pub fn label(&self) -> PlotResult<Option<String>> {
        self.with_state(|state| {
            let entry = state.entry(self.id).ok_or(PlotError::PlotRemoved)?;
            Ok(entry.label.clone())
        })
    }

    pub fn set_label(&self, label: impl Into<String>) -> PlotResult<()> {
        let label = label.into();
        self.with_entry_mut(|e| e.label = Some(label))
    }

    /// Whether the plot's actor is in its figure's scene
    pub fn is_attached(&self) -> bool {
        self.with_state(|state| Ok(state.scene.contains(self.actor)))
            .unwrap_or(false)
    }

    /// Model matrix of the actor under the figure's current camera
    pub fn model_matrix(&self) -> PlotResult<DMat4> {
        self.with_state(|state| {
            let camera = state.scene.camera().clone();
            let actor = state.actor(self.actor).ok_or(PlotError::PlotRemoved)?;
            Ok(actor.model_matrix(&camera).unwrap_or(DMat4::IDENTITY))
        })
    }

    /// The lookup table of the plot's mapper, if it has one
    pub fn lookup_table(&self) -> PlotResult<Option<SharedLookupTable>> {
        self.with_actor(|a| a.mapper().map(|m| m.lookup_table().clone()))
    }

    /// Detach the plot from its figure. See [`Figure::remove_plot`].
    pub fn remove(&self) -> PlotResult<bool> {
        self.live_figure()?.remove_plot(self)
    }
}

fn apply_color(actor: &mut Actor, spec: ColorSpec) {
    if let Some(rgb) = spec.rgb {
        actor.property.color = rgb;
    }
    if let Some(alpha) = spec.alpha {
        actor.property.opacity = alpha;
    }
}

/// Arguments every plot kind accepts
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    pub color: Option<ColorInput>,
    pub opacity: Option<f64>,
    /// Figure to plot into; the current figure when unset
    pub fig: Option<Figure>,
    pub label: Option<String>,
    pub name: Option<String>,
}

impl PlotOptions {
    /// The target figure: the explicit one, else the current figure.
    pub(crate) fn figure(&self) -> PlotResult<Figure> {
        match &self.fig {
            Some(fig) => Ok(fig.clone()),
            None => registry::gcf(),
        }
    }

    /// Color and opacity for a single plot.
    pub(crate) fn resolve_color(&self, default: [f64; 3]) -> PlotResult<([f64; 3], f64)> {
        Ok(process_color_opacity(self.color.as_ref(), self.opacity)?.or(default, 1.0))
    }

    /// One color and opacity per element of `shape`.
    pub(crate) fn broadcast_colors(
        &self,
        shape: &[usize],
        default: [f64; 3],
    ) -> PlotResult<Vec<([f64; 3], f64)>> {
        Ok(broadcast_colors(self.color.as_ref(), shape)?
            .into_iter()
            .map(|spec| spec.with_opacity(self.opacity).or(default, 1.0))
            .collect())
    }

    /// Hand `actor` to `figure` as a new plot.
    pub(crate) fn attach(&self, figure: &Figure, actor: Actor, kind: PlotKind) -> PlotResult<Plot> {
        figure.attach(actor, kind, self.name.clone(), self.label.clone())
    }
}

/// Builder shared by every plot kind.
pub trait PlotBuilder: Sized {
    type Output;

    fn options_mut(&mut self) -> &mut PlotOptions;

    /// Resolve the arguments, build the actor(s) and add them to the figure.
    fn build(self) -> PlotResult<Self::Output>;

    fn color(mut self, color: impl Into<ColorInput>) -> Self {
        self.options_mut().color = Some(color.into());
        self
    }

    fn opacity(mut self, opacity: f64) -> Self {
        self.options_mut().opacity = Some(opacity);
        self
    }

    fn fig(mut self, fig: &Figure) -> Self {
        self.options_mut().fig = Some(fig.clone());
        self
    }

    fn label(mut self, label: impl Into<String>) -> Self {
        self.options_mut().label = Some(label.into());
        self
    }

    fn name(mut self, name: impl Into<String>) -> Self {
        self.options_mut().name = Some(name.into());
        self
    }
}

/// The single element of a broadcast build.
pub(crate) fn single<T>(mut items: Vec<T>, what: &str) -> PlotResult<T> {
    match items.len() {
        1 => Ok(items.remove(0)),
        n => Err(PlotError::shape(what, &[n], "exactly one element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;
    use vplot_renderer::{Mapper, Source, SphereSource};

    fn sphere_plot(fig: &Figure) -> Plot {
        let actor = Actor::geometry(Mapper::from_source(Source::Sphere(SphereSource::default())));
        PlotOptions::default()
            .attach(fig, actor, PlotKind::Sphere)
            .unwrap()
    }

    #[test]
    fn test_variants() {
        assert_eq!(PlotKind::Sphere.variant(), PlotVariant::Sourced);
        assert_eq!(PlotKind::Mesh.variant(), PlotVariant::Constructed);
        assert_eq!(PlotKind::ScalarBar.variant(), PlotVariant::ActorOnly);
        assert_eq!(PlotKind::Cursor.legend_symbol(), LegendSymbol::Cross);
    }

    #[test]
    fn test_live_attributes() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let plot = sphere_plot(&fig);
        assert_eq!(plot.fig(), Some(fig.clone()));

        plot.set_color("red").unwrap();
        assert_eq!(plot.color().unwrap(), [1.0, 0.0, 0.0]);
        plot.set_color([0.0, 0.0, 1.0, 0.5]).unwrap();
        assert_eq!(plot.opacity().unwrap(), 0.5);
        assert!(plot.set_color("nope").is_err());
        assert_eq!(plot.color().unwrap(), [0.0, 0.0, 1.0]);

        plot.set_visible(false).unwrap();
        assert!(!plot.visible().unwrap());
        plot.set_name("ball").unwrap();
        assert_eq!(plot.name().unwrap().as_deref(), Some("ball"));
    }

    #[test]
    fn test_remove_and_readd() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let plot = sphere_plot(&fig);
        assert!(plot.remove().unwrap());
        assert!(!plot.remove().unwrap());
        assert!(!plot.is_attached());
        assert!(fig.plots().is_empty());
        // Attributes stay reachable while detached.
        plot.set_color("green").unwrap();

        assert!(fig.add_plot(&plot).unwrap());
        assert!(!fig.add_plot(&plot).unwrap());
        assert!(plot.is_attached());
        assert_eq!(fig.plots(), vec![plot]);
    }

    #[test]
    fn test_foreign_plot_is_ignored() {
        let a = FigureBuilder::new().headless().build().unwrap();
        let b = FigureBuilder::new().headless().build().unwrap();
        let plot = sphere_plot(&a);
        plot.remove().unwrap();
        assert!(!b.add_plot(&plot).unwrap());
        assert!(!b.remove_plot(&plot).unwrap());
    }

    #[test]
    fn test_closed_figure_errors() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let plot = sphere_plot(&fig);
        fig.close();
        assert!(matches!(plot.color(), Err(PlotError::FigureClosed(_))));
        drop(fig);
        assert!(plot.fig().is_none());
        assert!(matches!(plot.visible(), Err(PlotError::FigureClosed(_))));
    }

    #[test]
    fn test_broadcast_colors_default() {
        let options = PlotOptions {
            opacity: Some(0.3),
            ..Default::default()
        };
        let colors = options.broadcast_colors(&[2], [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(colors, vec![([1.0, 1.0, 1.0], 0.3); 2]);
    }

    #[test]
    fn test_single() {
        assert_eq!(single(vec![1], "x").unwrap(), 1);
        assert!(single(Vec::<i32>::new(), "x").is_err());
    }
}
