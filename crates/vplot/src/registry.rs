//! The current figure and the history of every figure created.
//!
//! Figures are used from one event-loop thread, so the registry is
//! thread-local: each thread has its own current figure.

use std::cell::RefCell;

use vplot_core::{PlotConfig, PlotError, PlotResult};

use crate::figure::{Figure, FigureBuilder, WeakFigure};

struct Registry {
    current: Option<Figure>,
    history: Vec<WeakFigure>,
    auto_figure: bool,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry {
        current: None,
        history: Vec::new(),
        auto_figure: PlotConfig::global().figure.auto_figure,
    });
}

/// Record a new figure; it becomes current if no figure is.
pub(crate) fn register(figure: &Figure) {
    REGISTRY.with_borrow_mut(|r| {
        r.history.push(figure.downgrade());
        if r.current.is_none() {
            r.current = Some(figure.clone());
        }
    });
}

/// Get the current figure, creating one if auto-figure is on.
pub fn gcf() -> PlotResult<Figure> {
    if let Some(current) = current() {
        return Ok(current);
    }
    if !is_auto_figure() {
        return Err(PlotError::NoCurrentFigure);
    }
    let figure = FigureBuilder::new().build()?;
    scf(&figure);
    Ok(figure)
}

/// The current figure without creating one
pub fn current() -> Option<Figure> {
    REGISTRY.with_borrow(|r| r.current.clone())
}

/// Set the current figure.
pub fn scf(figure: &Figure) {
    REGISTRY.with_borrow_mut(|r| r.current = Some(figure.clone()));
}

/// Unset the current figure if it is `figure`. Returns whether it was.
pub(crate) fn release_current(figure: &Figure) -> bool {
    REGISTRY.with_borrow_mut(|r| {
        if r.current.as_ref() == Some(figure) {
            r.current = None;
            true
        } else {
            false
        }
    })
}

/// Toggle whether `gcf()` may create figures on demand.
pub fn auto_figure(on: bool) {
    REGISTRY.with_borrow_mut(|r| r.auto_figure = on);
}

pub fn is_auto_figure() -> bool {
    REGISTRY.with_borrow(|r| r.auto_figure)
}

/// Close `figure`, or the current figure when `None`.
pub fn close(figure: Option<&Figure>) {
    let target = figure.cloned().or_else(current);
    if let Some(figure) = target {
        figure.close();
    }
}

/// Every figure created on this thread that is still alive, oldest first.
pub fn figures() -> Vec<Figure> {
    REGISTRY.with_borrow(|r| r.history.iter().filter_map(WeakFigure::upgrade).collect())
}

/// Close every live figure. Used between tests.
pub fn close_all() {
    for figure in figures() {
        figure.close();
    }
    REGISTRY.with_borrow_mut(|r| r.current = None);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test runs on its own thread, so the registry starts empty.

    #[test]
    fn test_gcf_creates_once() {
        let a = gcf().unwrap();
        let b = gcf().unwrap();
        assert_eq!(a, b);
        assert_eq!(figures().len(), 1);
    }

    #[test]
    fn test_close_current_unsets_it() {
        let f = FigureBuilder::new().headless().build().unwrap();
        assert_eq!(current(), Some(f.clone()));
        close(None);
        assert!(current().is_none());
        assert!(f.is_closed());
        // History keeps the closed figure.
        assert_eq!(figures(), vec![f]);
    }

    #[test]
    fn test_close_other_keeps_current() {
        let f1 = FigureBuilder::new().headless().build().unwrap();
        let f2 = FigureBuilder::new().headless().build().unwrap();
        close(Some(&f2));
        assert_eq!(current(), Some(f1));
    }

    #[test]
    fn test_auto_figure_off() {
        auto_figure(false);
        assert_eq!(gcf(), Err(PlotError::NoCurrentFigure));
        auto_figure(true);
        assert!(gcf().is_ok());
    }

    #[test]
    fn test_scf_switches() {
        let f1 = FigureBuilder::new().headless().build().unwrap();
        let f2 = FigureBuilder::new().headless().build().unwrap();
        scf(&f2);
        assert_eq!(gcf().unwrap(), f2);
        assert!(!release_current(&f1));
        close_all();
        assert!(f1.is_closed() && f2.is_closed());
    }
}
