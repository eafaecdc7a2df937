//! Interactors: how a figure runs (or does not run) an event loop.

#[cfg(feature = "gui")]
mod native;

#[cfg(feature = "gui")]
pub use native::NativeInteractor;

use vplot_core::{PlotConfig, PlotError, PlotResult, headless_forced};

use crate::capabilities::Capabilities;
use crate::figure::Figure;

/// Drives a figure's event loop
pub trait Interactor: Send {
    fn name(&self) -> &'static str;

    /// Prepare the interactor. Called once, on the first `show`.
    fn initialize(&mut self) -> PlotResult<()> {
        Ok(())
    }

    /// Run the event loop until the user closes the window.
    ///
    /// Called without the figure locked.
    fn start(&mut self, figure: &Figure) -> PlotResult<()>;

    /// Release the interactor. Must be idempotent.
    fn terminate(&mut self) {}
}

/// No window at all: `start` returns straight away
#[derive(Debug, Default)]
pub struct HeadlessInteractor;

impl Interactor for HeadlessInteractor {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn start(&mut self, figure: &Figure) -> PlotResult<()> {
        tracing::debug!("Headless figure '{}': no event loop to run", figure.name());
        Ok(())
    }
}

/// The host application owns the event loop; the figure is painted by a
/// widget inside it
#[derive(Debug, Default)]
pub struct EmbeddedInteractor;

impl Interactor for EmbeddedInteractor {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn start(&mut self, figure: &Figure) -> PlotResult<()> {
        tracing::debug!("Figure '{}' is embedded; the host runs the event loop", figure.name());
        Ok(())
    }
}

/// Which interactor a new figure gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractorChoice {
    /// Native window when a display is available, headless otherwise
    #[default]
    Auto,
    Headless,
    /// Native window; fails with [`PlotError::Unavailable`] without a display
    Native,
    Embedded,
}

impl InteractorChoice {
    pub(crate) fn create(self) -> PlotResult<Box<dyn Interactor>> {
        match self {
            InteractorChoice::Headless => Ok(Box::new(HeadlessInteractor)),
            InteractorChoice::Embedded => Ok(Box::new(EmbeddedInteractor)),
            InteractorChoice::Native => native(),
            InteractorChoice::Auto => {
                let headless = PlotConfig::global().figure.headless || headless_forced();
                if !headless && Capabilities::detect().gui {
                    native()
                } else {
                    Ok(Box::new(HeadlessInteractor))
                }
            }
        }
    }
}

#[cfg(feature = "gui")]
fn native() -> PlotResult<Box<dyn Interactor>> {
    if Capabilities::detect().gui {
        Ok(Box::new(NativeInteractor::default()))
    } else {
        Err(PlotError::Unavailable("a native window (no display)".to_string()))
    }
}

#[cfg(not(feature = "gui"))]
fn native() -> PlotResult<Box<dyn Interactor>> {
    Err(PlotError::Unavailable(
        "a native window (built without the `gui` feature)".to_string(),
    ))
}
