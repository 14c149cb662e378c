//! Renderers that consume a [`RenderPlan`].
//!
//! The analysis pipeline never draws anything itself. It hands a finished [`RenderPlan`], and
//! optionally the LaTeX form of the equation, to a [`Presenter`]. A presenter that cannot render
//! what it is given returns [`RenderUnavailable`]; the caller still receives the plan.
//!
//! With the `cairo` feature enabled, [`CairoPresenter`] draws plans to PNG files.

#[cfg(feature = "cairo")]
mod canvas;
#[cfg(feature = "cairo")]
mod text_align;

#[cfg(feature = "cairo")]
pub use canvas::CairoPresenter;

use crate::{error::RenderUnavailable, plan::RenderPlan};

/// A renderer for plots.
pub trait Presenter {
    /// Shows the equation as typeset LaTeX, separately from the plot.
    fn render_title(&mut self, latex: &str) -> Result<(), RenderUnavailable>;

    /// Draws a plot.
    fn render_plan(&mut self, plan: &RenderPlan) -> Result<(), RenderUnavailable>;
}

/// A presenter with nothing attached. Every hand-off fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_title(&mut self, _: &str) -> Result<(), RenderUnavailable> {
        Err(RenderUnavailable::new("no renderer is attached"))
    }

    fn render_plan(&mut self, _: &RenderPlan) -> Result<(), RenderUnavailable> {
        Err(RenderUnavailable::new("no renderer is attached"))
    }
}

/// A presenter that keeps everything it is given.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    /// The LaTeX titles, in the order they were given.
    pub titles: Vec<String>,

    /// The plans, in the order they were given.
    pub plans: Vec<RenderPlan>,
}

impl Presenter for RecordingPresenter {
    fn render_title(&mut self, latex: &str) -> Result<(), RenderUnavailable> {
        self.titles.push(latex.to_string());
        Ok(())
    }

    fn render_plan(&mut self, plan: &RenderPlan) -> Result<(), RenderUnavailable> {
        self.plans.push(plan.clone());
        Ok(())
    }
}
