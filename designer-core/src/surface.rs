//! Render surface abstraction.
//!
//! The engine owns element records; a surface mirrors them into whatever
//! drawing library the host uses. Surfaces never feed state back.

use std::cell::RefCell;
use std::rc::Rc;

use crate::command::Command;
use crate::scene::Scene;

/// Trait for render surfaces.
pub trait RenderSurface {
    /// Mirror one applied command. `scene` already reflects it.
    fn materialize(&mut self, command: &Command, scene: &Scene);

    /// Schedule a repaint after a batch of commands.
    fn request_render(&mut self);
}

/// Surface that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn materialize(&mut self, _command: &Command, _scene: &Scene) {}

    fn request_render(&mut self) {}
}

/// Commands and repaint requests seen by a [`RecordingSurface`].
#[derive(Debug, Default, Clone)]
pub struct SurfaceLog {
    /// Every materialized command, in order.
    pub commands: Vec<Command>,
    /// Number of repaint requests.
    pub renders: usize,
}

/// Surface that records what it was asked to do.
///
/// The log is shared so it can be inspected after the surface is boxed
/// into a session.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    /// Create a surface with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the log.
    #[must_use]
    pub fn log(&self) -> Rc<RefCell<SurfaceLog>> {
        Rc::clone(&self.log)
    }
}

impl RenderSurface for RecordingSurface {
    fn materialize(&mut self, command: &Command, _scene: &Scene) {
        self.log.borrow_mut().commands.push(command.clone());
    }

    fn request_render(&mut self) {
        self.log.borrow_mut().renders += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;

    #[test]
    fn test_recording_surface_shares_log() {
        let surface = RecordingSurface::new();
        let log = surface.log();
        let mut boxed: Box<dyn RenderSurface> = Box::new(surface);

        let scene = Scene::new(10.0, 10.0);
        boxed.materialize(&Command::Remove { id: ElementId::new() }, &scene);
        boxed.request_render();

        assert_eq!(log.borrow().commands.len(), 1);
        assert_eq!(log.borrow().renders, 1);
    }
}
