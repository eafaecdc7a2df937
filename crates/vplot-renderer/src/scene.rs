//! The scene: ordered actors, background and active camera.
//!
//! Actors render in insertion order. The scene is the single source of truth
//! for actor state; figures and plots address actors by [`ActorId`].

use vplot_core::BoundingBox;

use crate::actor::{Actor, ActorId};
use crate::camera::Camera;
use crate::observer::{SharedObserver, default_observer};

pub struct Scene {
    actors: Vec<Actor>,
    background: [f64; 3],
    background_alpha: f64,
    camera: Camera,
    observer: SharedObserver,
    dirty: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("actors", &self.actors.len())
            .field("background", &self.background)
            .field("camera", &self.camera)
            .finish()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            background: [0.0, 0.0, 0.0],
            background_alpha: 1.0,
            camera: Camera::default(),
            observer: default_observer(),
            dirty: true,
        }
    }

    /// Returns true if the scene has been modified since last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Adds an actor. Adding an id already present is a no-op.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        let id = actor.id();
        if !self.contains(id) {
            self.actors.push(actor);
            self.dirty = true;
        }
        id
    }

    /// Removes an actor, returning it if it was present.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let index = self.actors.iter().position(|a| a.id() == id)?;
        self.dirty = true;
        Some(self.actors.remove(index))
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.iter().any(|a| a.id() == id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// Gets a mutable reference to an actor, marking the scene dirty.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.dirty = true;
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    /// Actors in render order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Removes every actor.
    pub fn clear(&mut self) {
        self.actors.clear();
        self.dirty = true;
    }

    pub fn background(&self) -> [f64; 3] {
        self.background
    }

    pub fn set_background(&mut self, color: [f64; 3]) {
        self.background = color;
        self.dirty = true;
    }

    pub fn background_alpha(&self) -> f64 {
        self.background_alpha
    }

    pub fn set_background_alpha(&mut self, alpha: f64) {
        self.background_alpha = alpha;
        self.dirty = true;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        self.dirty = true;
        &mut self.camera
    }

    pub fn observer(&self) -> &SharedObserver {
        &self.observer
    }

    pub fn set_observer(&mut self, observer: SharedObserver) {
        self.observer = observer;
    }

    /// Computes the bounding box of all visible world-space actors.
    pub fn compute_bounds(&self) -> Option<BoundingBox> {
        self.compute_bounds_filtered(|_| true)
    }

    /// Like [`Scene::compute_bounds`], restricted to actors `include` accepts.
    pub fn compute_bounds_filtered(&self, include: impl Fn(&Actor) -> bool) -> Option<BoundingBox> {
        self.actors
            .iter()
            .filter(|a| a.visible && include(a))
            .filter_map(|a| a.world_bounds(&self.camera))
            .reduce(|acc, b| acc.union(&b))
    }

    /// Frame all visible actors. Leaves the camera alone on an empty scene.
    pub fn reset_camera(&mut self) {
        match self.compute_bounds() {
            Some(bounds) => {
                self.camera.reset(&bounds);
                self.dirty = true;
            }
            None => tracing::warn!("reset_camera on a scene with nothing to frame"),
        }
    }

    /// Route a backend error to the observer.
    pub fn report_error(&self, message: &str) {
        self.observer.on_error("scene", message);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::mapper::Mapper;
    use crate::source::{Source, SphereSource};

    fn sphere(center: DVec3) -> Actor {
        Actor::geometry(Mapper::from_source(Source::Sphere(SphereSource::new(center, 0.5))))
    }

    #[test]
    fn test_add_is_idempotent_and_ordered() {
        let mut scene = Scene::new();
        let a = sphere(DVec3::ZERO);
        let b = sphere(DVec3::X);
        let (id_a, id_b) = (a.id(), b.id());

        scene.add_actor(a.clone());
        scene.add_actor(b);
        scene.add_actor(a);

        let order: Vec<ActorId> = scene.actors().map(|a| a.id()).collect();
        assert_eq!(order, vec![id_a, id_b]);
    }

    #[test]
    fn test_remove() {
        let mut scene = Scene::new();
        let id = scene.add_actor(sphere(DVec3::ZERO));
        assert!(scene.remove_actor(id).is_some());
        assert!(scene.remove_actor(id).is_none());
        assert!(!scene.contains(id));
    }

    #[test]
    fn test_bounds_skip_hidden_actors() {
        let mut scene = Scene::new();
        scene.add_actor(sphere(DVec3::ZERO));
        let mut far = sphere(DVec3::splat(100.0));
        far.visible = false;
        scene.add_actor(far);

        let bounds = scene.compute_bounds().unwrap();
        assert!(bounds.max.x < 1.0);
    }

    #[test]
    fn test_reset_camera_on_empty_scene_keeps_camera() {
        let mut scene = Scene::new();
        let before = scene.camera().clone();
        scene.reset_camera();
        assert_eq!(scene.camera(), &before);
    }
}
