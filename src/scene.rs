//! A minimal scene: objects, a selection set and an active object.

use crate::errors::GridCutError;
use crate::object::{ApplyTransform, Object, ObjectData};
use std::fmt::Debug;
use tracing::debug;

/// Stable handle to an object in a [`Scene`]; objects are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone)]
pub struct Scene<S: Clone + Send + Sync + Debug> {
    objects: Vec<Object<S>>,
    selected: Vec<bool>,
    active: Option<ObjectId>,
}

impl<S: Clone + Send + Sync + Debug> Default for Scene<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + Debug> Scene<S> {
    pub const fn new() -> Self {
        Scene {
            objects: Vec::new(),
            selected: Vec::new(),
            active: None,
        }
    }

    /// Add an object, renaming it `name.001`, `name.002`, ... if the name is taken.
    /// The new object is neither selected nor active.
    pub fn add_object(&mut self, mut object: Object<S>) -> ObjectId {
        object.name = self.unique_name(&object.name);
        self.objects.push(object);
        self.selected.push(false);
        ObjectId(self.objects.len() - 1)
    }

    fn unique_name(&self, name: &str) -> String {
        if self.find(name).is_none() {
            return name.to_string();
        }
        // Number from the base name so "Cube.001" yields "Cube.002", not "Cube.001.001".
        let base = match name.rsplit_once('.') {
            Some((base, suffix))
                if suffix.len() == 3 && suffix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                base
            },
            _ => name,
        };
        (1..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| self.find(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object<S>> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object<S>> {
        self.objects.get_mut(id.0)
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn objects_mut(&mut self) -> &mut [Object<S>] {
        &mut self.objects
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object<S>)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().position(|o| o.name == name).map(ObjectId)
    }

    pub fn deselect_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    /// Add or remove one object from the selection. Unknown ids are ignored.
    pub fn select_set(&mut self, id: ObjectId, state: bool) {
        if let Some(s) = self.selected.get_mut(id.0) {
            *s = state;
        }
    }

    pub fn set_active(&mut self, id: Option<ObjectId>) {
        self.active = id.filter(|id| id.0 < self.objects.len());
    }

    /// Make `id` the only selected object and the active one.
    pub fn select(&mut self, id: ObjectId) {
        self.deselect_all();
        self.set_active(Some(id));
        self.select_set(id, true);
    }

    /// Replace the selection with exactly `ids`; the active object is left alone.
    pub fn set_selection(&mut self, ids: &[ObjectId]) {
        self.deselect_all();
        for &id in ids {
            self.select_set(id, true);
        }
    }

    pub const fn active(&self) -> Option<ObjectId> {
        self.active
    }

    pub fn active_object(&self) -> Option<&Object<S>> {
        self.active.and_then(|id| self.object(id))
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected.get(id.0).copied().unwrap_or(false)
    }

    /// Selected objects in scene order
    pub fn selected_objects(&self) -> Vec<ObjectId> {
        (0..self.objects.len())
            .filter(|&i| self.selected[i])
            .map(ObjectId)
            .collect()
    }

    /// Apply transforms on every selected object.
    pub fn apply_transforms_selected(&mut self, apply: ApplyTransform) -> Result<(), GridCutError> {
        for id in self.selected_objects() {
            self.objects[id.0].apply_transform(apply)?;
        }
        Ok(())
    }

    /// Separate the mesh of `id` into loose parts.
    ///
    /// The first part stays in `id`; every other part becomes a new object that
    /// copies the transform and is named after the source. All parts end up selected.
    /// Returns the ids of every part, `id` first.
    pub fn separate_loose(&mut self, id: ObjectId) -> Result<Vec<ObjectId>, GridCutError> {
        let source = self.objects.get_mut(id.0).ok_or(GridCutError::NoActiveObject)?;
        let mut parts = source.mesh()?.separate_loose().into_iter();
        let name = source.name.clone();
        let transform = source.transform;

        source.data = ObjectData::Mesh(parts.next().unwrap_or_default());
        self.select_set(id, true);

        let mut ids = vec![id];
        for part in parts {
            let new_id = self.add_object(Object::new_mesh(name.as_str(), part).with_transform(transform));
            self.select_set(new_id, true);
            ids.push(new_id);
        }

        debug!(object = %name, parts = ids.len(), "separated loose parts");
        Ok(ids)
    }
}
