//! Global view collection. Owns every live view from intake to destroy.

use std::collections::HashMap;

use crate::surface::SurfaceId;

use super::{View, ViewId};

#[derive(Debug, Default)]
pub struct ViewCollection {
    next_id: u64,
    /// Newest first
    order: Vec<ViewId>,
    views: HashMap<ViewId, View>,
}

impl ViewCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_id(&mut self) -> ViewId {
        self.next_id += 1;
        ViewId(self.next_id)
    }

    pub(crate) fn insert(&mut self, view: View) {
        let id = view.id();
        assert!(
            !self.views.contains_key(&id),
            "{} inserted into the view collection twice",
            id
        );
        self.order.insert(0, id);
        self.views.insert(id, view);
    }

    pub(crate) fn remove(&mut self, id: ViewId) -> Option<View> {
        let view = self.views.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(view)
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn by_surface(&self, surface: SurfaceId) -> Option<&View> {
        self.iter().find(|view| view.surface() == surface)
    }

    /// Views newest first
    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.order.iter().filter_map(|id| self.views.get(id))
    }

    /// Ids of mapped views, newest first
    pub fn mapped_ids(&self) -> Vec<ViewId> {
        self.iter()
            .filter(|view| view.is_mapped())
            .map(View::id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
