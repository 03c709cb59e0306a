//! Renderable scene graph: a flat set of primitives addressed by node id.

use crate::shapes::Primitive;

/// Handle to a primitive registered in a [`Scene`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Flat scene graph
///
/// Removed slots are recycled, so a stale `NodeId` may later address a
/// different primitive. Callers drop ids when they remove nodes.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Primitive>>,
    free: Vec<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, primitive: Primitive) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(primitive);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(primitive));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Primitive> {
        let removed = self.nodes.get_mut(id.0)?.take();
        if removed.is_some() {
            self.free.push(id.0);
        }
        removed
    }

    pub fn get(&self, id: NodeId) -> Option<&Primitive> {
        self.nodes.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Primitive> {
        self.nodes.get_mut(id.0)?.as_mut()
    }

    /// Number of live primitives
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live primitives in insertion-slot order
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.nodes.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shapes::create_line;

    #[test]
    fn test_add_remove_reuses_slots() {
        let mut scene = Scene::new();
        let a = scene.add(create_line(&[], Color::WHITE));
        let b = scene.add(create_line(&[], Color::BLACK));
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a).is_some());
        assert!(scene.remove(a).is_none());
        assert_eq!(scene.len(), 1);
        assert!(scene.get(a).is_none());
        assert!(scene.get(b).is_some());

        let c = scene.add(create_line(&[], Color::WHITE));
        assert_eq!(c, a);
        assert_eq!(scene.primitives().count(), 2);
    }
}
