use serde::{Deserialize, Serialize};

/// Stable handle to an object stored in an [`Arena`].
///
/// Handles are plain indices: the arena never frees a slot while the world is
/// alive, so a handle stays valid for the whole mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl ObjectId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == usize::MAX
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self(usize::MAX)
    }
}

/// Append-only arena owning every collidable object.
///
/// A slot can be detached temporarily so that one object can be mutated while
/// the rest of the arena is read.
pub struct Arena<T> {
    items: Vec<Option<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn insert(&mut self, item: T) -> ObjectId {
        let index = self.items.len();
        self.items.push(Some(item));
        ObjectId::from_index(index)
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.items.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    /// Takes an item out of its slot. The handle stays reserved until
    /// [`Arena::reattach`] puts the item back.
    pub fn detach(&mut self, id: ObjectId) -> Option<T> {
        self.items.get_mut(id.index()).and_then(|slot| slot.take())
    }

    pub fn reattach(&mut self, id: ObjectId, item: T) {
        if let Some(slot) = self.items.get_mut(id.index()) {
            *slot = Some(item);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (ObjectId::from_index(index), item)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut T)> + '_ {
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|item| (ObjectId::from_index(index), item)))
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_slot_is_hidden_until_reattached() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        let item = arena.detach(a).expect("slot should be occupied");
        assert!(arena.get(a).is_none());
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![b]);

        arena.reattach(a, item);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn default_id_is_null() {
        assert!(ObjectId::default().is_null());
        assert!(!ObjectId::from_index(3).is_null());
    }
}
