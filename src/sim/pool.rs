//! Fixed-capacity actor pools
//!
//! A pool is a fixed array of slots allocated once per round. `spawn` claims
//! the first free slot in index order (a bounded linear scan, capacity is at
//! most 100) and hands back a generational [`Handle`]. Freeing a slot bumps
//! its generation, so handles kept past a `deactivate` can never alias the
//! next occupant.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use glam::Vec2;

/// A circle in the playing field
pub trait Body {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Anything that advances on its own inside a pool
pub trait Actor: Body {
    /// Advance one tick. Returns false when the actor should leave its pool.
    fn update(&mut self, dt: f32) -> bool;
}

/// Index + generation reference into an [`ActorPool`]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index inside the owning pool
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

/// Fixed-capacity slot allocator
#[derive(Debug, Clone)]
pub struct ActorPool<T> {
    slots: Vec<Slot<T>>,
    active: usize,
}

impl<T> ActorPool<T> {
    /// Allocate `capacity` empty slots. The pool never grows.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity)
                .map(|_| Slot {
                    value: None,
                    generation: 0,
                })
                .collect(),
            active: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// Claim the first inactive slot. Returns `None` when every slot is taken;
    /// nothing already in the pool is touched in that case.
    pub fn spawn(&mut self, value: T) -> Option<Handle<T>> {
        let index = self.slots.iter().position(|slot| slot.value.is_none())?;
        let slot = &mut self.slots[index];
        slot.value = Some(value);
        self.active += 1;
        Some(Handle::new(index, slot.generation))
    }

    /// Free a slot. Stale or already-freed handles are a no-op.
    /// Returns true if a live actor was removed.
    pub fn deactivate(&mut self, handle: Handle<T>) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if slot.generation != handle.generation || slot.value.is_none() {
            return false;
        }
        slot.value = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.active -= 1;
        true
    }

    pub fn is_active(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Active actors in index order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(index, slot.generation), value))
        })
    }

    /// Active actors in index order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (Handle::new(index, generation), value))
        })
    }

    pub fn for_each_active(&self, mut f: impl FnMut(Handle<T>, &T)) {
        for (handle, value) in self.iter() {
            f(handle, value);
        }
    }

    /// Visit every active actor in index order and free the ones `keep`
    /// rejects. Returns how many were freed.
    pub fn retain(&mut self, mut keep: impl FnMut(Handle<T>, &mut T) -> bool) -> usize {
        let mut removed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let handle = Handle::new(index, slot.generation);
            let Some(value) = slot.value.as_mut() else {
                continue;
            };
            if !keep(handle, value) {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                removed += 1;
            }
        }
        self.active -= removed;
        removed
    }

    /// Free every slot, invalidating all outstanding handles
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.active = 0;
    }
}

impl<T: Actor> ActorPool<T> {
    /// Update every active actor, freeing the ones that expire
    pub fn update_all(&mut self, dt: f32) -> usize {
        self.retain(|_, actor| actor.update(dt))
    }
}
