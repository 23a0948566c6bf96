//! Typed value slots with per-slot occupancy flags.

use crate::registry::{Registry, VarId};
use crate::val::Value;

#[cfg(test)]
mod workspace_test;

/// One slot per registered variable. A slot becomes occupied when it is first
/// written and stays occupied for the lifetime of the workspace.
///
/// Clone produces an independent copy; concurrent runs need their own instance.
#[derive(Debug, Clone)]
pub struct Workspace {
    slots: Vec<Value>,
    occupied: Vec<bool>,
}

impl Workspace {
    pub fn new(registry: &Registry) -> Self {
        let slots: Vec<Value> = registry
            .variables()
            // Registered variables always carry a concrete group.
            .map(|(_, def)| def.group.default_value().unwrap_or(Value::Index(0)))
            .collect();
        let occupied = vec![false; slots.len()];
        Self { slots, occupied }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_occupied(&self, v: VarId) -> bool {
        self.occupied[v.index()]
    }

    pub fn write(&mut self, v: VarId, val: Value) {
        self.slots[v.index()] = val;
        self.occupied[v.index()] = true;
    }

    /// Reading an unoccupied slot is a contract violation; release builds
    /// return the default value.
    pub fn read(&self, v: VarId) -> &Value {
        debug_assert!(self.occupied[v.index()], "read of unoccupied slot {}", v);
        &self.slots[v.index()]
    }

    /// Mutable access for methods that update an output in place.
    pub fn slot_mut(&mut self, v: VarId) -> &mut Value {
        &mut self.slots[v.index()]
    }

    pub fn mark_occupied(&mut self, v: VarId) {
        self.occupied[v.index()] = true;
    }

    pub fn occupied_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.occupied
            .iter()
            .enumerate()
            .filter(|(_, o)| **o)
            .map(|(i, _)| VarId::from_index(i))
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }

    /// Copy each of `vars` that is occupied in `other` into `self`.
    pub fn merge_from(&mut self, other: &Workspace, vars: &[VarId]) {
        for &v in vars {
            if other.is_occupied(v) {
                self.write(v, other.slots[v.index()].clone());
            }
        }
    }
}
