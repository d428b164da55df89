/// Keeps track of the keys a recursive walk is currently inside of. Kinds are
/// trees, but walks that follow variables through their bindings can run in
/// circles; every such walk enters each variable through a guard and stops
/// when it comes back to one it is already inside of.
#[derive(Debug)]
pub struct Guard<K> {
    active: Vec<K>,
}

impl<K: PartialEq> Guard<K> {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    /// Call `f` with `key` marked as active. Returns `None` without calling
    /// `f` if the walk is already inside `key`.
    pub fn enter<R>(&mut self, key: K, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        if self.is_active(&key) {
            return None;
        }

        self.active.push(key);
        let res = f(self);
        self.active.pop();
        Some(res)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl<K: PartialEq> Default for Guard<K> {
    fn default() -> Self {
        Self::new()
    }
}
