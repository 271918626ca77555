//! Lexical scope arena
//!
//! Scopes live in a flat arena and refer to their parent by index, so there are
//! no shared mutable back-references. Index 0 is the root (global) scope.
//!
//! Scopes are strictly LIFO: the block, loop iteration or call that pushed a
//! scope pops it before returning, and popping releases that scope together
//! with anything pushed after it.
//!
//! Lookup walks the parent chain. Assignment targets the innermost scope that
//! already defines the name, or the starting scope when none does.

use super::value::Value;
use log::trace;
use rustc_hash::FxHashMap;

/// Handle to a scope in a [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// Position in the arena; the root scope is 0
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<ScopeId>,
    vars: FxHashMap<String, Value>,
    insertion_order: Vec<String>, // Declaration order, for display
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope {
            parent,
            vars: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }
}

/// Arena of scopes with parent links
#[derive(Debug, Clone)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena {
            scopes: vec![Scope::new(None)],
        }
    }

    /// The global scope
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Push a new scope chained to `parent`
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(parent)));
        trace!("push scope {} (parent {})", id.0, parent.0);
        id
    }

    /// Release `id` and every scope pushed after it. The root is never released.
    pub fn pop(&mut self, id: ScopeId) {
        if id.0 == 0 {
            return;
        }
        trace!("pop scope {}", id.0);
        self.scopes.truncate(id.0);
    }

    /// Number of live scopes, root included
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(id.0).and_then(|s| s.parent)
    }

    /// Innermost scope in the chain from `from` that binds `name`
    pub fn find_defining(&self, from: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.scopes.get(id.0)?;
            if scope.vars.contains_key(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Look up `name`, walking outward to the root
    pub fn get(&self, from: ScopeId, name: &str) -> Option<&Value> {
        let id = self.find_defining(from, name)?;
        self.scopes[id.0].vars.get(name)
    }

    pub fn is_defined(&self, from: ScopeId, name: &str) -> bool {
        self.find_defining(from, name).is_some()
    }

    /// Bind `name` in `scope` itself, shadowing any outer binding
    pub fn define(&mut self, scope: ScopeId, name: &str, value: Value) {
        if let Some(s) = self.scopes.get_mut(scope.0) {
            if s.vars.insert(name.to_string(), value).is_none() {
                s.insertion_order.push(name.to_string());
            }
        }
    }

    /// Write to the innermost scope defining `name`, or bind it in `from`
    pub fn assign(&mut self, from: ScopeId, name: &str, value: Value) {
        let target = self.find_defining(from, name).unwrap_or(from);
        self.define(target, name, value);
    }

    /// Bindings of one scope in declaration order
    pub fn bindings(&self, scope: ScopeId) -> Vec<(&str, &Value)> {
        match self.scopes.get(scope.0) {
            Some(s) => s
                .insertion_order
                .iter()
                .filter_map(|name| {
                    s.vars.get(name).map(|v| (name.as_str(), v))
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// The chain from `from` out to the root, innermost first
    pub fn chain(&self, from: ScopeId) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = Some(from);
        while let Some(id) = current {
            if id.0 >= self.scopes.len() {
                break;
            }
            chain.push(id);
            current = self.scopes[id.0].parent;
        }
        chain
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, "g", Value::Int(1));
        let inner = arena.push(root);

        assert_eq!(arena.get(inner, "g"), Some(&Value::Int(1)));
        assert_eq!(arena.get(inner, "missing"), None);
    }

    #[test]
    fn test_assign_targets_defining_scope() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, "x", Value::Int(1));
        let inner = arena.push(root);

        arena.assign(inner, "x", Value::Int(2));
        arena.pop(inner);

        assert_eq!(arena.get(root, "x"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_assign_undefined_binds_in_current_scope() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        let inner = arena.push(root);

        arena.assign(inner, "fresh", Value::Int(5));

        assert_eq!(arena.get(inner, "fresh"), Some(&Value::Int(5)));
        assert_eq!(arena.get(root, "fresh"), None);
    }

    #[test]
    fn test_define_shadows_outer_binding() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, "x", Value::Int(1));
        let inner = arena.push(root);

        arena.define(inner, "x", Value::Int(10));
        assert_eq!(arena.get(inner, "x"), Some(&Value::Int(10)));

        arena.pop(inner);
        assert_eq!(arena.get(root, "x"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_pop_releases_later_scopes() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        let a = arena.push(root);
        let _b = arena.push(a);
        assert_eq!(arena.len(), 3);

        arena.pop(a);
        assert_eq!(arena.len(), 1);

        arena.pop(root);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_bindings_keep_declaration_order() {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.define(root, "b", Value::Int(2));
        arena.define(root, "a", Value::Int(1));
        arena.define(root, "b", Value::Int(3));

        let names: Vec<&str> = arena.bindings(root).iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(arena.chain(root), vec![root]);
    }
}
