use std::collections::HashMap;

/// One lexical scope: identifier bindings to stack slot positions, plus the
/// number of slots this scope pushed (needed for cleanup on exit).
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, i32>,
    parent: Option<usize>,
    slots: usize,
}

/// All scopes of a transpilation, held in one vector with parent links by
/// index. The walker moves a cursor into the arena instead of owning nested
/// scope values, so entering and leaving scopes never fights the borrow of
/// the bindings themselves.
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    current: usize,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self {
            scopes: vec![Scope::default()],
            current: 0,
        }
    }
}

impl ScopeArena {
    pub fn enter(&mut self) {
        self.scopes.push(Scope {
            parent: Some(self.current),
            ..Scope::default()
        });
        self.current = self.scopes.len() - 1;
    }

    /// Leave the current scope, returning how many stack slots it pushed. The
    /// outermost scope has no parent and is never left.
    pub fn exit(&mut self) -> usize {
        let scope = &self.scopes[self.current];
        let slots = scope.slots;
        if let Some(parent) = scope.parent {
            self.current = parent;
        }
        slots
    }

    pub fn declare(&mut self, name: &str, slot: i32) {
        let scope = &mut self.scopes[self.current];
        scope.bindings.insert(name.to_string(), slot);
        scope.slots += 1;
    }

    /// Walk the scope chain outwards until a binding for `name` turns up.
    pub fn lookup(&self, name: &str) -> Option<i32> {
        let mut index = Some(self.current);
        while let Some(current) = index {
            let scope = &self.scopes[current];
            if let Some(slot) = scope.bindings.get(name) {
                return Some(*slot);
            }
            index = scope.parent;
        }
        None
    }
}
