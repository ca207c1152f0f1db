//! Per-class bookkeeping of declared event ids.

use evlint_tree::NodeIndex;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::model::EventSourceClass;

/// Mapping from folded event id to the methods declaring it, in declaration
/// order. Methods whose id does not fold are not in the table.
#[derive(Clone, Debug, Default)]
pub struct EventIdRegistry {
    ids: IndexMap<i32, SmallVec<[NodeIndex; 2]>>,
}

impl EventIdRegistry {
    pub fn build(class: &EventSourceClass) -> EventIdRegistry {
        let mut ids: IndexMap<i32, SmallVec<[NodeIndex; 2]>> = IndexMap::new();
        for method in &class.methods {
            if let Some(declaration) = &method.declaration {
                if let Some(id) = declaration.id_value {
                    ids.entry(id).or_default().push(method.node);
                }
            }
        }
        EventIdRegistry { ids }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids declared by more than one method.
    pub fn duplicates(&self) -> impl Iterator<Item = (i32, &[NodeIndex])> {
        self.ids
            .iter()
            .filter(|(_, methods)| methods.len() > 1)
            .map(|(&id, methods)| (id, methods.as_slice()))
    }

    /// Smallest positive offset `o` such that `base + o` is unused anywhere
    /// in the class.
    pub fn next_free_offset(&self, base: i32) -> i32 {
        let base = i64::from(base);
        let mut id = base + 1;
        while id <= i64::from(i32::MAX) && self.ids.contains_key(&(id as i32)) {
            id += 1;
        }
        (id - base) as i32
    }
}
