//! Symbol binding: the pass that derives type, constant and call-target
//! information from a tree.
//!
//! `SymbolBank::bind` is total and cheap; the bank is recomputed after every
//! fix application so re-analysis always sees consistent symbols.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::arena::TreeArena;
use crate::node::{BinaryOp, NodeIndex, NodeKind};
use crate::well_known::{EMISSION_PRIMITIVE, ENABLED_PREDICATE};

/// Handle into the bank's type table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub qualified_name: String,
    pub base: Option<TypeId>,
    /// Declaring class node; `NONE` for ambient types.
    pub decl: NodeIndex,
}

/// Types the host compilation provides without a declaration in the tree —
/// the runtime's tracing primitives, in the default convention.
#[derive(Clone, Debug, Default)]
pub struct AmbientTypes {
    types: Vec<AmbientType>,
}

#[derive(Clone, Debug)]
struct AmbientType {
    qualified_name: String,
    aliases: Vec<String>,
}

impl AmbientTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, qualified_name: &str, aliases: &[&str]) -> &mut Self {
        self.types.push(AmbientType {
            qualified_name: qualified_name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    /// The default tracing convention: emitting base plus the two markers,
    /// each reachable by its qualified name, bare type name, and (for
    /// attributes) the conventional short form without the suffix.
    pub fn tracing_defaults() -> Self {
        let mut ambient = Self::new();
        ambient
            .push(crate::well_known::QUALIFIED_EVENT_SOURCE, &["EventSource"])
            .push(crate::well_known::QUALIFIED_EVENT_ATTRIBUTE, &["EventAttribute", "Event"])
            .push(crate::well_known::QUALIFIED_NON_EVENT_ATTRIBUTE, &[
                "NonEventAttribute",
                "NonEvent",
            ]);
        ambient
    }
}

/// Where a call binds: the declaring type and the member name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallTarget {
    pub containing: TypeId,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolBank {
    types: Vec<TypeInfo>,
    by_name: FxHashMap<String, TypeId>,
    class_types: FxHashMap<u32, TypeId>,
    /// Class node -> constant name -> folded value, in declaration order.
    constants: FxHashMap<u32, IndexMap<String, i32>>,
    empty_constants: IndexMap<String, i32>,
}

impl SymbolBank {
    /// Derive symbols from a tree plus the host's ambient types.
    pub fn bind(arena: &TreeArena, ambient: &AmbientTypes) -> SymbolBank {
        let mut bank = SymbolBank::default();

        for ambient_type in &ambient.types {
            let id = bank.intern_type(TypeInfo {
                qualified_name: ambient_type.qualified_name.clone(),
                base: None,
                decl: NodeIndex::NONE,
            });
            bank.by_name.insert(ambient_type.qualified_name.clone(), id);
            for alias in &ambient_type.aliases {
                bank.by_name.insert(alias.clone(), id);
            }
        }

        // Declarations first so forward references between classes resolve.
        let classes = arena.unit_classes();
        for &class_node in &classes {
            let Some(class) = arena.get_class(class_node) else { continue };
            let id = bank.intern_type(TypeInfo {
                qualified_name: class.name.clone(),
                base: None,
                decl: class_node,
            });
            bank.by_name.insert(class.name.clone(), id);
            bank.class_types.insert(class_node.0, id);
        }

        for &class_node in &classes {
            let Some(class) = arena.get_class(class_node) else { continue };
            let Some(&id) = bank.class_types.get(&class_node.0) else { continue };
            let base = class.base.as_deref().and_then(|b| bank.resolve_type(b));
            bank.types[id.0 as usize].base = base;
            bank.bind_class_constants(arena, class_node);
        }

        debug!(
            types = bank.types.len(),
            classes = classes.len(),
            "bound symbol bank for {}",
            arena.source_name()
        );
        bank
    }

    fn intern_type(&mut self, info: TypeInfo) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(info);
        id
    }

    fn bind_class_constants(&mut self, arena: &TreeArena, class_node: NodeIndex) {
        let Some(class) = arena.get_class(class_node) else { return };
        let mut constants: IndexMap<String, i32> = IndexMap::new();
        for &field_node in &class.fields {
            let Some(field) = arena.get_const_field(field_node) else { continue };
            if !field.is_const {
                continue;
            }
            // Earlier constants are in scope for later initializers.
            match fold_with(arena, field.initializer, &constants) {
                Some(value) => {
                    constants.insert(field.name.clone(), value);
                }
                None => {
                    trace!(field = %field.name, "constant initializer does not fold; skipped");
                }
            }
        }
        self.constants.insert(class_node.0, constants);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn resolve_type(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn type_info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.0 as usize)
    }

    pub fn class_type(&self, class_node: NodeIndex) -> Option<TypeId> {
        self.class_types.get(&class_node.0).copied()
    }

    /// Walk the base edge of `ty` upward; true when `ancestor` is reached.
    /// A type is not considered derived from itself.
    pub fn derives_from(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut current = self.type_info(ty).and_then(|t| t.base);
        while let Some(base) = current {
            if base == ancestor {
                return true;
            }
            current = self.type_info(base).and_then(|t| t.base);
        }
        false
    }

    /// Class-scoped integer constants in declaration order.
    pub fn constants_of(&self, class_node: NodeIndex) -> &IndexMap<String, i32> {
        self.constants.get(&class_node.0).unwrap_or(&self.empty_constants)
    }

    /// Fold an expression to a 32-bit constant within a class scope.
    ///
    /// Handles integer literals, class constants, `+`/`-` and parentheses
    /// with checked arithmetic; anything else — or any overflow — is
    /// unfoldable and yields `None`, never a default id.
    pub fn fold_i32(&self, arena: &TreeArena, expr: NodeIndex, class_node: NodeIndex) -> Option<i32> {
        fold_with(arena, expr, self.constants_of(class_node))
    }

    /// Resolve an attribute node's name to a type.
    pub fn attribute_type(&self, arena: &TreeArena, attr: NodeIndex) -> Option<TypeId> {
        let attribute = arena.get_attribute(attr)?;
        self.resolve_type(&attribute.name)
    }

    /// Bind an unqualified call inside a class body.
    ///
    /// Calls named after the emission primitive or the enabled predicate bind
    /// to the well-known base when the class derives from it; everything else
    /// binds to the class itself when it declares a matching method.
    pub fn call_target(
        &self,
        arena: &TreeArena,
        call: NodeIndex,
        class_node: NodeIndex,
    ) -> Option<CallTarget> {
        let call_data = arena.get_call(call)?;
        let class_type = self.class_type(class_node)?;

        if call_data.callee == EMISSION_PRIMITIVE || call_data.callee == ENABLED_PREDICATE {
            let mut current = self.type_info(class_type).and_then(|t| t.base);
            while let Some(base) = current {
                let info = self.type_info(base)?;
                if info.decl.is_none() {
                    // Ambient base: the primitive lives here by convention.
                    return Some(CallTarget { containing: base, name: call_data.callee.clone() });
                }
                current = info.base;
            }
            return None;
        }

        let class = arena.get_class(class_node)?;
        let declares = class
            .methods
            .iter()
            .any(|&m| arena.get_method(m).is_some_and(|md| md.name == call_data.callee));
        declares.then(|| CallTarget { containing: class_type, name: call_data.callee.clone() })
    }
}

fn fold_with(
    arena: &TreeArena,
    expr: NodeIndex,
    constants: &IndexMap<String, i32>,
) -> Option<i32> {
    i32::try_from(fold_i64(arena, expr, constants)?).ok()
}

fn fold_i64(
    arena: &TreeArena,
    expr: NodeIndex,
    constants: &IndexMap<String, i32>,
) -> Option<i64> {
    let node = arena.get(expr)?;
    match node.kind {
        NodeKind::IntLiteral => arena.get_int_literal(expr).map(|l| l.value),
        NodeKind::Ident => {
            let ident = arena.get_ident(expr)?;
            constants.get(&ident.name).map(|&v| i64::from(v))
        }
        NodeKind::Binary => {
            let binary = arena.get_binary(expr)?;
            let left = fold_i64(arena, binary.left, constants)?;
            let right = fold_i64(arena, binary.right, constants)?;
            match binary.op {
                BinaryOp::Add => left.checked_add(right),
                BinaryOp::Sub => left.checked_sub(right),
            }
        }
        NodeKind::Paren => {
            let paren = arena.get_paren(expr)?;
            fold_i64(arena, paren.expression, constants)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProgramBuilder;

    fn bound_fixture() -> (TreeArena, SymbolBank, NodeIndex) {
        let mut b = ProgramBuilder::new("events");
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let offset = {
            let base = b.ident("NormalEvents");
            let one = b.lit(5);
            b.add_expr(base, one)
        };
        b.const_field_expr(class, "ErrorEvents", offset);
        let arena = b.finish();
        let bank = SymbolBank::bind(&arena, &AmbientTypes::tracing_defaults());
        (arena, bank, class)
    }

    #[test]
    fn base_chain_reaches_ambient_event_source() {
        let (_, bank, class) = bound_fixture();
        let class_ty = bank.class_type(class).unwrap();
        let source = bank.resolve_type("Diagnostics.Tracing.EventSource").unwrap();
        assert!(bank.derives_from(class_ty, source));
        assert!(!bank.derives_from(source, class_ty));
    }

    #[test]
    fn constants_fold_in_declaration_order() {
        let (_, bank, class) = bound_fixture();
        let constants = bank.constants_of(class);
        assert_eq!(constants.get("NormalEvents"), Some(&100));
        assert_eq!(constants.get("ErrorEvents"), Some(&105));
    }

    #[test]
    fn fold_handles_parens_and_subtraction() {
        let (mut arena, bank, class) = bound_fixture();
        let base = arena.add_ident("NormalEvents", evlint_common::Span::EMPTY);
        let three = arena.add_int_literal(3, evlint_common::Span::EMPTY);
        let sum = arena.add_binary(BinaryOp::Add, base, three, evlint_common::Span::EMPTY);
        let paren = arena.add_paren(sum, evlint_common::Span::EMPTY);
        let two = arena.add_int_literal(2, evlint_common::Span::EMPTY);
        let diff = arena.add_binary(BinaryOp::Sub, paren, two, evlint_common::Span::EMPTY);
        assert_eq!(bank.fold_i32(&arena, diff, class), Some(101));
    }

    #[test]
    fn fold_rejects_unknown_names_and_overflow() {
        let (mut arena, bank, class) = bound_fixture();
        let unknown = arena.add_ident("NotAConstant", evlint_common::Span::EMPTY);
        assert_eq!(bank.fold_i32(&arena, unknown, class), None);

        let big = arena.add_int_literal(i64::from(i32::MAX) + 1, evlint_common::Span::EMPTY);
        assert_eq!(bank.fold_i32(&arena, big, class), None);
    }
}
