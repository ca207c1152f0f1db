//! Derived, read-only views over a bound program: which classes are event
//! sources, what each method declares, and where its forwarding calls are.
//!
//! Views are recomputed from the tree and bank on every pass; nothing here
//! survives an edit.

use evlint_tree::well_known::{EMISSION_PRIMITIVE, KEYWORDS_PROPERTY, LEVEL_PROPERTY};
use evlint_tree::{NodeIndex, SymbolBank, TreeArena, TypeId};
use smallvec::SmallVec;
use tracing::trace;

use crate::session::WellKnownTypes;

#[derive(Clone, Debug)]
pub struct EventSourceClass {
    pub node: NodeIndex,
    pub type_id: TypeId,
    pub methods: Vec<EventMethod>,
}

#[derive(Clone, Debug)]
pub struct EventMethod {
    pub node: NodeIndex,
    pub declaration: Option<EventDeclaration>,
    pub opt_out: bool,
    pub forwarding_calls: Vec<ForwardingCall>,
}

/// Resolved event-declaration metadata, extracted once per pass.
#[derive(Clone, Debug)]
pub struct EventDeclaration {
    pub attribute: NodeIndex,
    /// `NONE` when the marker carries no id argument.
    pub id_expr: NodeIndex,
    /// Folded id; `None` when absent or not foldable (such methods are
    /// excluded from the id table, never defaulted).
    pub id_value: Option<i32>,
    pub level: NodeIndex,
    pub keywords: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ForwardingCall {
    pub call: NodeIndex,
    /// `NONE` for a degenerate zero-argument call.
    pub id_arg: NodeIndex,
    pub forwarded: SmallVec<[NodeIndex; 4]>,
}

impl ForwardingCall {
    /// Span covering every forwarded argument; the id argument alone when
    /// none are forwarded; the call itself as a last resort.
    pub fn arguments_span(&self, arena: &TreeArena) -> evlint_common::Span {
        let mut spans = self.forwarded.iter().map(|&a| arena.span(a));
        match spans.next() {
            Some(first) => spans.fold(first, evlint_common::Span::to),
            None if self.id_arg.is_some() => arena.span(self.id_arg),
            None => arena.span(self.call),
        }
    }
}

/// Classes of the unit whose base chain reaches the well-known base, in
/// declaration order.
pub fn event_source_classes(
    arena: &TreeArena,
    bank: &SymbolBank,
    well_known: &WellKnownTypes,
) -> Vec<EventSourceClass> {
    arena
        .unit_classes()
        .into_iter()
        .filter_map(|class| resolve_class(arena, bank, well_known, class))
        .collect()
}

/// Resolve one class; `None` when it is not an event source.
pub fn resolve_class(
    arena: &TreeArena,
    bank: &SymbolBank,
    well_known: &WellKnownTypes,
    class_node: NodeIndex,
) -> Option<EventSourceClass> {
    let type_id = bank.class_type(class_node)?;
    if !bank.derives_from(type_id, well_known.event_source) {
        return None;
    }
    let class = arena.get_class(class_node)?;
    let methods = class
        .methods
        .iter()
        .map(|&m| resolve_method(arena, bank, well_known, class_node, m))
        .collect();
    trace!(class = %class.name, "resolved event source class");
    Some(EventSourceClass { node: class_node, type_id, methods })
}

fn resolve_method(
    arena: &TreeArena,
    bank: &SymbolBank,
    well_known: &WellKnownTypes,
    class_node: NodeIndex,
    method_node: NodeIndex,
) -> EventMethod {
    let mut declaration = None;
    let mut opt_out = false;

    if let Some(method) = arena.get_method(method_node) {
        for &attr_node in &method.attributes {
            let Some(attr_type) = bank.attribute_type(arena, attr_node) else { continue };
            if attr_type == well_known.event_attribute && declaration.is_none() {
                declaration = Some(resolve_declaration(arena, bank, class_node, attr_node));
            } else if attr_type == well_known.non_event_attribute {
                opt_out = true;
            }
        }
    }

    EventMethod {
        node: method_node,
        declaration,
        opt_out,
        forwarding_calls: forwarding_calls(arena, bank, well_known, class_node, method_node),
    }
}

fn resolve_declaration(
    arena: &TreeArena,
    bank: &SymbolBank,
    class_node: NodeIndex,
    attr_node: NodeIndex,
) -> EventDeclaration {
    let attr = arena.get_attribute(attr_node);
    let id_expr = attr.and_then(|a| a.args.first().copied()).unwrap_or(NodeIndex::NONE);
    let named = |key: &str| {
        attr.and_then(|a| {
            a.named_args.iter().find(|(name, _)| name == key).map(|&(_, expr)| expr)
        })
        .unwrap_or(NodeIndex::NONE)
    };
    EventDeclaration {
        attribute: attr_node,
        id_expr,
        id_value: if id_expr.is_some() { bank.fold_i32(arena, id_expr, class_node) } else { None },
        level: named(LEVEL_PROPERTY),
        keywords: named(KEYWORDS_PROPERTY),
    }
}

fn forwarding_calls(
    arena: &TreeArena,
    bank: &SymbolBank,
    well_known: &WellKnownTypes,
    class_node: NodeIndex,
    method_node: NodeIndex,
) -> Vec<ForwardingCall> {
    let Some(method) = arena.get_method(method_node) else { return Vec::new() };
    if method.body.is_none() {
        return Vec::new();
    }
    let mut calls = Vec::new();
    for call in arena.statement_calls(method.body) {
        let Some(target) = bank.call_target(arena, call, class_node) else { continue };
        if target.containing != well_known.event_source || target.name != EMISSION_PRIMITIVE {
            continue;
        }
        let Some(call_data) = arena.get_call(call) else { continue };
        calls.push(ForwardingCall {
            call,
            id_arg: call_data.args.first().copied().unwrap_or(NodeIndex::NONE),
            forwarded: call_data.args.iter().skip(1).copied().collect(),
        });
    }
    calls
}
