//! Shape classification of event id expressions.
//!
//! The convention wants ids written as `NamedConstant + literalOffset` so
//! feature areas can grow without renumbering. The classifier decides whether
//! an id expression already follows that style or merely folds from literals.

use evlint_tree::{NodeIndex, NodeKind, TreeArena};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IdExprShape {
    /// A bare literal, or an expression folding from literals only.
    Literal,
    /// A lone identifier reference.
    Identifier,
    /// An addition/subtraction with at least one identifier inside.
    ConstantAdder,
    /// Not reducible to a compile-time integer shape.
    Opaque,
}

/// Classify an expression node, recursively.
///
/// Parenthesized expressions delegate to their inner expression with the same
/// polarity as the binary branch: literal-only stays `Literal` no matter how
/// it is wrapped.
pub fn classify(arena: &TreeArena, expr: NodeIndex) -> IdExprShape {
    let Some(node) = arena.get(expr) else { return IdExprShape::Opaque };
    match node.kind {
        NodeKind::IntLiteral => IdExprShape::Literal,
        NodeKind::Ident => IdExprShape::Identifier,
        NodeKind::Binary => {
            let Some(binary) = arena.get_binary(expr) else { return IdExprShape::Opaque };
            if contains_identifier(arena, binary.left) || contains_identifier(arena, binary.right) {
                IdExprShape::ConstantAdder
            } else {
                IdExprShape::Literal
            }
        }
        NodeKind::Paren => match arena.get_paren(expr) {
            Some(paren) => classify(arena, paren.expression),
            None => IdExprShape::Opaque,
        },
        _ => IdExprShape::Opaque,
    }
}

fn contains_identifier(arena: &TreeArena, expr: NodeIndex) -> bool {
    let Some(node) = arena.get(expr) else { return false };
    match node.kind {
        NodeKind::Ident => true,
        NodeKind::Binary => arena
            .get_binary(expr)
            .is_some_and(|b| contains_identifier(arena, b.left) || contains_identifier(arena, b.right)),
        NodeKind::Paren => {
            arena.get_paren(expr).is_some_and(|p| contains_identifier(arena, p.expression))
        }
        _ => false,
    }
}
