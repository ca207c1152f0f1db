//! EV0006 fixes: append the missing forwarding call, optionally guarded.

use evlint_common::Span;
use evlint_rules::model::EventMethod;
use evlint_tree::well_known::{
    EMISSION_PRIMITIVE, ENABLED_PREDICATE, KEYWORDS_DEFAULT, KEYWORDS_TYPE, LEVEL_DEFAULT,
    LEVEL_TYPE,
};
use evlint_tree::{NodeIndex, TreeArena};

use crate::SuggestedFix;

/// Three candidates, each appending a forwarding call at the end of the
/// body: unconditional, guarded by `IsEnabled()`, and guarded by
/// `IsEnabled(level, keywords)` seeded from the declaration's properties
/// (defaulting to always/none).
pub(crate) fn append_forwarding_call(arena: &TreeArena, method: &EventMethod) -> Vec<SuggestedFix> {
    let Some(declaration) = &method.declaration else { return Vec::new() };
    if declaration.id_expr.is_none() {
        return Vec::new();
    }
    let Some(data) = arena.get_method(method.node) else { return Vec::new() };
    if data.body.is_none() {
        return Vec::new();
    }
    let body = data.body;
    let params: Vec<String> = data.params.iter().map(|p| p.name.clone()).collect();
    let id_expr = declaration.id_expr;

    let mut fixes = Vec::new();

    {
        let mut tree = arena.clone();
        let call = forwarding_call(&mut tree, id_expr, &params);
        let stmt = tree.add_expr_stmt(call, Span::EMPTY);
        tree.push_statement(body, stmt);
        fixes.push(SuggestedFix {
            title: format!("Call {EMISSION_PRIMITIVE} with the declared id"),
            tree,
        });
    }

    {
        let mut tree = arena.clone();
        let call = forwarding_call(&mut tree, id_expr, &params);
        let stmt = tree.add_expr_stmt(call, Span::EMPTY);
        let guard = tree.add_call(ENABLED_PREDICATE, Vec::new(), Span::EMPTY);
        let guarded = tree.add_if_stmt(guard, stmt, Span::EMPTY);
        tree.push_statement(body, guarded);
        fixes.push(SuggestedFix {
            title: format!("Call {EMISSION_PRIMITIVE} guarded by {ENABLED_PREDICATE}()"),
            tree,
        });
    }

    {
        let mut tree = arena.clone();
        let call = forwarding_call(&mut tree, id_expr, &params);
        let stmt = tree.add_expr_stmt(call, Span::EMPTY);
        let level = copy_or_default(&mut tree, declaration.level, LEVEL_TYPE, LEVEL_DEFAULT);
        let keywords =
            copy_or_default(&mut tree, declaration.keywords, KEYWORDS_TYPE, KEYWORDS_DEFAULT);
        let guard = tree.add_call(ENABLED_PREDICATE, vec![level, keywords], Span::EMPTY);
        let guarded = tree.add_if_stmt(guard, stmt, Span::EMPTY);
        tree.push_statement(body, guarded);
        fixes.push(SuggestedFix {
            title: format!("Call {EMISSION_PRIMITIVE} guarded by {ENABLED_PREDICATE}(level, keywords)"),
            tree,
        });
    }

    fixes
}

fn forwarding_call(tree: &mut TreeArena, id_expr: NodeIndex, params: &[String]) -> NodeIndex {
    let mut args = Vec::with_capacity(params.len() + 1);
    args.push(tree.copy_expr(id_expr));
    for name in params {
        args.push(tree.add_ident(name, Span::EMPTY));
    }
    tree.add_call(EMISSION_PRIMITIVE, args, Span::EMPTY)
}

fn copy_or_default(
    tree: &mut TreeArena,
    property: NodeIndex,
    default_object: &str,
    default_member: &str,
) -> NodeIndex {
    if property.is_some() {
        tree.copy_expr(property)
    } else {
        tree.add_member(default_object, default_member, Span::EMPTY)
    }
}
