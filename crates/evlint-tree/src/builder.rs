//! Programmatic construction of trees, standing in for the host compiler.
//!
//! The builder assigns monotonically increasing spans so every authored node
//! has a distinct, ordered anchor; synthesized nodes added later by fixes do
//! not (they carry the empty span).

use evlint_common::Span;

use crate::arena::TreeArena;
use crate::node::{
    BinaryOp, ClassData, MethodData, NodeIndex, Param, method_flags,
};

pub struct ProgramBuilder {
    arena: TreeArena,
    unit: NodeIndex,
    pos: u32,
}

impl ProgramBuilder {
    pub fn new(source_name: impl Into<String>) -> ProgramBuilder {
        let mut arena = TreeArena::new(source_name);
        let unit = arena.add_unit(Span::EMPTY);
        ProgramBuilder { arena, unit, pos: 0 }
    }

    fn next_span(&mut self, len: u32) -> Span {
        let span = Span::new(self.pos, len.max(1));
        self.pos += len.max(1) + 1;
        span
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn lit(&mut self, value: i64) -> NodeIndex {
        let len = value.to_string().len() as u32;
        let span = self.next_span(len);
        self.arena.add_int_literal(value, span)
    }

    pub fn ident(&mut self, name: &str) -> NodeIndex {
        let span = self.next_span(name.len() as u32);
        self.arena.add_ident(name, span)
    }

    pub fn member(&mut self, object: &str, member: &str) -> NodeIndex {
        let span = self.next_span((object.len() + member.len() + 1) as u32);
        self.arena.add_member(object, member, span)
    }

    pub fn add_expr(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        let span = self.arena.span(left).to(self.arena.span(right));
        self.arena.add_binary(BinaryOp::Add, left, right, span)
    }

    pub fn sub_expr(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        let span = self.arena.span(left).to(self.arena.span(right));
        self.arena.add_binary(BinaryOp::Sub, left, right, span)
    }

    pub fn paren(&mut self, inner: NodeIndex) -> NodeIndex {
        let span = self.arena.span(inner);
        self.arena.add_paren(inner, Span::new(span.start.saturating_sub(1), span.len + 2))
    }

    pub fn call_expr(&mut self, callee: &str, args: Vec<NodeIndex>) -> NodeIndex {
        let span = self.next_span(callee.len() as u32 + 2);
        self.arena.add_call(callee, args, span)
    }

    /// Convenience for the common `Constant + offset` id expression.
    pub fn constant_adder(&mut self, constant: &str, offset: i64) -> NodeIndex {
        let left = self.ident(constant);
        let right = self.lit(offset);
        self.add_expr(left, right)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn start_class(&mut self, name: &str, base: Option<&str>) -> NodeIndex {
        let name_span = self.next_span(name.len() as u32);
        let span = self.next_span(1);
        let class = self.arena.add_class(
            ClassData {
                name: name.to_string(),
                base: base.map(|b| b.to_string()),
                fields: Vec::new(),
                methods: Vec::new(),
                name_span,
            },
            span,
        );
        let unit = self.unit;
        if let Some(unit_data) = self.arena.unit_mut(unit) {
            unit_data.classes.push(class);
        }
        class
    }

    pub fn const_field(&mut self, class: NodeIndex, name: &str, value: i32) -> NodeIndex {
        let init = self.lit(i64::from(value));
        self.const_field_expr(class, name, init)
    }

    pub fn const_field_expr(&mut self, class: NodeIndex, name: &str, init: NodeIndex) -> NodeIndex {
        let span = self.next_span(name.len() as u32);
        let field = self.arena.add_const_field(name, "int", init, span);
        if let Some(class_data) = self.arena.class_mut(class) {
            class_data.fields.push(field);
        }
        field
    }

    /// Public instance method with an (initially empty) body.
    pub fn start_method(
        &mut self,
        class: NodeIndex,
        name: &str,
        params: &[(&str, &str)],
    ) -> NodeIndex {
        self.start_method_with_flags(class, name, params, method_flags::PUBLIC)
    }

    pub fn start_method_with_flags(
        &mut self,
        class: NodeIndex,
        name: &str,
        params: &[(&str, &str)],
        flags: u32,
    ) -> NodeIndex {
        let name_span = self.next_span(name.len() as u32);
        let body_span = self.next_span(2);
        let body = self.arena.add_block(Vec::new(), body_span);
        let span = name_span.to(body_span);
        let method = self.arena.add_method(
            MethodData {
                name: name.to_string(),
                flags,
                attributes: Vec::new(),
                params: params
                    .iter()
                    .map(|(n, t)| Param { name: n.to_string(), type_name: t.to_string() })
                    .collect(),
                body,
                name_span,
            },
            span,
        );
        if let Some(class_data) = self.arena.class_mut(class) {
            class_data.methods.push(method);
        }
        method
    }

    /// Mark a method as having no body yet (still being typed).
    pub fn drop_body(&mut self, method: NodeIndex) {
        if let Some(method_data) = self.arena.method_mut(method) {
            method_data.body = NodeIndex::NONE;
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attribute(
        &mut self,
        method: NodeIndex,
        name: &str,
        args: Vec<NodeIndex>,
        named_args: Vec<(String, NodeIndex)>,
    ) -> NodeIndex {
        let span = self.next_span(name.len() as u32 + 2);
        let attr = self.arena.add_attribute(name, args, named_args, span);
        self.arena.push_method_attribute(method, attr);
        attr
    }

    pub fn event_attribute(&mut self, method: NodeIndex, id_expr: NodeIndex) -> NodeIndex {
        self.attribute(method, "Event", vec![id_expr], Vec::new())
    }

    pub fn event_attribute_named(
        &mut self,
        method: NodeIndex,
        id_expr: NodeIndex,
        named_args: Vec<(String, NodeIndex)>,
    ) -> NodeIndex {
        self.attribute(method, "Event", vec![id_expr], named_args)
    }

    /// A declaration marker without an id argument.
    pub fn event_attribute_empty(&mut self, method: NodeIndex) -> NodeIndex {
        self.attribute(method, "Event", Vec::new(), Vec::new())
    }

    pub fn non_event_attribute(&mut self, method: NodeIndex) -> NodeIndex {
        self.attribute(method, "NonEvent", Vec::new(), Vec::new())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn append_statement(&mut self, method: NodeIndex, stmt: NodeIndex) {
        let body = self.arena.get_method(method).map(|m| m.body).unwrap_or(NodeIndex::NONE);
        if body.is_some() {
            self.arena.push_statement(body, stmt);
        }
    }

    /// Append `WriteEvent(id, <param names..>)` to the method body.
    pub fn write_event(
        &mut self,
        method: NodeIndex,
        id_expr: NodeIndex,
        arg_names: &[&str],
    ) -> NodeIndex {
        let mut args = vec![id_expr];
        for name in arg_names {
            args.push(self.ident(name));
        }
        self.write_event_args(method, args)
    }

    /// Append a forwarding call with a fully explicit argument list.
    pub fn write_event_args(&mut self, method: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
        let call = self.call_expr("WriteEvent", args);
        let span = self.arena.span(call);
        let stmt = self.arena.add_expr_stmt(call, span);
        self.append_statement(method, stmt);
        call
    }

    /// Append an arbitrary expression statement.
    pub fn stmt_expr(&mut self, method: NodeIndex, expr: NodeIndex) -> NodeIndex {
        let span = self.arena.span(expr);
        let stmt = self.arena.add_expr_stmt(expr, span);
        self.append_statement(method, stmt);
        stmt
    }

    /// Append `if (cond) <expr>;` to the method body.
    pub fn guarded_stmt(
        &mut self,
        method: NodeIndex,
        condition: NodeIndex,
        expr: NodeIndex,
    ) -> NodeIndex {
        let expr_span = self.arena.span(expr);
        let inner = self.arena.add_expr_stmt(expr, expr_span);
        let span = self.arena.span(condition).to(expr_span);
        let stmt = self.arena.add_if_stmt(condition, inner, span);
        self.append_statement(method, stmt);
        stmt
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn finish(self) -> TreeArena {
        self.arena
    }
}
