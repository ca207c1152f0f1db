//! Arena storage for tree nodes.
//!
//! Nodes live in one flat vector; per-kind payloads live in side pools
//! addressed through the node's data index. Accessors are kind-checked and
//! return `None` on mismatch or on the `NONE` sentinel, so malformed shapes
//! flow as absent values instead of panics.
//!
//! The arena is the unit of immutability for analysis: fixes clone it and
//! mutate the clone through the `set_*`/`push_*` helpers below, leaving the
//! original valid for concurrently held results.

use evlint_common::Span;

use crate::node::*;

#[derive(Clone, Debug, Default)]
pub struct TreeArena {
    nodes: Vec<Node>,
    literals: Vec<LiteralData>,
    idents: Vec<IdentData>,
    members: Vec<MemberData>,
    binaries: Vec<BinaryData>,
    parens: Vec<ParenData>,
    calls: Vec<CallData>,
    expr_stmts: Vec<ExprStmtData>,
    ifs: Vec<IfData>,
    blocks: Vec<BlockData>,
    attributes: Vec<AttributeData>,
    fields: Vec<FieldData>,
    methods: Vec<MethodData>,
    classes: Vec<ClassData>,
    units: Vec<UnitData>,
    source_name: String,
}

impl TreeArena {
    pub fn new(source_name: impl Into<String>) -> TreeArena {
        TreeArena { source_name: source_name.into(), ..TreeArena::default() }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind, span: Span, data: u32) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span, data });
        idx
    }

    // =========================================================================
    // Creation
    // =========================================================================

    pub fn add_int_literal(&mut self, value: i64, span: Span) -> NodeIndex {
        let data = self.literals.len() as u32;
        self.literals.push(LiteralData { value });
        self.push(NodeKind::IntLiteral, span, data)
    }

    pub fn add_ident(&mut self, name: impl Into<String>, span: Span) -> NodeIndex {
        let data = self.idents.len() as u32;
        self.idents.push(IdentData { name: name.into() });
        self.push(NodeKind::Ident, span, data)
    }

    pub fn add_member(
        &mut self,
        object: impl Into<String>,
        member: impl Into<String>,
        span: Span,
    ) -> NodeIndex {
        let data = self.members.len() as u32;
        self.members.push(MemberData { object: object.into(), member: member.into() });
        self.push(NodeKind::Member, span, data)
    }

    pub fn add_binary(
        &mut self,
        op: BinaryOp,
        left: NodeIndex,
        right: NodeIndex,
        span: Span,
    ) -> NodeIndex {
        let data = self.binaries.len() as u32;
        self.binaries.push(BinaryData { op, left, right });
        self.push(NodeKind::Binary, span, data)
    }

    pub fn add_paren(&mut self, expression: NodeIndex, span: Span) -> NodeIndex {
        let data = self.parens.len() as u32;
        self.parens.push(ParenData { expression });
        self.push(NodeKind::Paren, span, data)
    }

    pub fn add_call(
        &mut self,
        callee: impl Into<String>,
        args: Vec<NodeIndex>,
        span: Span,
    ) -> NodeIndex {
        let data = self.calls.len() as u32;
        self.calls.push(CallData { callee: callee.into(), args });
        self.push(NodeKind::Call, span, data)
    }

    pub fn add_expr_stmt(&mut self, expression: NodeIndex, span: Span) -> NodeIndex {
        let data = self.expr_stmts.len() as u32;
        self.expr_stmts.push(ExprStmtData { expression });
        self.push(NodeKind::ExprStmt, span, data)
    }

    pub fn add_if_stmt(
        &mut self,
        condition: NodeIndex,
        then_stmt: NodeIndex,
        span: Span,
    ) -> NodeIndex {
        let data = self.ifs.len() as u32;
        self.ifs.push(IfData { condition, then_stmt });
        self.push(NodeKind::IfStmt, span, data)
    }

    pub fn add_block(&mut self, statements: Vec<NodeIndex>, span: Span) -> NodeIndex {
        let data = self.blocks.len() as u32;
        self.blocks.push(BlockData { statements });
        self.push(NodeKind::Block, span, data)
    }

    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        args: Vec<NodeIndex>,
        named_args: Vec<(String, NodeIndex)>,
        span: Span,
    ) -> NodeIndex {
        let data = self.attributes.len() as u32;
        self.attributes.push(AttributeData { name: name.into(), args, named_args });
        self.push(NodeKind::Attribute, span, data)
    }

    pub fn add_const_field(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        initializer: NodeIndex,
        span: Span,
    ) -> NodeIndex {
        let data = self.fields.len() as u32;
        self.fields.push(FieldData {
            name: name.into(),
            type_name: type_name.into(),
            is_const: true,
            initializer,
        });
        self.push(NodeKind::ConstField, span, data)
    }

    pub fn add_method(&mut self, method: MethodData, span: Span) -> NodeIndex {
        let data = self.methods.len() as u32;
        self.methods.push(method);
        self.push(NodeKind::Method, span, data)
    }

    pub fn add_class(&mut self, class: ClassData, span: Span) -> NodeIndex {
        let data = self.classes.len() as u32;
        self.classes.push(class);
        self.push(NodeKind::Class, span, data)
    }

    pub fn add_unit(&mut self, span: Span) -> NodeIndex {
        let data = self.units.len() as u32;
        self.units.push(UnitData::default());
        self.push(NodeKind::Unit, span, data)
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    pub fn span(&self, idx: NodeIndex) -> Span {
        self.get(idx).map(|n| n.span).unwrap_or(Span::EMPTY)
    }

    pub fn kind(&self, idx: NodeIndex) -> Option<NodeKind> {
        self.get(idx).map(|n| n.kind)
    }

    fn data_of(&self, idx: NodeIndex, kind: NodeKind) -> Option<u32> {
        let node = self.get(idx)?;
        if node.kind == kind { Some(node.data) } else { None }
    }

    pub fn get_int_literal(&self, idx: NodeIndex) -> Option<&LiteralData> {
        self.data_of(idx, NodeKind::IntLiteral).and_then(|d| self.literals.get(d as usize))
    }

    pub fn get_ident(&self, idx: NodeIndex) -> Option<&IdentData> {
        self.data_of(idx, NodeKind::Ident).and_then(|d| self.idents.get(d as usize))
    }

    pub fn get_member(&self, idx: NodeIndex) -> Option<&MemberData> {
        self.data_of(idx, NodeKind::Member).and_then(|d| self.members.get(d as usize))
    }

    pub fn get_binary(&self, idx: NodeIndex) -> Option<&BinaryData> {
        self.data_of(idx, NodeKind::Binary).and_then(|d| self.binaries.get(d as usize))
    }

    pub fn get_paren(&self, idx: NodeIndex) -> Option<&ParenData> {
        self.data_of(idx, NodeKind::Paren).and_then(|d| self.parens.get(d as usize))
    }

    pub fn get_call(&self, idx: NodeIndex) -> Option<&CallData> {
        self.data_of(idx, NodeKind::Call).and_then(|d| self.calls.get(d as usize))
    }

    pub fn get_expr_stmt(&self, idx: NodeIndex) -> Option<&ExprStmtData> {
        self.data_of(idx, NodeKind::ExprStmt).and_then(|d| self.expr_stmts.get(d as usize))
    }

    pub fn get_if_stmt(&self, idx: NodeIndex) -> Option<&IfData> {
        self.data_of(idx, NodeKind::IfStmt).and_then(|d| self.ifs.get(d as usize))
    }

    pub fn get_block(&self, idx: NodeIndex) -> Option<&BlockData> {
        self.data_of(idx, NodeKind::Block).and_then(|d| self.blocks.get(d as usize))
    }

    pub fn get_attribute(&self, idx: NodeIndex) -> Option<&AttributeData> {
        self.data_of(idx, NodeKind::Attribute).and_then(|d| self.attributes.get(d as usize))
    }

    pub fn get_const_field(&self, idx: NodeIndex) -> Option<&FieldData> {
        self.data_of(idx, NodeKind::ConstField).and_then(|d| self.fields.get(d as usize))
    }

    pub fn get_method(&self, idx: NodeIndex) -> Option<&MethodData> {
        self.data_of(idx, NodeKind::Method).and_then(|d| self.methods.get(d as usize))
    }

    pub fn get_class(&self, idx: NodeIndex) -> Option<&ClassData> {
        self.data_of(idx, NodeKind::Class).and_then(|d| self.classes.get(d as usize))
    }

    pub fn get_unit(&self, idx: NodeIndex) -> Option<&UnitData> {
        self.data_of(idx, NodeKind::Unit).and_then(|d| self.units.get(d as usize))
    }

    /// Index of the root unit node, if one was created.
    pub fn unit(&self) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|n| n.kind == NodeKind::Unit)
            .map(|i| NodeIndex(i as u32))
    }

    /// Class declarations of the root unit, in declaration order.
    pub fn unit_classes(&self) -> Vec<NodeIndex> {
        self.unit()
            .and_then(|u| self.get_unit(u))
            .map(|u| u.classes.clone())
            .unwrap_or_default()
    }

    /// Statement-level calls reachable from a body block, in source order.
    ///
    /// Descends through nested blocks and `if` arms; expressions are not
    /// searched for nested calls (the convention keeps the forwarding call at
    /// statement level).
    pub fn statement_calls(&self, body: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.collect_statement_calls(body, &mut out);
        out
    }

    fn collect_statement_calls(&self, stmt: NodeIndex, out: &mut Vec<NodeIndex>) {
        let Some(node) = self.get(stmt) else { return };
        match node.kind {
            NodeKind::Block => {
                if let Some(block) = self.get_block(stmt) {
                    for &s in &block.statements {
                        self.collect_statement_calls(s, out);
                    }
                }
            }
            NodeKind::ExprStmt => {
                if let Some(es) = self.get_expr_stmt(stmt) {
                    if self.kind(es.expression) == Some(NodeKind::Call) {
                        out.push(es.expression);
                    }
                }
            }
            NodeKind::IfStmt => {
                if let Some(ifs) = self.get_if_stmt(stmt) {
                    self.collect_statement_calls(ifs.then_stmt, out);
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Rewriting (used by fix synthesis on cloned arenas)
    // =========================================================================

    pub(crate) fn unit_mut(&mut self, idx: NodeIndex) -> Option<&mut UnitData> {
        self.data_of(idx, NodeKind::Unit).and_then(|d| self.units.get_mut(d as usize))
    }

    pub(crate) fn class_mut(&mut self, idx: NodeIndex) -> Option<&mut ClassData> {
        self.data_of(idx, NodeKind::Class).and_then(|d| self.classes.get_mut(d as usize))
    }

    pub(crate) fn method_mut(&mut self, idx: NodeIndex) -> Option<&mut MethodData> {
        self.data_of(idx, NodeKind::Method).and_then(|d| self.methods.get_mut(d as usize))
    }

    /// Replace (or insert at the tail) one positional argument of an
    /// attribute. Returns `false` when the node is not an attribute or the
    /// position is out of range.
    pub fn set_attribute_arg(&mut self, attr: NodeIndex, position: usize, expr: NodeIndex) -> bool {
        let Some(data) = self.data_of(attr, NodeKind::Attribute) else { return false };
        let Some(attribute) = self.attributes.get_mut(data as usize) else { return false };
        if position < attribute.args.len() {
            attribute.args[position] = expr;
            true
        } else if position == attribute.args.len() {
            attribute.args.push(expr);
            true
        } else {
            false
        }
    }

    /// Replace the id (first) argument of a call, inserting it when the call
    /// has no arguments yet.
    pub fn set_call_id_arg(&mut self, call: NodeIndex, expr: NodeIndex) -> bool {
        let Some(data) = self.data_of(call, NodeKind::Call) else { return false };
        let Some(call_data) = self.calls.get_mut(data as usize) else { return false };
        if call_data.args.is_empty() {
            call_data.args.push(expr);
        } else {
            call_data.args[0] = expr;
        }
        true
    }

    pub fn set_call_args(&mut self, call: NodeIndex, args: Vec<NodeIndex>) -> bool {
        let Some(data) = self.data_of(call, NodeKind::Call) else { return false };
        let Some(call_data) = self.calls.get_mut(data as usize) else { return false };
        call_data.args = args;
        true
    }

    pub fn push_statement(&mut self, block: NodeIndex, stmt: NodeIndex) -> bool {
        let Some(data) = self.data_of(block, NodeKind::Block) else { return false };
        let Some(block_data) = self.blocks.get_mut(data as usize) else { return false };
        block_data.statements.push(stmt);
        true
    }

    pub fn push_method_attribute(&mut self, method: NodeIndex, attr: NodeIndex) -> bool {
        let Some(data) = self.data_of(method, NodeKind::Method) else { return false };
        let Some(method_data) = self.methods.get_mut(data as usize) else { return false };
        method_data.attributes.push(attr);
        true
    }

    /// Deep-copy an expression subtree into this arena.
    ///
    /// Copies carry [`Span::EMPTY`] so they never shadow original anchors.
    /// Non-expression nodes yield `NONE`.
    pub fn copy_expr(&mut self, from: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(from) else { return NodeIndex::NONE };
        match node.kind {
            NodeKind::IntLiteral => {
                let value = match self.get_int_literal(from) {
                    Some(lit) => lit.value,
                    None => return NodeIndex::NONE,
                };
                self.add_int_literal(value, Span::EMPTY)
            }
            NodeKind::Ident => {
                let name = match self.get_ident(from) {
                    Some(id) => id.name.clone(),
                    None => return NodeIndex::NONE,
                };
                self.add_ident(name, Span::EMPTY)
            }
            NodeKind::Member => {
                let (object, member) = match self.get_member(from) {
                    Some(m) => (m.object.clone(), m.member.clone()),
                    None => return NodeIndex::NONE,
                };
                self.add_member(object, member, Span::EMPTY)
            }
            NodeKind::Binary => {
                let (op, left, right) = match self.get_binary(from) {
                    Some(b) => (b.op, b.left, b.right),
                    None => return NodeIndex::NONE,
                };
                let left = self.copy_expr(left);
                let right = self.copy_expr(right);
                self.add_binary(op, left, right, Span::EMPTY)
            }
            NodeKind::Paren => {
                let inner = match self.get_paren(from) {
                    Some(p) => p.expression,
                    None => return NodeIndex::NONE,
                };
                let inner = self.copy_expr(inner);
                self.add_paren(inner, Span::EMPTY)
            }
            NodeKind::Call => {
                let (callee, args) = match self.get_call(from) {
                    Some(c) => (c.callee.clone(), c.args.clone()),
                    None => return NodeIndex::NONE,
                };
                let args = args.into_iter().map(|a| self.copy_expr(a)).collect();
                self.add_call(callee, args, Span::EMPTY)
            }
            _ => NodeIndex::NONE,
        }
    }

    /// Render an expression for fix titles and test assertions.
    pub fn expr_text(&self, idx: NodeIndex) -> String {
        let Some(node) = self.get(idx) else { return String::from("<none>") };
        match node.kind {
            NodeKind::IntLiteral => {
                self.get_int_literal(idx).map(|l| l.value.to_string()).unwrap_or_default()
            }
            NodeKind::Ident => self.get_ident(idx).map(|i| i.name.clone()).unwrap_or_default(),
            NodeKind::Member => self
                .get_member(idx)
                .map(|m| format!("{}.{}", m.object, m.member))
                .unwrap_or_default(),
            NodeKind::Binary => self
                .get_binary(idx)
                .map(|b| {
                    format!(
                        "{} {} {}",
                        self.expr_text(b.left),
                        b.op.token(),
                        self.expr_text(b.right)
                    )
                })
                .unwrap_or_default(),
            NodeKind::Paren => self
                .get_paren(idx)
                .map(|p| format!("({})", self.expr_text(p.expression)))
                .unwrap_or_default(),
            NodeKind::Call => self
                .get_call(idx)
                .map(|c| {
                    let args: Vec<String> = c.args.iter().map(|&a| self.expr_text(a)).collect();
                    format!("{}({})", c.callee, args.join(", "))
                })
                .unwrap_or_default(),
            _ => String::from("<non-expr>"),
        }
    }
}
