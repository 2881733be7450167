//! Python parser built on rustpython-parser
//!
//! The rustpython AST is lowered into [`Node`]s. Only constructs that matter
//! for complexity, naming and metrics survive; decorators, default values,
//! annotations and plain expressions are folded into the enclosing scope so
//! that anything nested inside them (a lambda's `and` chain, a walrus target)
//! is still seen.

use super::{
    normalize_newlines, physical_lines, Binding, Block, BoolChain, ClassDef, FunctionDef,
    LoopBlock, LoopKind, Node, ParseFailure, SyntaxTree,
};
use line_numbers::LinePositions;
use rustpython_parser::ast::{
    self, Arguments, Comprehension, ExceptHandler, Expr, ExprContext, Mod, Ranged, Stmt,
};
use rustpython_parser::text_size::TextSize;
use rustpython_parser::{parse, Mode};
use std::path::Path;

/// Parse Python source text into a [`SyntaxTree`]
pub fn parse_source(source: &str, path: &Path) -> Result<SyntaxTree, ParseFailure> {
    // Offsets are mapped to lines on `\n` only, so `\r` and `\r\n` are folded first
    let normalized = normalize_newlines(source);
    let source = normalized.as_ref();
    let source_path = path.to_string_lossy();
    let module = parse(source, Mode::Module, &source_path).map_err(|err| {
        let lowering = Lowering::new(source);
        ParseFailure::Syntax {
            line: lowering.line_at(err.offset),
            message: err.error.to_string(),
        }
    })?;

    let body = match module {
        Mod::Module(m) => m.body,
        _ => Vec::new(),
    };

    let lowering = Lowering::new(source);
    let mut nodes = Vec::new();
    lowering.stmts(&body, &mut nodes);

    Ok(SyntaxTree {
        body: nodes,
        line_count: physical_lines(source).count() as u32,
    })
}

/// Read, decode and parse a file in one step
pub fn parse_file(path: &Path) -> Result<SyntaxTree, ParseFailure> {
    let bytes = std::fs::read(path)?;
    let source = super::decode_source(&bytes)?;
    parse_source(source, path)
}

struct Lowering<'src> {
    positions: LinePositions,
    lines: Vec<&'src str>,
    len: usize,
}

impl<'src> Lowering<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            positions: LinePositions::from(source),
            lines: physical_lines(source).collect(),
            len: source.len(),
        }
    }

    /// 1-based line for a byte offset (offsets past the end clamp to the last line)
    fn line_at(&self, offset: TextSize) -> u32 {
        if self.len == 0 {
            return 1;
        }
        let offset = usize::from(offset).min(self.len - 1);
        self.positions.from_offset(offset).as_usize() as u32 + 1
    }

    /// Line of the `def`/`class` keyword.
    ///
    /// A decorated definition's range starts at its first decorator, so skip
    /// past the last decorator to the next line of code.
    fn definition_line(&self, start: TextSize, decorators: &[Expr]) -> u32 {
        let Some(last) = decorators.last() else {
            return self.line_at(start);
        };
        let after = self.line_at(last.range().end());
        let mut line = after + 1;
        while let Some(text) = self.lines.get(line as usize - 1) {
            let trimmed = text.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') && !trimmed.starts_with('@') {
                return line;
            }
            line += 1;
        }
        after
    }

    fn stmts(&self, stmts: &[Stmt], out: &mut Vec<Node>) {
        for stmt in stmts {
            self.stmt(stmt, out);
        }
    }

    fn stmt(&self, stmt: &Stmt, out: &mut Vec<Node>) {
        match stmt {
            Stmt::FunctionDef(f) => {
                self.scope_prelude(&f.decorator_list, &f.args, f.returns.as_deref(), out);
                out.push(Node::Function(FunctionDef {
                    name: f.name.to_string(),
                    line: self.definition_line(f.range.start(), &f.decorator_list),
                    is_async: false,
                    body: self.block(&f.body),
                }));
            }
            Stmt::AsyncFunctionDef(f) => {
                self.scope_prelude(&f.decorator_list, &f.args, f.returns.as_deref(), out);
                out.push(Node::Function(FunctionDef {
                    name: f.name.to_string(),
                    line: self.definition_line(f.range.start(), &f.decorator_list),
                    is_async: true,
                    body: self.block(&f.body),
                }));
            }
            Stmt::ClassDef(c) => {
                self.exprs(&c.decorator_list, out);
                self.exprs(&c.bases, out);
                for keyword in &c.keywords {
                    self.expr(&keyword.value, out);
                }
                out.push(Node::Class(ClassDef {
                    name: c.name.to_string(),
                    line: self.definition_line(c.range.start(), &c.decorator_list),
                    body: self.block(&c.body),
                }));
            }
            Stmt::Return(r) => self.opt_expr(r.value.as_deref(), out),
            Stmt::Delete(d) => self.exprs(&d.targets, out),
            Stmt::Assign(a) => {
                self.exprs(&a.targets, out);
                self.expr(&a.value, out);
            }
            Stmt::AugAssign(a) => {
                self.expr(&a.target, out);
                self.expr(&a.value, out);
            }
            Stmt::AnnAssign(a) => {
                self.expr(&a.target, out);
                self.expr(&a.annotation, out);
                self.opt_expr(a.value.as_deref(), out);
            }
            Stmt::For(f) => {
                let children = self.loop_children(&f.target, &f.iter, &f.body);
                out.push(Node::Loop(LoopBlock {
                    kind: LoopKind::For,
                    line: self.line_at(f.range.start()),
                    children,
                }));
                self.stmts(&f.orelse, out);
            }
            Stmt::AsyncFor(f) => {
                let children = self.loop_children(&f.target, &f.iter, &f.body);
                out.push(Node::Loop(LoopBlock {
                    kind: LoopKind::AsyncFor,
                    line: self.line_at(f.range.start()),
                    children,
                }));
                self.stmts(&f.orelse, out);
            }
            Stmt::While(w) => {
                let mut children = Vec::new();
                self.expr(&w.test, &mut children);
                self.stmts(&w.body, &mut children);
                out.push(Node::Loop(LoopBlock {
                    kind: LoopKind::While,
                    line: self.line_at(w.range.start()),
                    children,
                }));
                self.stmts(&w.orelse, out);
            }
            Stmt::If(i) => {
                // `elif` arrives as a nested If in orelse, so it becomes its own Branch
                let mut children = Vec::new();
                self.expr(&i.test, &mut children);
                self.stmts(&i.body, &mut children);
                out.push(Node::Branch(Block {
                    line: self.line_at(i.range.start()),
                    children,
                }));
                self.stmts(&i.orelse, out);
            }
            Stmt::With(w) => {
                self.with_items(&w.items, out);
                self.stmts(&w.body, out);
            }
            Stmt::AsyncWith(w) => {
                self.with_items(&w.items, out);
                self.stmts(&w.body, out);
            }
            Stmt::Match(m) => {
                self.expr(&m.subject, out);
                for case in &m.cases {
                    self.opt_expr(case.guard.as_deref(), out);
                    self.stmts(&case.body, out);
                }
            }
            Stmt::Raise(r) => {
                self.opt_expr(r.exc.as_deref(), out);
                self.opt_expr(r.cause.as_deref(), out);
            }
            Stmt::Try(t) => self.try_block(&t.body, &t.handlers, &t.orelse, &t.finalbody, out),
            Stmt::TryStar(t) => {
                self.try_block(&t.body, &t.handlers, &t.orelse, &t.finalbody, out)
            }
            Stmt::Assert(a) => {
                self.expr(&a.test, out);
                self.opt_expr(a.msg.as_deref(), out);
            }
            Stmt::Expr(e) => self.expr(&e.value, out),
            // import, global, pass, break, continue...: no structure
            _ => {}
        }
    }

    fn block(&self, stmts: &[Stmt]) -> Vec<Node> {
        let mut nodes = Vec::new();
        self.stmts(stmts, &mut nodes);
        nodes
    }

    /// Decorators, default values and the return annotation are evaluated in
    /// the enclosing scope
    fn scope_prelude(
        &self,
        decorators: &[Expr],
        args: &Arguments,
        returns: Option<&Expr>,
        out: &mut Vec<Node>,
    ) {
        self.exprs(decorators, out);
        self.defaults(args, out);
        self.opt_expr(returns, out);
    }

    fn defaults(&self, args: &Arguments, out: &mut Vec<Node>) {
        for arg in args
            .posonlyargs
            .iter()
            .chain(&args.args)
            .chain(&args.kwonlyargs)
        {
            self.opt_expr(arg.default.as_deref(), out);
        }
    }

    fn loop_children(&self, target: &Expr, iter: &Expr, body: &[Stmt]) -> Vec<Node> {
        let mut children = Vec::new();
        self.expr(target, &mut children);
        self.expr(iter, &mut children);
        self.stmts(body, &mut children);
        children
    }

    fn with_items(&self, items: &[ast::WithItem], out: &mut Vec<Node>) {
        for item in items {
            self.expr(&item.context_expr, out);
            self.opt_expr(item.optional_vars.as_deref(), out);
        }
    }

    fn try_block(
        &self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
        out: &mut Vec<Node>,
    ) {
        self.stmts(body, out);
        for handler in handlers {
            let ExceptHandler::ExceptHandler(h) = handler;
            let mut children = Vec::new();
            self.opt_expr(h.type_.as_deref(), &mut children);
            self.stmts(&h.body, &mut children);
            out.push(Node::Handler(Block {
                line: self.line_at(h.range.start()),
                children,
            }));
        }
        self.stmts(orelse, out);
        self.stmts(finalbody, out);
    }

    fn exprs(&self, exprs: &[Expr], out: &mut Vec<Node>) {
        for expr in exprs {
            self.expr(expr, out);
        }
    }

    fn opt_expr(&self, expr: Option<&Expr>, out: &mut Vec<Node>) {
        if let Some(expr) = expr {
            self.expr(expr, out);
        }
    }

    fn comprehension(&self, generators: &[Comprehension], out: &mut Vec<Node>) {
        for generator in generators {
            self.expr(&generator.target, out);
            self.expr(&generator.iter, out);
            self.exprs(&generator.ifs, out);
        }
    }

    fn expr(&self, expr: &Expr, out: &mut Vec<Node>) {
        match expr {
            Expr::BoolOp(b) => {
                let mut children = Vec::new();
                self.exprs(&b.values, &mut children);
                out.push(Node::BoolOp(BoolChain {
                    line: self.line_at(b.range.start()),
                    operands: b.values.len(),
                    children,
                }));
            }
            Expr::Name(n) => {
                if matches!(n.ctx, ExprContext::Store) {
                    out.push(Node::Binding(Binding {
                        name: n.id.to_string(),
                        line: self.line_at(n.range.start()),
                    }));
                }
            }
            Expr::NamedExpr(n) => {
                self.expr(&n.target, out);
                self.expr(&n.value, out);
            }
            Expr::BinOp(b) => {
                self.expr(&b.left, out);
                self.expr(&b.right, out);
            }
            Expr::UnaryOp(u) => self.expr(&u.operand, out),
            Expr::Lambda(l) => {
                self.defaults(&l.args, out);
                self.expr(&l.body, out);
            }
            Expr::IfExp(i) => {
                self.expr(&i.test, out);
                self.expr(&i.body, out);
                self.expr(&i.orelse, out);
            }
            Expr::Dict(d) => {
                for key in d.keys.iter().flatten() {
                    self.expr(key, out);
                }
                self.exprs(&d.values, out);
            }
            Expr::Set(s) => self.exprs(&s.elts, out),
            Expr::ListComp(c) => {
                self.comprehension(&c.generators, out);
                self.expr(&c.elt, out);
            }
            Expr::SetComp(c) => {
                self.comprehension(&c.generators, out);
                self.expr(&c.elt, out);
            }
            Expr::GeneratorExp(c) => {
                self.comprehension(&c.generators, out);
                self.expr(&c.elt, out);
            }
            Expr::DictComp(c) => {
                self.comprehension(&c.generators, out);
                self.expr(&c.key, out);
                self.expr(&c.value, out);
            }
            Expr::Await(a) => self.expr(&a.value, out),
            Expr::Yield(y) => self.opt_expr(y.value.as_deref(), out),
            Expr::YieldFrom(y) => self.expr(&y.value, out),
            Expr::Compare(c) => {
                self.expr(&c.left, out);
                self.exprs(&c.comparators, out);
            }
            Expr::Call(c) => {
                self.expr(&c.func, out);
                self.exprs(&c.args, out);
                for keyword in &c.keywords {
                    self.expr(&keyword.value, out);
                }
            }
            Expr::FormattedValue(f) => {
                self.expr(&f.value, out);
                self.opt_expr(f.format_spec.as_deref(), out);
            }
            Expr::JoinedStr(j) => self.exprs(&j.values, out),
            Expr::Attribute(a) => self.expr(&a.value, out),
            Expr::Subscript(s) => {
                self.expr(&s.value, out);
                self.expr(&s.slice, out);
            }
            Expr::Starred(s) => self.expr(&s.value, out),
            Expr::List(l) => self.exprs(&l.elts, out),
            Expr::Tuple(t) => self.exprs(&t.elts, out),
            Expr::Slice(s) => {
                self.opt_expr(s.lower.as_deref(), out);
                self.opt_expr(s.upper.as_deref(), out);
                self.opt_expr(s.step.as_deref(), out);
            }
            // constants
            _ => {}
        }
    }
}
