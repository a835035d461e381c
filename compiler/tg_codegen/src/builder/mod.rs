//! Graph linearization.
//!
//! [`CodeBuilder`] visits the graph in ordinal order and declares every
//! planned node as a variable. A slot whose value is not declared yet gets a
//! zero placeholder and a patch; patches run after all declarations, and the
//! function returns the root's expression.
//!
//! A pointer never gets a variable of its own. It collapses onto the variable
//! holding its pointee and is spelled `&var` from then on.

use rustc_hash::{FxHashMap, FxHashSet};
use tg_graph::{ensure_sufficient_stack, Graph, Node, NodeId, NodeKind, Zero};
use tracing::{debug, trace};

use crate::literal::render_scalar;
use crate::names::display_type;
use crate::patch::{Patch, PatchQueue};
use crate::plan::DeclarationPlan;
use crate::writer::SourceWriter;
use crate::CodegenOptions;

/// How an emitted node is spelled.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Binding {
    /// The node's value is held in the variable.
    Value(String),
    /// The node is a pointer to the variable.
    AddressOf(String),
}

impl Binding {
    fn expr(&self) -> String {
        match self {
            Binding::Value(var) => var.clone(),
            Binding::AddressOf(var) => format!("&{var}"),
        }
    }
}

/// An assignable location inside a declared variable.
#[derive(Clone, Debug)]
struct Lhs {
    base: String,
    expr: String,
}

impl Lhs {
    fn var(name: &str) -> Self {
        Lhs {
            base: name.to_string(),
            expr: name.to_string(),
        }
    }

    fn field(&self, name: &str) -> Self {
        Lhs {
            base: self.base.clone(),
            expr: format!("{}.{name}", self.expr),
        }
    }

    fn index(&self, ordinal: u32) -> Self {
        Lhs {
            base: self.base.clone(),
            expr: format!("{}[{ordinal}]", self.expr),
        }
    }

    fn key(&self, key: &str) -> Self {
        Lhs {
            base: self.base.clone(),
            expr: format!("{}[{key}]", self.expr),
        }
    }
}

/// Renders one graph as a Go function returning the graph's root value.
pub struct CodeBuilder<'g> {
    graph: &'g Graph,
    options: CodegenOptions,
    plan: DeclarationPlan,
    bindings: FxHashMap<NodeId, Binding>,
    /// Nodes whose declaration has started but not finished.
    in_progress: FxHashSet<NodeId>,
    var_counter: u32,
    declarations: Vec<String>,
    patches: PatchQueue,
}

impl<'g> CodeBuilder<'g> {
    pub fn new(graph: &'g Graph, options: CodegenOptions) -> Self {
        CodeBuilder {
            graph,
            plan: DeclarationPlan::new(graph),
            options,
            bindings: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            var_counter: 0,
            declarations: Vec::new(),
            patches: PatchQueue::default(),
        }
    }

    /// Generate the function source.
    pub fn build(mut self) -> String {
        let graph = self.graph;
        for (id, _) in graph.iter() {
            if self.plan.is_declared(id) && !self.bindings.contains_key(&id) {
                self.declare(id);
            }
        }

        let root = graph.root();
        let return_type = self.declared_type(graph.node(root));
        let return_expr = self.expr(root);
        let deferred = self.patches.len();
        let patches: Vec<String> = self
            .patches
            .schedule(|target| match self.bindings.get(&target) {
                Some(Binding::Value(var)) => Some(var.clone()),
                _ => None,
            })
            .into_iter()
            .map(|patch| format!("{} = {}", patch.lhs, self.expr(patch.target)))
            .collect();
        debug!(
            declarations = self.declarations.len(),
            patches = deferred,
            func = %self.options.func_name,
            "generated function"
        );

        let mut writer = SourceWriter::new(&self.options.indent);
        writer.writeln(&format!(
            "func {}() {return_type} {{",
            self.options.func_name
        ));
        writer.indent();
        for line in self.declarations.iter().chain(&patches) {
            writer.writeln(line);
        }
        writer.writeln(&format!("return {return_expr}"));
        writer.dedent();
        writer.write("}");
        writer.finish()
    }

    fn declare(&mut self, id: NodeId) {
        let graph = self.graph;
        let node = graph.node(id);
        self.in_progress.insert(id);
        match &node.kind {
            NodeKind::Pointer => self.declare_pointer(id),
            // `nil` has no type of its own, so `:=` cannot declare it.
            NodeKind::Opaque(text) if text == "nil" => {
                let var = self.fresh_var();
                let ty = self.declared_type(node);
                self.declarations.push(format!("var {var} {ty}"));
                self.bind(id, Binding::Value(var));
            }
            NodeKind::Nil => {
                let var = self.fresh_var();
                let ty = self.declared_type(node);
                self.declarations.push(format!("var {var} {ty}"));
                self.bind(id, Binding::Value(var));
            }
            NodeKind::Box => {
                let var = self.fresh_var();
                let inner = self.render_slot(node.child(), &Lhs::var(&var), false);
                let ty = self.declared_type(node);
                self.declarations.push(format!("{var} := {ty}({inner})"));
                self.bind(id, Binding::Value(var));
            }
            NodeKind::Scalar { .. }
            | NodeKind::Opaque(_)
            | NodeKind::Struct
            | NodeKind::Slice
            | NodeKind::Array
            | NodeKind::Map => {
                let var = self.fresh_var();
                let literal = self.render_inline(id, &Lhs::var(&var), false);
                self.declarations.push(format!("{var} := {literal}"));
                self.bind(id, Binding::Value(var));
            }
            NodeKind::Reference(_)
            | NodeKind::FieldSlot { .. }
            | NodeKind::ElementSlot { .. }
            | NodeKind::MapKey { .. } => {
                panic!(
                    "internal invariant violated: {} node {id} cannot be declared",
                    node.kind.label()
                )
            }
        }
        self.in_progress.remove(&id);
    }

    /// Collapse a pointer onto the variable that holds its pointee.
    fn declare_pointer(&mut self, id: NodeId) {
        let graph = self.graph;
        let pointee = graph.node(id).child();
        let target = match graph.node(pointee).kind {
            NodeKind::Reference(target) => target,
            _ => pointee,
        };
        if !self.bindings.contains_key(&target) && !self.in_progress.contains(&target) {
            self.declare(target);
        }
        let storage = self.storage_of(target);
        trace!(pointer = id.raw(), storage = %storage, "collapsed pointer");
        self.bind(id, Binding::AddressOf(storage));
    }

    /// A variable holding exactly the value of `id`, creating one if needed.
    fn storage_of(&mut self, id: NodeId) -> String {
        match self.bindings.get(&id).cloned() {
            Some(Binding::Value(var)) => var,
            Some(Binding::AddressOf(var)) => {
                let storage = self.fresh_var();
                self.declarations.push(format!("{storage} := &{var}"));
                self.bind(id, Binding::Value(storage.clone()));
                storage
            }
            None => {
                // `id` is still being declared further up; hold its value in a
                // placeholder variable assigned once it exists.
                let graph = self.graph;
                let node = graph.node(id);
                let storage = self.fresh_var();
                let ty = self.declared_type(node);
                self.declarations.push(format!("var {storage} {ty}"));
                self.patches.push(Patch {
                    lhs: storage.clone(),
                    base: storage.clone(),
                    target: id,
                    copies: copies_value(&node.kind),
                });
                storage
            }
        }
    }

    /// Render the value child of a slot.
    fn render_slot(&mut self, id: NodeId, lhs: &Lhs, forced: bool) -> String {
        let graph = self.graph;
        let node = graph.node(id);
        match node.kind {
            NodeKind::Reference(target) => self.render_target(target, node, lhs, forced),
            _ if self.plan.is_declared(id) => self.render_target(id, node, lhs, forced),
            _ => self.render_inline(id, lhs, forced),
        }
    }

    /// Render a slot holding a declared node.
    ///
    /// `forced` is set inside map keys, which cannot be patched: the target
    /// is declared on the spot instead.
    fn render_target(&mut self, target: NodeId, slot_value: &Node, lhs: &Lhs, forced: bool) -> String {
        if forced {
            if !self.bindings.contains_key(&target) {
                if self.in_progress.contains(&target) {
                    panic!("internal invariant violated: map key needs {target} while it is being declared");
                }
                self.declare(target);
            }
            return self.expr(target);
        }

        let copies = copies_value(&self.graph.node(target).kind);
        if let Some(binding) = self.bindings.get(&target) {
            let stale = match binding {
                Binding::Value(var) => copies && self.patches.writes_into(var),
                Binding::AddressOf(_) => false,
            };
            if !stale {
                return binding.expr();
            }
        }
        trace!(lhs = %lhs.expr, target = target.raw(), "deferred slot");
        self.patches.push(Patch {
            lhs: lhs.expr.clone(),
            base: lhs.base.clone(),
            target,
            copies,
        });
        self.placeholder(slot_value)
    }

    /// Render a node as a literal expression.
    fn render_inline(&mut self, id: NodeId, lhs: &Lhs, forced: bool) -> String {
        let graph = self.graph;
        let node = graph.node(id);
        ensure_sufficient_stack(|| match &node.kind {
            NodeKind::Scalar { kind, lit } => render_scalar(*kind, lit, &self.type_of(node)),
            NodeKind::Nil => "nil".to_string(),
            NodeKind::Opaque(text) => text.clone(),
            NodeKind::Box => self.render_slot(node.child(), lhs, forced),
            NodeKind::Struct => {
                let mut out = format!("{}{{", self.type_of(node));
                for &slot in &node.children {
                    let slot_node = graph.node(slot);
                    let NodeKind::FieldSlot { name, .. } = &slot_node.kind else {
                        panic!("internal invariant violated: struct child {slot} is not a field slot");
                    };
                    let value = self.render_slot(slot_node.child(), &lhs.field(name), forced);
                    out.push_str(name);
                    out.push(':');
                    out.push_str(&value);
                    out.push(',');
                }
                out.push('}');
                out
            }
            NodeKind::Slice | NodeKind::Array => {
                let mut out = format!("{}{{", self.type_of(node));
                for &slot in &node.children {
                    let slot_node = graph.node(slot);
                    let NodeKind::ElementSlot { ordinal } = slot_node.kind else {
                        panic!("internal invariant violated: element child {slot} is not an element slot");
                    };
                    let value = self.render_slot(slot_node.child(), &lhs.index(ordinal), forced);
                    out.push_str(&value);
                    out.push(',');
                }
                out.push('}');
                out
            }
            NodeKind::Map => {
                let mut out = format!("{}{{", self.type_of(node));
                for &slot in &node.children {
                    let slot_node = graph.node(slot);
                    let &[key, value] = slot_node.children.as_slice() else {
                        panic!("internal invariant violated: map entry {slot} needs a key and a value");
                    };
                    let key = self.render_slot(key, lhs, true);
                    let value = self.render_slot(value, &lhs.key(&key), forced);
                    out.push_str(&key);
                    out.push(':');
                    out.push_str(&value);
                    out.push(',');
                }
                out.push('}');
                out
            }
            NodeKind::Pointer
            | NodeKind::Reference(_)
            | NodeKind::FieldSlot { .. }
            | NodeKind::ElementSlot { .. }
            | NodeKind::MapKey { .. } => panic!(
                "internal invariant violated: {} node {id} cannot be rendered inline",
                node.kind.label()
            ),
        })
    }

    /// The zero value standing in for a slot until its patch runs.
    fn placeholder(&self, node: &Node) -> String {
        match node.zero {
            Zero::Nil => "nil".to_string(),
            Zero::Composite => format!("{}{{}}", self.type_of(node)),
            Zero::Number => "0".to_string(),
            Zero::Bool => "false".to_string(),
            Zero::String => "\"\"".to_string(),
        }
    }

    fn expr(&self, id: NodeId) -> String {
        match self.bindings.get(&id) {
            Some(binding) => binding.expr(),
            None => panic!("internal invariant violated: {id} was never declared"),
        }
    }

    fn bind(&mut self, id: NodeId, binding: Binding) {
        trace!(node = id.raw(), binding = %binding.expr(), "bound");
        self.bindings.insert(id, binding);
    }

    fn fresh_var(&mut self) -> String {
        self.var_counter += 1;
        format!("var{}", self.var_counter)
    }

    fn type_of(&self, node: &Node) -> String {
        display_type(&node.type_name, &self.options.omit_qualifier)
    }

    /// The type to declare a variable of `node`'s value with.
    fn declared_type(&self, node: &Node) -> String {
        if node.kind == NodeKind::Nil && node.type_name == "nil" {
            "any".to_string()
        } else {
            self.type_of(node)
        }
    }
}

/// Whether spelling a node's variable copies its value.
fn copies_value(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Pointer | NodeKind::Slice | NodeKind::Map
    )
}

#[cfg(test)]
mod tests;
