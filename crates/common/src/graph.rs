//! The node-graph intermediate representation consumed by the validator
//! and compiler.
//!
//! Graphs arrive here already parsed from whatever authoring format the
//! content pipeline uses. A graph is a collection of nodes, an entry id,
//! and a singly linked control-flow chain threaded through each node's
//! `next` field; data flows separately through each node's ordered
//! `inputs` list.

/// What a graph is for. Drives which execution entry point runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// Performs gameplay effects when an ability fires.
    Effect,
    /// Computes a pass/reject verdict in boolean register 0.
    Validation,
}

/// One IR node: an opcode-name reference plus its wiring and literals.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Unique id within the graph.
    pub id: String,
    /// Opcode name, resolved against the catalog at compile time.
    pub op: String,
    /// Control-flow successor. `None` ends the chain.
    pub next: Option<String>,
    /// Data dependencies, in operand-slot order.
    pub inputs: Vec<String>,
    /// Float literal / radius / length, where the opcode wants one.
    pub float_value: Option<f32>,
    /// Int literal / jump offset / limit / mask / angle / hex radius.
    pub int_value: Option<i32>,
    /// Bool literal.
    pub bool_value: Option<bool>,
    /// Symbolic name: tag, attribute, effect template, scratch or
    /// config key. Interned by the compiler.
    pub name: Option<String>,
    /// Secondary shape dimension (rectangle or capsule half-width).
    pub extent: Option<f32>,
}

impl GraphNode {
    /// A bare node with the given id and opcode name.
    pub fn new(id: impl Into<String>, op: impl Into<String>) -> Self {
        GraphNode {
            id: id.into(),
            op: op.into(),
            next: None,
            inputs: Vec::new(),
            float_value: None,
            int_value: None,
            bool_value: None,
            name: None,
            extent: None,
        }
    }

    pub fn next(mut self, id: impl Into<String>) -> Self {
        self.next = Some(id.into());
        self
    }

    pub fn input(mut self, id: impl Into<String>) -> Self {
        self.inputs.push(id.into());
        self
    }

    pub fn float(mut self, value: f32) -> Self {
        self.float_value = Some(value);
        self
    }

    pub fn int(mut self, value: i32) -> Self {
        self.int_value = Some(value);
        self
    }

    pub fn boolean(mut self, value: bool) -> Self {
        self.bool_value = Some(value);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn extent(mut self, value: f32) -> Self {
        self.extent = Some(value);
        self
    }
}

/// A parsed ability graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// Unique graph id; also the scope for config-parameter reads.
    pub id: String,
    pub kind: GraphKind,
    /// Id of the first node on the control-flow chain.
    pub entry: String,
    pub nodes: Vec<GraphNode>,
}

impl Graph {
    pub fn new(id: impl Into<String>, kind: GraphKind, entry: impl Into<String>) -> Self {
        Graph {
            id: id.into(),
            kind,
            entry: entry.into(),
            nodes: Vec::new(),
        }
    }

    pub fn node(mut self, node: GraphNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Find a node by id. Linear scan; graphs are small.
    pub fn find(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
