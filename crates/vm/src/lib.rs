//! Hexweave VM — table-dispatched execution of compiled ability graphs.
//!
//! One Execute call is single-threaded, synchronous, and run-to-
//! completion: it either finishes or aborts with a fatal [`ExecError`].
//! All per-call storage ([`RegisterFile`], [`TargetList`], query scratch)
//! is fixed-capacity and allocated fresh per call, so independent
//! executions are safe across threads as long as each owns its state and
//! the shared [`HostApi`] implementation tolerates it — the VM performs
//! no locking of its own.
//!
//! # Usage
//!
//! ```
//! use hexweave_common::{EntityHandle, Graph, GraphKind, GraphNode};
//! use hexweave_compiler::compile;
//! use hexweave_vm::{execute_effect, DispatchTable, EffectContext, NullHost};
//!
//! let graph = Graph::new("bolt", GraphKind::Effect, "dmg")
//!     .node(GraphNode::new("dmg", "ConstFloat").float(5.0));
//! let (program, _) = compile(&graph);
//!
//! let mut host = NullHost;
//! let ctx = EffectContext::new(EntityHandle::from_raw(1), EntityHandle::NONE);
//! let regs = execute_effect(&program.unwrap(), DispatchTable::cached(), &mut host, ctx).unwrap();
//! assert_eq!(regs.float(0), Some(5.0));
//! ```

pub mod dispatch;
pub mod error;
pub mod exec;
pub mod host;
pub mod state;
pub mod targets;

// Re-export the public surface at the crate root.
pub use dispatch::{DispatchTable, OpHandler, DISPATCH_CAPACITY};
pub use error::ExecError;
pub use exec::{
    execute_effect, execute_effect_inline, execute_validation, execute_validation_inline,
    MAX_STEPS_PER_EXECUTION, VERDICT_REGISTER,
};
pub use host::{HostApi, NullHost};
pub use state::{EffectContext, ExecState, RegisterFile};
pub use targets::{TargetList, MAX_TARGETS};
