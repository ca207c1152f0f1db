//! Host-materialized program model for the evlint analyzer.
//!
//! This crate stands in for the two capabilities a host compiler would
//! provide: tree navigation ([`TreeArena`]) and symbol information
//! ([`SymbolBank`]). Trees are built with [`ProgramBuilder`], bound once per
//! pass with [`SymbolBank::bind`], and treated as immutable afterwards — fix
//! synthesis clones the arena and mutates the clone.

pub mod arena;
pub mod builder;
pub mod node;
pub mod symbols;
pub mod well_known;

pub use arena::TreeArena;
pub use builder::ProgramBuilder;
pub use node::{
    AttributeData, BinaryOp, BlockData, CallData, ClassData, FieldData, MethodData, Node,
    NodeIndex, NodeKind, Param, method_flags,
};
pub use symbols::{AmbientTypes, CallTarget, SymbolBank, TypeId, TypeInfo};
pub use well_known::WellKnownNames;
