//! Declarative construction of GraphQL mutation fields.
//!
//! A mutation is described explicitly — argument set, payload fields (or an
//! explicit output type), interfaces the payload implements, and a mutate
//! function — and built into the field descriptor that schema-assembly and
//! execution engines consume: output type, argument map and resolver.
//!
//! Query parsing, validation and execution live in the consuming engine;
//! this crate only covers the construction-time transformation.

pub mod ast;
pub mod mutation;
pub mod schema;
