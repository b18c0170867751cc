//! The Type value model (spec.md C1) and structural subtyping/equality
//! (spec.md C2): an interned `Type` arena plus a pure type-algebra
//! `Judge`, free of any TypeScript-specific checker quirks.

pub mod type_def;
pub use type_def::{
    ArrayElement, FieldInfo, LiteralValue, ParamInfo, Primitive, ScalarBase, Type, TypeMetadata,
};

pub mod arena;
pub use arena::{TypeArena, TypeId};

pub mod normalize;

pub mod metadata;
pub use metadata::{substitute_this, unwrap_metadata};

pub mod equality;
pub use equality::types_equal;

pub mod judge;
pub use judge::{runtime_usable, DefaultJudge, Judge};

pub mod render;
pub use render::render_type;

pub mod value;
pub use value::{BuiltinId, Closure, ClosureParam, Raw, Value};
