//! The central `Type` discriminated variant (spec.md §3.1).
//!
//! Every Type is exactly one of the variants below; there is no open-world
//! escape hatch. Field order inside `Record` is observable to reflection
//! (C5's `fieldNames`), so it is a `Vec`, not a map.

use typeforge_common::Atom;

use crate::arena::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Never,
    Unknown,
    /// No runtime representation; the type of things that only exist at
    /// compile time (e.g. `const`-bound lambdas whose body never runs).
    Void,
    /// The reified metatype: `Type` is itself a `Type`, i.e. `Type : Type`.
    Type,
}

/// The base scalar kind a `Literal` type singles out one value of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarBase {
    Int,
    Float,
    String,
    Boolean,
}

/// A concrete scalar value, as carried by a `Literal` type or a raw typed
/// value (`crate::value::Raw::Scalar`). Floats are hashed/compared by bit
/// pattern so `LiteralValue` can derive `Eq`/`Hash` for arena interning.
#[derive(Clone, Copy, Debug)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(Atom),
    Bool(bool),
}

impl LiteralValue {
    pub fn base(&self) -> ScalarBase {
        match self {
            LiteralValue::Int(_) => ScalarBase::Int,
            LiteralValue::Float(_) => ScalarBase::Float,
            LiteralValue::Str(_) => ScalarBase::String,
            LiteralValue::Bool(_) => ScalarBase::Boolean,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::Int(a), LiteralValue::Int(b)) => a == b,
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a.to_bits() == b.to_bits(),
            (LiteralValue::Str(a), LiteralValue::Str(b)) => a == b,
            (LiteralValue::Bool(a), LiteralValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for LiteralValue {}

impl std::hash::Hash for LiteralValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::Int(v) => v.hash(state),
            LiteralValue::Float(v) => v.to_bits().hash(state),
            LiteralValue::Str(v) => v.hash(state),
            LiteralValue::Bool(v) => v.hash(state),
        }
    }
}

/// One field of a `Record` type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub optional: bool,
}

/// One element of an `Array` type. An array is variadic (rest-like) iff
/// any element has `spread = true`; a fully non-spread array is a
/// fixed-length tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayElement {
    pub ty: TypeId,
    pub label: Option<Atom>,
    pub spread: bool,
}

/// One parameter of a `Function` type. At most one parameter has
/// `rest = true`, and it must be last (enforced by `TypeArena::make_function`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// Metadata attached by `WithMetadata`. Transparent to subtyping; only
/// affects display and reflective `.typeArgs`/`.annotation(A)` access.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeMetadata {
    pub display_name: Option<Atom>,
    pub type_args: Vec<TypeId>,
    /// Typed annotations, each paired with its declared type (spec.md §3.1:
    /// "typed annotations (each paired with its declared type)").
    pub annotations: Vec<Annotation>,
}

impl TypeMetadata {
    pub fn named(display_name: Atom) -> Self {
        TypeMetadata {
            display_name: Some(display_name),
            type_args: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub declared_type: TypeId,
    pub value: crate::value::Value,
}

/// The central Type variant (spec.md §3.1).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(Primitive),
    Literal {
        value: LiteralValue,
        base: ScalarBase,
    },
    Record {
        fields: Vec<FieldInfo>,
        index_type: Option<TypeId>,
        closed: bool,
    },
    Array {
        elements: Vec<ArrayElement>,
    },
    Function {
        params: Vec<ParamInfo>,
        return_type: TypeId,
        is_async: bool,
    },
    /// Flattened, length >= 2 by construction.
    Union(Vec<TypeId>),
    /// Flattened; any `Never` member collapses the whole to `Never`.
    Intersection(Vec<TypeId>),
    Branded {
        base: TypeId,
        brand: Atom,
        name: Atom,
    },
    TypeVar {
        name: Atom,
        bound: Option<TypeId>,
    },
    This,
    WithMetadata {
        base: TypeId,
        metadata: TypeMetadata,
    },
    /// The metatype `Type<Bound>`.
    Bounded {
        bound: TypeId,
    },
    Keyof {
        operand: TypeId,
    },
    IndexedAccess {
        object: TypeId,
        index: TypeId,
    },
}

impl Type {
    /// `containsType(T) ⇒ T has no runtime representation` (spec.md §3.1
    /// invariant); this is the one-step check, not a recursive search —
    /// recursive containment is `crate::judge::contains_metatype`.
    pub fn is_metatype_shaped(&self) -> bool {
        matches!(
            self,
            Type::Primitive(Primitive::Type) | Type::Bounded { .. }
        )
    }
}
