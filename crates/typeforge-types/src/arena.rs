//! The interned type arena. Two structurally equal `Type`s (after
//! `normalize`'s flattening) always receive the same `TypeId`, which makes
//! the separate `equality::types_equal` traversal mostly a fast path over
//! already-deduplicated ids, reserved for cases metadata stripping hides.

use rustc_hash::FxHashMap;
use typeforge_common::{Atom, Interner};

use crate::normalize;
use crate::type_def::{ArrayElement, FieldInfo, LiteralValue, ParamInfo, Primitive, Type, TypeMetadata};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl std::fmt::Debug for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

pub struct TypeArena {
    types: Vec<Type>,
    lookup: FxHashMap<Type, TypeId>,
    strings: Interner,
    well_known: WellKnown,
}

#[derive(Clone, Copy)]
struct WellKnown {
    never: TypeId,
    unknown: TypeId,
    int: TypeId,
    float: TypeId,
    number: TypeId,
    string: TypeId,
    boolean: TypeId,
    null: TypeId,
    undefined: TypeId,
    void: TypeId,
    type_meta: TypeId,
}

impl TypeArena {
    pub fn new() -> Self {
        let mut types = Vec::new();
        let mut lookup = FxHashMap::default();

        let mut intern_primitive = |types: &mut Vec<Type>,
                                     lookup: &mut FxHashMap<Type, TypeId>,
                                     prim: Primitive| {
            let ty = Type::Primitive(prim);
            let id = TypeId(types.len() as u32);
            types.push(ty.clone());
            lookup.insert(ty, id);
            id
        };

        let never = intern_primitive(&mut types, &mut lookup, Primitive::Never);
        let unknown = intern_primitive(&mut types, &mut lookup, Primitive::Unknown);
        let int = intern_primitive(&mut types, &mut lookup, Primitive::Int);
        let float = intern_primitive(&mut types, &mut lookup, Primitive::Float);
        let number = intern_primitive(&mut types, &mut lookup, Primitive::Number);
        let string = intern_primitive(&mut types, &mut lookup, Primitive::String);
        let boolean = intern_primitive(&mut types, &mut lookup, Primitive::Boolean);
        let null = intern_primitive(&mut types, &mut lookup, Primitive::Null);
        let undefined = intern_primitive(&mut types, &mut lookup, Primitive::Undefined);
        let void = intern_primitive(&mut types, &mut lookup, Primitive::Void);
        let type_meta = intern_primitive(&mut types, &mut lookup, Primitive::Type);

        TypeArena {
            types,
            lookup,
            strings: Interner::new(),
            well_known: WellKnown {
                never,
                unknown,
                int,
                float,
                number,
                string,
                boolean,
                null,
                undefined,
                void,
                type_meta,
            },
        }
    }

    pub fn never(&self) -> TypeId {
        self.well_known.never
    }
    pub fn unknown(&self) -> TypeId {
        self.well_known.unknown
    }
    pub fn int(&self) -> TypeId {
        self.well_known.int
    }
    pub fn float(&self) -> TypeId {
        self.well_known.float
    }
    pub fn number(&self) -> TypeId {
        self.well_known.number
    }
    pub fn string(&self) -> TypeId {
        self.well_known.string
    }
    pub fn boolean(&self) -> TypeId {
        self.well_known.boolean
    }
    pub fn null(&self) -> TypeId {
        self.well_known.null
    }
    pub fn undefined(&self) -> TypeId {
        self.well_known.undefined
    }
    pub fn void(&self) -> TypeId {
        self.well_known.void
    }
    pub fn type_meta(&self) -> TypeId {
        self.well_known.type_meta
    }

    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.lookup.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.lookup.insert(ty, id);
        id
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn intern_string(&mut self, s: &str) -> Atom {
        self.strings.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> &str {
        self.strings.resolve(atom)
    }

    // ---- constructors mirroring the built-in catalog (spec.md §6):
    // `RecordType, Union, Intersection, FunctionType, Array, WithMetadata,
    // Branded, LiteralType`.

    pub fn make_literal(&mut self, value: LiteralValue) -> TypeId {
        let base = value.base();
        self.intern(Type::Literal { value, base })
    }

    pub fn make_record(&mut self, fields: Vec<FieldInfo>, index_type: Option<TypeId>, closed: bool) -> TypeId {
        let fields = normalize::dedupe_fields(fields);
        self.intern(Type::Record {
            fields,
            index_type,
            closed,
        })
    }

    pub fn make_array(&mut self, elements: Vec<ArrayElement>) -> TypeId {
        self.intern(Type::Array { elements })
    }

    pub fn make_function(&mut self, mut params: Vec<ParamInfo>, return_type: TypeId, is_async: bool) -> TypeId {
        normalize::canonicalize_rest_params(&mut params);
        self.intern(Type::Function {
            params,
            return_type,
            is_async,
        })
    }

    pub fn make_union(&mut self, members: Vec<TypeId>) -> TypeId {
        normalize::make_union(self, members)
    }

    pub fn make_intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        normalize::make_intersection(self, members)
    }

    pub fn make_branded(&mut self, base: TypeId, brand: Atom, name: Atom) -> TypeId {
        self.intern(Type::Branded { base, brand, name })
    }

    pub fn make_type_var(&mut self, name: Atom, bound: Option<TypeId>) -> TypeId {
        self.intern(Type::TypeVar { name, bound })
    }

    pub fn make_this(&mut self) -> TypeId {
        self.intern(Type::This)
    }

    pub fn make_with_metadata(&mut self, base: TypeId, metadata: TypeMetadata) -> TypeId {
        self.intern(Type::WithMetadata { base, metadata })
    }

    pub fn make_bounded(&mut self, bound: TypeId) -> TypeId {
        self.intern(Type::Bounded { bound })
    }

    pub fn make_keyof(&mut self, operand: TypeId) -> TypeId {
        self.intern(Type::Keyof { operand })
    }

    pub fn make_indexed_access(&mut self, object: TypeId, index: TypeId) -> TypeId {
        self.intern(Type::IndexedAccess { object, index })
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/arena_tests.rs"]
mod arena_tests;
