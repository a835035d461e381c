//! Runtime values and their introspection.
//!
//! Reference-semantics kinds (pointers, slices, maps) share their storage
//! through `Rc<RefCell<..>>`, so cloning a [`Value`] of those kinds aliases the
//! same storage, and a pointer can be made to point back at a structure that
//! contains it. Structs and arrays are owned and copied by value.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::{structurally_equal, Identity, Kind, Type, TypeRef};

/// The literal payload of a scalar value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
}

/// A scalar value: a literal tagged with its (possibly named) type.
#[derive(Clone, Debug)]
pub struct ScalarValue {
    ty: TypeRef,
    lit: Literal,
}

impl ScalarValue {
    pub fn new(ty: TypeRef, lit: Literal) -> Self {
        ScalarValue { ty, lit }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn literal(&self) -> &Literal {
        &self.lit
    }
}

/// A pointer, either nil or sharing a mutable cell with its aliases.
#[derive(Clone)]
pub struct PointerValue {
    ty: TypeRef,
    cell: Option<Rc<RefCell<Value>>>,
}

impl PointerValue {
    /// Allocate a new cell holding `pointee` and point at it.
    pub fn new(elem: TypeRef, pointee: Value) -> Self {
        PointerValue {
            ty: Type::pointer_to(elem),
            cell: Some(Rc::new(RefCell::new(pointee))),
        }
    }

    /// Allocate a cell whose content is filled in later with [`store`](Self::store).
    ///
    /// This is how self-referential structures are built: allocate, build the
    /// pointee with clones of this pointer, then store it.
    pub fn alloc(elem: TypeRef) -> Self {
        Self::new(elem, Value::Nil)
    }

    /// A nil pointer to `elem`.
    pub fn nil(elem: TypeRef) -> Self {
        PointerValue {
            ty: Type::pointer_to(elem),
            cell: None,
        }
    }

    /// The pointer type, `*T`.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn is_nil(&self) -> bool {
        self.cell.is_none()
    }

    /// Borrow the pointee. `None` for a nil pointer or while the cell is
    /// being written.
    pub fn pointee(&self) -> Option<Ref<'_, Value>> {
        self.cell.as_ref().and_then(|cell| cell.try_borrow().ok())
    }

    /// Replace the pointee. Returns `false` for a nil pointer or while the
    /// cell is borrowed.
    pub fn store(&self, value: Value) -> bool {
        match &self.cell {
            Some(cell) => cell.try_borrow_mut().map(|mut slot| *slot = value).is_ok(),
            None => false,
        }
    }

    pub fn address(&self) -> Option<usize> {
        self.cell.as_ref().map(|cell| Rc::as_ptr(cell).cast::<()>() as usize)
    }
}

impl fmt::Debug for PointerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(addr) => write!(f, "({}) {addr:#x}", self.ty),
            None => write!(f, "({}) nil", self.ty),
        }
    }
}

/// An interface value boxing a dynamic value, or nil.
#[derive(Clone, Debug)]
pub struct InterfaceValue {
    ty: TypeRef,
    inner: Option<Box<Value>>,
}

impl InterfaceValue {
    /// Box `inner` in the interface type `ty`.
    ///
    /// Interfaces never hold interfaces: boxing an interface value re-boxes
    /// its dynamic value, and boxing untyped nil yields a nil interface.
    pub fn new(ty: TypeRef, inner: Value) -> Self {
        let inner = match inner {
            Value::Nil => None,
            Value::Interface(boxed) => boxed.inner,
            other => Some(Box::new(other)),
        };
        InterfaceValue { ty, inner }
    }

    /// Box `inner` in the empty interface.
    pub fn any(inner: Value) -> Self {
        Self::new(Type::any(), inner)
    }

    pub fn nil(ty: TypeRef) -> Self {
        InterfaceValue { ty, inner: None }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn is_nil(&self) -> bool {
        self.inner.is_none()
    }

    /// The dynamic value, if any.
    pub fn inner(&self) -> Option<&Value> {
        self.inner.as_deref()
    }
}

/// A named struct field and its value.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// A struct value; fields are kept in declaration order.
#[derive(Clone, Debug)]
pub struct StructValue {
    ty: TypeRef,
    fields: Vec<Field>,
}

impl StructValue {
    /// Start building a struct of type `ty`.
    pub fn builder(ty: TypeRef) -> StructBuilder {
        StructBuilder {
            value: StructValue {
                ty,
                fields: Vec::new(),
            },
        }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}

/// Builder for [`StructValue`].
#[derive(Debug)]
pub struct StructBuilder {
    value: StructValue,
}

impl StructBuilder {
    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.value.fields.push(Field {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> StructValue {
        self.value
    }
}

/// A slice: a window of `len` elements starting at `offset` in shared storage.
#[derive(Clone)]
pub struct SliceValue {
    ty: TypeRef,
    storage: Option<Rc<RefCell<Vec<Value>>>>,
    offset: usize,
    len: usize,
}

impl SliceValue {
    /// A slice over fresh storage holding `elems`.
    pub fn new(elem: TypeRef, elems: Vec<Value>) -> Self {
        let len = elems.len();
        SliceValue {
            ty: Type::slice_of(elem),
            storage: Some(Rc::new(RefCell::new(elems))),
            offset: 0,
            len,
        }
    }

    pub fn nil(elem: TypeRef) -> Self {
        SliceValue {
            ty: Type::slice_of(elem),
            storage: None,
            offset: 0,
            len: 0,
        }
    }

    /// The slice type, `[]T`.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn is_nil(&self) -> bool {
        self.storage.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the elements in the window. `None` for a nil slice or while
    /// the storage is being written.
    pub fn elements(&self) -> Option<Ref<'_, [Value]>> {
        let storage = self.storage.as_ref()?.try_borrow().ok()?;
        let (lo, hi) = (self.offset, self.offset + self.len);
        Some(Ref::map(storage, |elems| elems.get(lo..hi).unwrap_or(&[])))
    }

    /// Overwrite element `index`, visible through every slice sharing the storage.
    pub fn set(&self, index: usize, value: Value) -> bool {
        if index >= self.len {
            return false;
        }
        let Some(storage) = &self.storage else {
            return false;
        };
        let Ok(mut elems) = storage.try_borrow_mut() else {
            return false;
        };
        match elems.get_mut(self.offset + index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// `s[low:high]`, sharing storage with `self`. `high` may extend past the
    /// current length up to the capacity of the storage.
    pub fn reslice(&self, low: usize, high: usize) -> Option<SliceValue> {
        let storage = self.storage.as_ref()?;
        let capacity = storage.try_borrow().ok()?.len().checked_sub(self.offset)?;
        if low > high || high > capacity {
            return None;
        }
        Some(SliceValue {
            ty: Rc::clone(&self.ty),
            storage: Some(Rc::clone(storage)),
            offset: self.offset + low,
            len: high - low,
        })
    }

    fn storage_address(&self) -> Option<usize> {
        self.storage
            .as_ref()
            .map(|storage| Rc::as_ptr(storage).cast::<()>() as usize)
    }
}

impl fmt::Debug for SliceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage_address() {
            Some(addr) => write!(
                f,
                "({}) {addr:#x}[{}:{}]",
                self.ty,
                self.offset,
                self.offset + self.len
            ),
            None => write!(f, "({}) nil", self.ty),
        }
    }
}

/// A fixed-length array, owned by value.
#[derive(Clone, Debug)]
pub struct ArrayValue {
    ty: TypeRef,
    elems: Vec<Value>,
}

impl ArrayValue {
    pub fn new(elem: TypeRef, elems: Vec<Value>) -> Self {
        ArrayValue {
            ty: Type::array_of(elems.len(), elem),
            elems,
        }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn elements(&self) -> &[Value] {
        &self.elems
    }
}

/// A map, either nil or sharing an entry table with its aliases.
///
/// Entries are kept in insertion order, which stands in for the runtime's
/// unspecified iteration order.
#[derive(Clone)]
pub struct MapValue {
    ty: TypeRef,
    table: Option<Rc<RefCell<Vec<(Value, Value)>>>>,
}

impl MapValue {
    /// An empty, non-nil map.
    pub fn new(key: TypeRef, value: TypeRef) -> Self {
        MapValue {
            ty: Type::map_of(key, value),
            table: Some(Rc::new(RefCell::new(Vec::new()))),
        }
    }

    pub fn nil(key: TypeRef, value: TypeRef) -> Self {
        MapValue {
            ty: Type::map_of(key, value),
            table: None,
        }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn is_nil(&self) -> bool {
        self.table.is_none()
    }

    pub fn len(&self) -> usize {
        self.table
            .as_ref()
            .and_then(|table| table.try_borrow().ok().map(|entries| entries.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace the entry for `key`. Keys match by structural equality.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> bool {
        let Some(table) = &self.table else {
            return false;
        };
        let Ok(mut entries) = table.try_borrow_mut() else {
            return false;
        };
        let key = key.into();
        let value = value.into();
        match entries
            .iter_mut()
            .find(|(existing, _)| structurally_equal(existing, &key))
        {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        true
    }

    /// Borrow the entries in native order.
    pub fn entries(&self) -> Option<Ref<'_, [(Value, Value)]>> {
        let entries = self.table.as_ref()?.try_borrow().ok()?;
        Some(Ref::map(entries, Vec::as_slice))
    }

    pub fn address(&self) -> Option<usize> {
        self.table
            .as_ref()
            .map(|table| Rc::as_ptr(table).cast::<()>() as usize)
    }
}

impl fmt::Debug for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(addr) => write!(f, "({}) {addr:#x} len={}", self.ty, self.len()),
            None => write!(f, "({}) nil", self.ty),
        }
    }
}

/// A function value. Only its type is observable.
#[derive(Clone, Debug)]
pub struct FuncValue {
    ty: TypeRef,
}

impl FuncValue {
    pub fn new(ty: TypeRef) -> Self {
        FuncValue { ty }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }
}

/// A raw address.
#[derive(Clone, Debug)]
pub struct UnsafePointerValue {
    ty: TypeRef,
    addr: usize,
}

impl UnsafePointerValue {
    pub fn new(addr: usize) -> Self {
        UnsafePointerValue {
            ty: Type::unsafe_pointer(),
            addr,
        }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn address(&self) -> usize {
        self.addr
    }
}

/// The elements of a slice or array.
pub enum Elements<'a> {
    Owned(&'a [Value]),
    Shared(Ref<'a, [Value]>),
}

impl Deref for Elements<'_> {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        match self {
            Elements::Owned(elems) => elems,
            Elements::Shared(elems) => elems,
        }
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Untyped nil.
    Nil,
    Scalar(ScalarValue),
    Pointer(PointerValue),
    Interface(InterfaceValue),
    Struct(StructValue),
    Slice(SliceValue),
    Array(ArrayValue),
    Map(MapValue),
    Func(FuncValue),
    UnsafePointer(UnsafePointerValue),
}

impl Value {
    /// A value of type `int`.
    pub fn int(v: i64) -> Self {
        Value::Scalar(ScalarValue::new(Type::int(), Literal::Int(v)))
    }

    /// A value of type `uint`.
    pub fn uint(v: u64) -> Self {
        Value::Scalar(ScalarValue::new(Type::uint(), Literal::Uint(v)))
    }

    /// A value of type `uintptr`.
    pub fn uintptr(v: u64) -> Self {
        Value::Scalar(ScalarValue::new(Type::uintptr(), Literal::Uint(v)))
    }

    /// A scalar of an arbitrary (typically named) scalar type.
    pub fn scalar(ty: TypeRef, lit: Literal) -> Self {
        Value::Scalar(ScalarValue::new(ty, lit))
    }

    /// The nil value of a nillable type; untyped nil for anything else.
    pub fn nil_of(ty: TypeRef) -> Self {
        match ty.kind() {
            Kind::Pointer => Value::Pointer(PointerValue { ty, cell: None }),
            Kind::Interface => Value::Interface(InterfaceValue::nil(ty)),
            Kind::Slice => Value::Slice(SliceValue {
                ty,
                storage: None,
                offset: 0,
                len: 0,
            }),
            Kind::Map => Value::Map(MapValue { ty, table: None }),
            _ => Value::Nil,
        }
    }

    /// A pointer to a fresh cell holding `pointee`.
    pub fn pointer(elem: TypeRef, pointee: Value) -> Self {
        Value::Pointer(PointerValue::new(elem, pointee))
    }

    /// `inner` boxed in the empty interface.
    pub fn boxed(inner: Value) -> Self {
        Value::Interface(InterfaceValue::any(inner))
    }

    pub fn slice(elem: TypeRef, elems: Vec<Value>) -> Self {
        Value::Slice(SliceValue::new(elem, elems))
    }

    pub fn array(elem: TypeRef, elems: Vec<Value>) -> Self {
        Value::Array(ArrayValue::new(elem, elems))
    }

    /// A map holding `entries`, inserted in order.
    pub fn map(
        key: TypeRef,
        value: TypeRef,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        let map = MapValue::new(key, value);
        for (k, v) in entries {
            map.insert(k, v);
        }
        Value::Map(map)
    }

    /// A function value of the given signature, e.g. `func(int) string`.
    pub fn func(signature: &str) -> Self {
        Value::Func(FuncValue::new(Type::func(signature)))
    }

    pub fn unsafe_pointer(addr: usize) -> Self {
        Value::UnsafePointer(UnsafePointerValue::new(addr))
    }

    /// The kind of the value's type. Untyped nil reports `Invalid`.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Invalid,
            Value::Scalar(s) => s.ty.kind(),
            Value::Pointer(_) => Kind::Pointer,
            Value::Interface(_) => Kind::Interface,
            Value::Struct(_) => Kind::Struct,
            Value::Slice(_) => Kind::Slice,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Func(_) => Kind::Func,
            Value::UnsafePointer(_) => Kind::UnsafePointer,
        }
    }

    /// The static type of the value. `None` for untyped nil.
    pub fn type_of(&self) -> Option<&TypeRef> {
        match self {
            Value::Nil => None,
            Value::Scalar(s) => Some(&s.ty),
            Value::Pointer(p) => Some(&p.ty),
            Value::Interface(i) => Some(&i.ty),
            Value::Struct(s) => Some(&s.ty),
            Value::Slice(s) => Some(&s.ty),
            Value::Array(a) => Some(&a.ty),
            Value::Map(m) => Some(&m.ty),
            Value::Func(f) => Some(&f.ty),
            Value::UnsafePointer(p) => Some(&p.ty),
        }
    }

    /// The runtime type string, or `nil` for untyped nil.
    pub fn type_name(&self) -> String {
        self.type_of()
            .map_or_else(|| "nil".to_string(), ToString::to_string)
    }

    pub fn is_nil(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Pointer(p) => p.is_nil(),
            Value::Interface(i) => i.is_nil(),
            Value::Slice(s) => s.is_nil(),
            Value::Map(m) => m.is_nil(),
            Value::UnsafePointer(p) => p.addr == 0,
            Value::Scalar(_) | Value::Struct(_) | Value::Array(_) | Value::Func(_) => false,
        }
    }

    /// Address identity of a non-nil pointer, slice, or map.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Pointer(p) => p.address().map(Identity::Pointer),
            Value::Slice(s) => s.storage_address().map(|storage| Identity::Slice {
                storage,
                offset: s.offset,
                len: s.len,
            }),
            Value::Map(m) => m.address().map(Identity::Map),
            _ => None,
        }
    }

    /// Borrow the pointee of a non-nil pointer.
    pub fn pointee(&self) -> Option<Ref<'_, Value>> {
        match self {
            Value::Pointer(p) => p.pointee(),
            _ => None,
        }
    }

    /// The fields of a struct.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Value::Struct(s) => Some(&s.fields),
            _ => None,
        }
    }

    /// The elements of a non-nil slice or an array.
    pub fn elements(&self) -> Option<Elements<'_>> {
        match self {
            Value::Slice(s) => s.elements().map(Elements::Shared),
            Value::Array(a) => Some(Elements::Owned(&a.elems)),
            _ => None,
        }
    }

    /// The entries of a non-nil map, in native order.
    pub fn entries(&self) -> Option<Ref<'_, [(Value, Value)]>> {
        match self {
            Value::Map(m) => m.entries(),
            _ => None,
        }
    }

    /// The dynamic value boxed in a non-nil interface.
    pub fn unboxed(&self) -> Option<&Value> {
        match self {
            Value::Interface(i) => i.inner(),
            _ => None,
        }
    }

    /// The string form used to order map keys.
    ///
    /// Strings are their own content, numbers and bools their decimal or
    /// keyword form. Structs and arrays list their parts. Reference kinds
    /// have no stable textual form and report their type as `<T Value>`.
    pub fn canonical_key(&self) -> String {
        match self {
            Value::Nil => "<nil>".to_string(),
            Value::Scalar(s) => match &s.lit {
                Literal::Str(text) => text.clone(),
                Literal::Bool(b) => b.to_string(),
                Literal::Int(i) => i.to_string(),
                Literal::Uint(u) => u.to_string(),
                Literal::Float(f) => f.to_string(),
            },
            Value::Interface(i) => i
                .inner()
                .map_or_else(|| "<nil>".to_string(), Value::canonical_key),
            Value::Struct(s) => {
                let parts: Vec<String> = s.fields.iter().map(|f| f.value.canonical_key()).collect();
                format!("{{{}}}", parts.join(" "))
            }
            Value::Array(a) => {
                let parts: Vec<String> = a.elems.iter().map(Value::canonical_key).collect();
                format!("[{}]", parts.join(" "))
            }
            Value::Pointer(_)
            | Value::Slice(_)
            | Value::Map(_)
            | Value::Func(_)
            | Value::UnsafePointer(_) => format!("<{} Value>", self.type_name()),
        }
    }
}

macro_rules! scalar_from {
    ($($rust:ty => $ctor:ident, $lit:ident);* $(;)?) => {
        $(
            impl From<$rust> for Value {
                fn from(v: $rust) -> Self {
                    Value::Scalar(ScalarValue::new(Type::$ctor(), Literal::$lit(v.into())))
                }
            }
        )*
    };
}

scalar_from! {
    bool => bool, Bool;
    i8 => int8, Int;
    i16 => int16, Int;
    i32 => int32, Int;
    i64 => int64, Int;
    u8 => uint8, Uint;
    u16 => uint16, Uint;
    u32 => uint32, Uint;
    u64 => uint64, Uint;
    f32 => float32, Float;
    f64 => float64, Float;
    String => string, Str;
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(ScalarValue::new(Type::string(), Literal::Str(v.to_string())))
    }
}

impl From<PointerValue> for Value {
    fn from(v: PointerValue) -> Self {
        Value::Pointer(v)
    }
}

impl From<InterfaceValue> for Value {
    fn from(v: InterfaceValue) -> Self {
        Value::Interface(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Value::Struct(v)
    }
}

impl From<SliceValue> for Value {
    fn from(v: SliceValue) -> Self {
        Value::Slice(v)
    }
}

impl From<ArrayValue> for Value {
    fn from(v: ArrayValue) -> Self {
        Value::Array(v)
    }
}

impl From<MapValue> for Value {
    fn from(v: MapValue) -> Self {
        Value::Map(v)
    }
}
