#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use crate::build;
use pretty_assertions::assert_eq;
use tg_graph::{MarshalOptions, Marshaler, Substitutions, UnsupportedPolicy};
use tg_value::{Literal, PointerValue, SliceValue, StructValue, Type, TypeRef, Value};

fn generate(value: &Value) -> String {
    generate_with(value, MarshalOptions::default())
}

fn generate_with(value: &Value, options: MarshalOptions) -> String {
    let graph = Marshaler::new(Substitutions::new())
        .with_options(options)
        .marshal(value)
        .unwrap();
    build(&graph, "getData", "main")
}

fn dedup() -> MarshalOptions {
    MarshalOptions {
        dedup_values: true,
        ..MarshalOptions::default()
    }
}

fn named_struct(name: &str) -> TypeRef {
    Type::named("main", name, Type::structure([]))
}

fn recur_pointer() -> Value {
    let ty = named_struct("recurStruct");
    let ptr = PointerValue::alloc(ty.clone());
    let node = StructValue::builder(ty)
        .field("name", "root")
        .field("recur", ptr.clone())
        .field("extra", "whatever")
        .build();
    assert!(ptr.store(node.into()));
    ptr.into()
}

#[test]
fn test_empty_map() {
    let m = Value::map(Type::string(), Type::int(), []);
    assert_eq!(
        generate(&m),
        "func getData() map[string]int {\n  var1 := map[string]int{}\n  return var1\n}"
    );
}

#[test]
fn test_map_keys_sorted() {
    let m = Value::map(
        Type::string(),
        Type::int(),
        [
            (Value::from("Foo"), Value::int(1)),
            (Value::from("Bar"), Value::int(2)),
            (Value::from("Baz"), Value::int(3)),
        ],
    );
    assert_eq!(
        generate(&m),
        "func getData() map[string]int {\n  var1 := map[string]int{\"Bar\":2,\"Baz\":3,\"Foo\":1,}\n  return var1\n}"
    );
}

#[test]
fn test_self_referential_pointer() {
    assert_eq!(
        generate(&recur_pointer()),
        "func getData() *recurStruct {\n\
         \x20 var1 := recurStruct{name:\"root\",recur:nil,extra:\"whatever\",}\n\
         \x20 var1.recur = &var1\n\
         \x20 return &var1\n\
         }"
    );
}

#[test]
fn test_slice_pointer_slice_cycle() {
    let s_ty = named_struct("S");
    let ptr_ty = Type::pointer_to(s_ty.clone());
    let cell = PointerValue::alloc(s_ty.clone());
    let outer = Value::slice(ptr_ty.clone(), vec![cell.clone().into()]);
    let inner = Value::slice(ptr_ty, vec![cell.clone().into()]);
    let node = StructValue::builder(s_ty).field("recur", inner).build();
    assert!(cell.store(node.into()));

    assert_eq!(
        generate(&outer),
        "func getData() []*S {\n\
         \x20 var1 := []*S{nil,}\n\
         \x20 var2 := S{recur:nil,}\n\
         \x20 var3 := []*S{&var2,}\n\
         \x20 var1[0] = &var2\n\
         \x20 var2.recur = var3\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_sized_scalar_root() {
    assert_eq!(
        generate(&Value::from(100i64)),
        "func getData() int64 {\n  var1 := int64(100)\n  return var1\n}"
    );
}

#[test]
fn test_float_root() {
    assert_eq!(
        generate(&Value::from(1.23f64)),
        "func getData() float64 {\n  var1 := float64(1.23)\n  return var1\n}"
    );
}

#[test]
fn test_floats_keep_every_digit() {
    assert_eq!(
        generate(&Value::from(1e-9f64)),
        "func getData() float64 {\n  var1 := float64(1e-9)\n  return var1\n}"
    );
    assert_eq!(
        generate(&Value::from(0.1f64 + 0.2)),
        "func getData() float64 {\n  var1 := float64(0.30000000000000004)\n  return var1\n}"
    );
    assert_eq!(
        generate(&Value::from(0.1f32)),
        "func getData() float32 {\n  var1 := float32(0.1)\n  return var1\n}"
    );
}

#[test]
fn test_interface_elements_render_bare() {
    let s = Value::slice(
        Type::any(),
        vec![
            Value::boxed(Value::from("Hello")),
            Value::boxed(Value::from("Goodbye")),
        ],
    );
    assert_eq!(
        generate(&s),
        "func getData() []any {\n  var1 := []any{\"Hello\",\"Goodbye\",}\n  return var1\n}"
    );
}

#[test]
fn test_array_and_empty_slice() {
    let a = Value::array(Type::int(), vec![Value::int(1), Value::int(2), Value::int(3)]);
    assert_eq!(
        generate(&a),
        "func getData() [3]int {\n  var1 := [3]int{1,2,3,}\n  return var1\n}"
    );
    let empty = Value::slice(Type::int(), Vec::new());
    assert_eq!(
        generate(&empty),
        "func getData() []int {\n  var1 := []int{}\n  return var1\n}"
    );
}

#[test]
fn test_nil_roots() {
    let typed = Value::nil_of(Type::pointer_to(named_struct("S")));
    assert_eq!(
        generate(&typed),
        "func getData() *S {\n  var var1 *S\n  return var1\n}"
    );
    assert_eq!(
        generate(&Value::Nil),
        "func getData() any {\n  var var1 any\n  return var1\n}"
    );
}

#[test]
fn test_struct_value_cycle_with_dedup() {
    let ty = named_struct("recurStruct");
    let ptr = PointerValue::alloc(ty.clone());
    let root = StructValue::builder(ty)
        .field("name", "root")
        .field("recur", ptr.clone())
        .build();
    assert!(ptr.store(root.clone().into()));

    assert_eq!(
        generate_with(&root.into(), dedup()),
        "func getData() recurStruct {\n\
         \x20 var1 := recurStruct{name:\"root\",recur:nil,}\n\
         \x20 var1.recur = &var1\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_pointer_to_pointer() {
    let pp = Value::pointer(
        Type::pointer_to(Type::int()),
        Value::pointer(Type::int(), Value::int(5)),
    );
    assert_eq!(
        generate(&pp),
        "func getData() **int {\n  var1 := 5\n  var2 := &var1\n  return &var2\n}"
    );
}

#[test]
fn test_shared_pointer_patched_twice() {
    let p = Value::pointer(Type::int(), Value::int(7));
    let s = Value::slice(Type::pointer_to(Type::int()), vec![p.clone(), p]);
    assert_eq!(
        generate(&s),
        "func getData() []*int {\n\
         \x20 var1 := []*int{nil,nil,}\n\
         \x20 var2 := 7\n\
         \x20 var1[0] = &var2\n\
         \x20 var1[1] = &var2\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_pointer_keys_declared_before_map() {
    let m = Value::map(
        Type::pointer_to(Type::int()),
        Type::string(),
        [(Value::pointer(Type::int(), Value::int(1)), Value::from("x"))],
    );
    assert_eq!(
        generate(&m),
        "func getData() map[*int]string {\n\
         \x20 var2 := 1\n\
         \x20 var1 := map[*int]string{&var2:\"x\",}\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_struct_in_map_value_copied_after_patch() {
    let holder = named_struct("holder");
    let value = StructValue::builder(holder.clone())
        .field("p", Value::pointer(Type::int(), Value::int(1)))
        .build();
    let m = Value::map(Type::string(), holder, [(Value::from("a"), value.into())]);
    assert_eq!(
        generate(&m),
        "func getData() map[string]holder {\n\
         \x20 var1 := map[string]holder{\"a\":holder{},}\n\
         \x20 var2 := holder{p:nil,}\n\
         \x20 var3 := 1\n\
         \x20 var2.p = &var3\n\
         \x20 var1[\"a\"] = var2\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_shared_value_copies_run_last() {
    let s_ty = named_struct("S");
    let first: Value = StructValue::builder(s_ty.clone())
        .field("p", Value::pointer(Type::int(), Value::int(1)))
        .build()
        .into();
    let pair = Value::array(s_ty, vec![first.clone(), first]);
    assert_eq!(
        generate_with(&pair, dedup()),
        "func getData() [2]S {\n\
         \x20 var1 := [2]S{S{},S{},}\n\
         \x20 var2 := S{p:nil,}\n\
         \x20 var3 := 1\n\
         \x20 var2.p = &var3\n\
         \x20 var1[0] = var2\n\
         \x20 var1[1] = var2\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_copy_of_patched_variable_is_deferred() {
    let x_ty = named_struct("X");
    let x: Value = StructValue::builder(x_ty.clone())
        .field("p", Value::pointer(Type::int(), Value::int(1)))
        .build()
        .into();
    let m = Value::map(Type::string(), x_ty.clone(), [(Value::from("k"), x.clone())]);
    let root = Value::slice(
        Type::any(),
        vec![Value::boxed(Value::pointer(x_ty, x)), Value::boxed(m)],
    );
    assert_eq!(
        generate_with(&root, dedup()),
        "func getData() []any {\n\
         \x20 var1 := []any{nil,nil,}\n\
         \x20 var2 := X{p:nil,}\n\
         \x20 var3 := 1\n\
         \x20 var4 := map[string]X{\"k\":X{},}\n\
         \x20 var1[0] = &var2\n\
         \x20 var1[1] = var4\n\
         \x20 var2.p = &var3\n\
         \x20 var4[\"k\"] = var2\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_boxed_pointer_root() {
    let root = Value::boxed(Value::pointer(Type::int(), Value::int(5)));
    assert_eq!(
        generate(&root),
        "func getData() any {\n\
         \x20 var1 := any(nil)\n\
         \x20 var2 := 5\n\
         \x20 var1 = &var2\n\
         \x20 return var1\n\
         }"
    );
}

#[test]
fn test_named_scalars_convert() {
    let color = Type::named("main", "Color", Type::int());
    let s = Value::slice(
        color.clone(),
        vec![Value::scalar(color, Literal::Int(3))],
    );
    assert_eq!(
        generate(&s),
        "func getData() []Color {\n  var1 := []Color{Color(3),}\n  return var1\n}"
    );
}

#[test]
fn test_substitution_renders_text() {
    let loc = Type::named("time", "Location", Type::structure([]));
    let holder = StructValue::builder(named_struct("holder"))
        .field(
            "loc",
            Value::pointer(loc.clone(), StructValue::builder(loc).build().into()),
        )
        .build();
    let subs = Substitutions::new().with("*time.Location", |_| "time.UTC".to_string());
    let graph = Marshaler::new(subs).marshal(&holder.into()).unwrap();
    assert_eq!(
        build(&graph, "getData", "main"),
        "func getData() holder {\n  var1 := holder{loc:time.UTC,}\n  return var1\n}"
    );
}

#[test]
fn test_unsupported_placeholder() {
    let funcs = Value::slice(Type::func("func()"), vec![Value::func("func()")]);
    let options = MarshalOptions {
        unsupported: UnsupportedPolicy::Placeholder,
        ..MarshalOptions::default()
    };
    assert_eq!(
        generate_with(&funcs, options),
        "func getData() []func() {\n  var1 := []func(){nil,}\n  return var1\n}"
    );
}

#[test]
fn test_unsupported_pointee_declared_as_zero() {
    let ptr = Value::pointer(Type::func("func()"), Value::func("func()"));
    let options = MarshalOptions {
        unsupported: UnsupportedPolicy::Placeholder,
        ..MarshalOptions::default()
    };
    assert_eq!(
        generate_with(&ptr, options),
        "func getData() *func() {\n  var var1 func()\n  return &var1\n}"
    );
}

#[test]
fn test_qualifier_kept_when_not_omitted() {
    let graph = Marshaler::new(Substitutions::new())
        .marshal(&recur_pointer())
        .unwrap();
    let options = CodegenOptions::default().with_func_name("fixture");
    let out = CodeBuilder::new(&graph, options).build();
    assert!(out.starts_with("func fixture() *main.recurStruct {\n"));
    assert!(out.contains("var1 := main.recurStruct{"));
}

#[test]
fn test_custom_indent() {
    let graph = Marshaler::new(Substitutions::new())
        .marshal(&Value::int(1))
        .unwrap();
    let options = CodegenOptions {
        indent: "\t".to_string(),
        ..CodegenOptions::default()
    };
    assert_eq!(
        CodeBuilder::new(&graph, options).build(),
        "func getData() int {\n\tvar1 := 1\n\treturn var1\n}"
    );
}

#[test]
fn test_graph_reusable_across_builds() {
    let graph = Marshaler::new(Substitutions::new())
        .marshal(&recur_pointer())
        .unwrap();
    let first = build(&graph, "getData", "main");
    let second = build(&graph, "getData", "main");
    assert_eq!(first, second);
}

#[test]
fn test_resliced_views_keep_their_windows() {
    let backing = SliceValue::new(Type::int(), vec![Value::int(1), Value::int(2)]);
    let head = backing.reslice(0, 1).unwrap();
    let views = Value::slice(
        Type::slice_of(Type::int()),
        vec![backing.into(), head.into()],
    );
    assert_eq!(
        generate(&views),
        "func getData() [][]int {\n\
         \x20 var1 := [][]int{nil,nil,}\n\
         \x20 var2 := []int{1,2,}\n\
         \x20 var3 := []int{1,}\n\
         \x20 var1[0] = var2\n\
         \x20 var1[1] = var3\n\
         \x20 return var1\n\
         }"
    );
}
