use super::*;
use pretty_assertions::assert_eq;
use tg_value::{StructValue, Type};

fn point(x: i64) -> Value {
    let ty = Type::named("main", "point", Type::structure([("x", Type::int())]));
    StructValue::builder(ty).field("x", Value::int(x)).build().into()
}

#[test]
fn test_pointer_lookup_by_address() {
    let mut registry = IdentityRegistry::new(false);
    let p = Value::pointer(Type::int(), Value::int(1));
    let q = Value::pointer(Type::int(), Value::int(1));

    assert_eq!(registry.lookup(&p), None);
    registry.register(&p, NodeId::new(1));
    assert_eq!(registry.lookup(&p.clone()), Some(NodeId::new(1)));
    assert_eq!(registry.lookup(&q), None);
}

#[test]
fn test_values_untracked_without_dedup() {
    let mut registry = IdentityRegistry::new(false);
    registry.register(&point(1), NodeId::new(1));
    assert_eq!(registry.lookup(&point(1)), None);
    assert!(registry.is_empty());
}

#[test]
fn test_values_deduplicated_on_request() {
    let mut registry = IdentityRegistry::new(true);
    registry.register(&point(1), NodeId::new(1));
    registry.register(&point(2), NodeId::new(2));
    assert_eq!(registry.lookup(&point(1)), Some(NodeId::new(1)));
    assert_eq!(registry.lookup(&point(2)), Some(NodeId::new(2)));
    assert_eq!(registry.lookup(&point(3)), None);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_scalars_and_nil_never_tracked() {
    let mut registry = IdentityRegistry::new(true);
    registry.register(&Value::int(1), NodeId::new(1));
    registry.register(&Value::nil_of(Type::pointer_to(Type::int())), NodeId::new(2));
    assert_eq!(registry.lookup(&Value::int(1)), None);
    assert!(registry.is_empty());
}

#[test]
fn test_clear() {
    let mut registry = IdentityRegistry::new(true);
    let m = Value::map(Type::string(), Type::int(), []);
    registry.register(&m, NodeId::new(1));
    registry.register(&point(1), NodeId::new(2));
    registry.clear();
    assert!(registry.is_empty());
    assert_eq!(registry.lookup(&m), None);
    assert!(registry.tracks(&point(1)));
}
