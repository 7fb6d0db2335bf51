//! 实例绑定、标识符与解绑

mod common;

use anyhow::Result;
use di_abstractions::{DependencyError, Identifier, Instance};
use di_impl::DiContainer;

#[test]
fn test_bind_primitives() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_instance(1_i32)?;
    container.bind_instance(2_f32)?;
    container.bind_instance(3_f64)?;
    container.bind_instance("str".to_string())?;
    container.bind_instance(true)?;

    // 多次解析结果不变
    for _ in 0..10 {
        assert_eq!(*container.resolve::<i32>()?, 1);
        assert!((*container.resolve::<f32>()? - 2.0).abs() < f32::EPSILON);
        assert!((*container.resolve::<f64>()? - 3.0).abs() < f64::EPSILON);
        assert_eq!(*container.resolve::<String>()?, "str");
        assert!(*container.resolve::<bool>()?);
    }
    Ok(())
}

#[test]
fn test_bind_multiple() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    for value in ["a", "b", "c"] {
        container.bind_instance(value.to_string())?;
    }
    container.bind_instances(["d", "e", "f"].map(|value| Instance::of(value.to_string())))?;

    assert!(matches!(
        container.resolve::<String>(),
        Err(DependencyError::AmbiguousMatch { candidates: 6, .. })
    ));

    let all: Vec<String> = container
        .resolve_all::<String>()?
        .iter()
        .map(|value| value.to_string())
        .collect();
    assert_eq!(all, ["a", "b", "c", "d", "e", "f"]);

    // 不同类型也可以一起绑定
    container.bind_instances([Instance::of(1_i32), Instance::of(2_f32), Instance::of(true)])?;
    assert_eq!(*container.resolve::<i32>()?, 1);
    assert!((*container.resolve::<f32>()? - 2.0).abs() < f32::EPSILON);
    assert!(*container.resolve::<bool>()?);
    Ok(())
}

#[test]
fn test_resolve_when_no_bindings() -> Result<()> {
    common::setup();
    let container = DiContainer::new();

    let err = container.resolve::<String>().unwrap_err();
    assert_eq!(err.to_string(), "无法解析 'String'");
    assert!(container.resolve_all::<String>()?.is_empty());

    let err = container.resolve_id::<String>("foo").unwrap_err();
    assert_eq!(err.to_string(), "无法解析 'String (ID: \"foo\")'");
    assert!(container.resolve_id_all::<String>("foo")?.is_empty());
    Ok(())
}

#[test]
fn test_bind_multiple_with_id() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_instance("a".to_string())?.with_id("first");
    container.bind_instance("b".to_string())?.with_id("second");

    assert_eq!(*container.resolve_id::<String>("first")?, "a");
    assert_eq!(*container.resolve_id::<String>("second")?, "b");

    // 不带标识符的解析忽略带标识符的绑定
    assert!(container.resolve::<String>().unwrap_err().is_unresolvable());
    assert!(container.resolve_all::<String>()?.is_empty());

    container.bind_instance("c".to_string())?;
    assert_eq!(*container.resolve::<String>()?, "c");
    Ok(())
}

#[test]
fn test_resolve_id_all_with_object_identifier() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    let id = Identifier::unique();
    container.bind_instance("a".to_string())?.with_id(&id);
    container.bind_instance("b".to_string())?;

    let with_id = container.resolve_id_all::<String>(&id)?;
    assert_eq!(with_id.len(), 1);
    assert_eq!(*with_id[0], "a");

    // 相同类型相同标识符的重复绑定不是错误
    container.bind_instance("A".to_string())?.with_id(&id);
    let with_id: Vec<String> = container
        .resolve_id_all::<String>(&id)?
        .iter()
        .map(|value| value.to_string())
        .collect();
    assert_eq!(with_id, ["a", "A"]);

    // 其他对象标识符互不相等
    assert!(container.resolve_id_all::<String>(Identifier::unique())?.is_empty());
    Ok(())
}

#[test]
fn test_unbind() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_instance("str".to_string())?;
    assert_eq!(*container.resolve::<String>()?, "str");

    assert_eq!(container.unbind::<String>(), 1);
    assert!(container.resolve::<String>().unwrap_err().is_unresolvable());

    container.bind_instances([1_i32, 2, 3].map(Instance::of))?;
    assert_eq!(container.unbind::<i32>(), 3);
    assert!(container.resolve_all::<i32>()?.is_empty());
    assert!(container.resolve::<i32>().unwrap_err().is_unresolvable());
    Ok(())
}

#[test]
fn test_unbind_id() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    let id = Identifier::unique();
    container.bind_instance("a".to_string())?.with_id(&id);
    assert_eq!(*container.resolve_id::<String>(&id)?, "a");

    container.unbind_id::<String>(&id);
    assert!(container.resolve_id::<String>(&id).unwrap_err().is_unresolvable());

    container.bind_instance("b".to_string())?.with_id(&id);
    container.bind_instance("c".to_string())?.with_id(&id);
    container.bind_instance("plain".to_string())?;
    assert_eq!(container.unbind_id::<String>(&id), 2);

    assert!(container.resolve_id_all::<String>(&id)?.is_empty());
    assert_eq!(*container.resolve::<String>()?, "plain");
    Ok(())
}

#[test]
fn test_unbind_all() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_instance("str".to_string())?;
    container.bind_instance(1_i32)?;
    container.bind_instance(true)?;
    container.bind_instance(100_u64)?.with_id("u64");

    assert_eq!(container.unbind_all(), 4);
    assert!(container.resolve::<String>().unwrap_err().is_unresolvable());
    assert!(container.resolve::<i32>().unwrap_err().is_unresolvable());
    assert!(container.resolve::<bool>().unwrap_err().is_unresolvable());
    assert!(container.resolve_id::<u64>("u64").unwrap_err().is_unresolvable());
    assert_eq!(container.stats().registered_bindings, 0);
    Ok(())
}

#[test]
fn test_unbind_when_no_bindings() {
    common::setup();
    let container = DiContainer::new();
    assert_eq!(container.unbind::<String>(), 0);
    assert_eq!(container.unbind::<i32>(), 0);
    assert_eq!(container.unbind::<bool>(), 0);
    assert_eq!(container.unbind_all(), 0);
    assert_eq!(container.unbind_id::<u64>(""), 0);
}
