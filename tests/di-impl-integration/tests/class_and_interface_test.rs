//! 具体类型与接口（trait object）绑定

mod common;

use anyhow::Result;
use common::KlassWithId;
use di_abstractions::{Arguments, Capabilities, Capability, DependencyResult, Injectable, Upcast};
use di_impl::DiContainer;
use std::sync::Arc;

trait Foo: Send + Sync {
    fn id(&self) -> i32;
    fn name(&self) -> &str;
}

trait Bar: Send + Sync {}

/// 不在 `capabilities` 中声明的接口
trait Baz: Send + Sync {}

struct FooImpl {
    id: i32,
}

impl Foo for FooImpl {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        "FooImpl"
    }
}

impl Bar for FooImpl {}
impl Baz for FooImpl {}

impl Injectable for FooImpl {
    fn construct(_args: &mut Arguments) -> DependencyResult<Self> {
        Ok(Self {
            id: KlassWithId::next_id(),
        })
    }
}

impl Upcast<dyn Foo> for FooImpl {
    fn upcast(self: Arc<Self>) -> Arc<dyn Foo> {
        self
    }
}

impl Upcast<dyn Bar> for FooImpl {
    fn upcast(self: Arc<Self>) -> Arc<dyn Bar> {
        self
    }
}

impl Capabilities for FooImpl {
    fn capabilities() -> Vec<Capability<Self>> {
        vec![Capability::of::<dyn Foo>(), Capability::of::<dyn Bar>()]
    }
}

fn is_unresolvable<T: ?Sized>(result: DependencyResult<Arc<T>>) -> bool {
    result.err().is_some_and(|err| err.is_unresolvable())
}

fn same_object<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

#[test]
fn test_bind_interface() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_contract::<dyn Foo>()?.to::<FooImpl>().as_transient();

    let foo = container.resolve::<dyn Foo>()?;
    assert_eq!(foo.name(), "FooImpl");

    // 具体类型本身没有绑定
    assert!(is_unresolvable(container.resolve::<FooImpl>()));
    Ok(())
}

#[test]
fn test_concrete_binding_does_not_expose_interfaces() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind::<FooImpl>()?.as_transient();

    assert!(is_unresolvable(container.resolve::<dyn Foo>()));
    assert!(is_unresolvable(container.resolve::<dyn Bar>()));
    assert_eq!(container.resolve::<FooImpl>()?.name(), "FooImpl");
    Ok(())
}

#[test]
fn test_transient_bindings_create_separate_instances() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_contract::<dyn Foo>()?.to::<FooImpl>().as_transient();
    container.bind_contract::<dyn Bar>()?.to::<FooImpl>().as_transient();

    let foo = container.resolve::<dyn Foo>()?;
    let bar = container.resolve::<dyn Bar>()?;
    assert_eq!(foo.id(), 0);
    assert!(!same_object(&foo, &bar));
    assert_eq!(container.resolve::<dyn Foo>()?.id(), 2);
    Ok(())
}

#[test]
fn test_cached_and_from_resolve_share_instance() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind::<FooImpl>()?.as_cached();
    container.bind_contract::<dyn Foo>()?.from_resolve::<FooImpl>();
    container.bind_contract::<dyn Bar>()?.from_resolve::<FooImpl>();

    let concrete = container.resolve::<FooImpl>()?;
    let foo = container.resolve::<dyn Foo>()?;
    let bar = container.resolve::<dyn Bar>()?;

    assert_eq!(concrete.id, 0);
    assert_eq!(foo.id(), 0);
    assert!(same_object(&concrete, &foo));
    assert!(same_object(&concrete, &bar));
    assert_eq!(container.stats().instances_created, 1);
    Ok(())
}

#[test]
fn test_from_resolve_id_shares_identified_instance() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind::<FooImpl>()?.with_id("main").as_cached();
    container
        .bind_contract::<dyn Foo>()?
        .from_resolve_id::<FooImpl>("main");

    let foo = container.resolve::<dyn Foo>()?;
    let concrete = container.resolve_id::<FooImpl>("main")?;
    assert_eq!(foo.id(), 0);
    assert!(same_object(&foo, &concrete));
    assert!(same_object(&foo, &container.resolve::<dyn Foo>()?));
    assert_eq!(container.stats().instances_created, 1);

    // 来源绑定只能按标识符找到
    assert!(is_unresolvable(container.resolve::<FooImpl>()));
    Ok(())
}

#[test]
fn test_from_resolve_id_without_source_is_unresolvable() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind::<FooImpl>()?.as_cached();
    container
        .bind_contract::<dyn Foo>()?
        .from_resolve_id::<FooImpl>("missing");

    assert!(is_unresolvable(container.resolve::<dyn Foo>()));
    Ok(())
}

#[test]
fn test_bind_interfaces() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_interfaces_to::<FooImpl>()?.as_cached();

    let foo = container.resolve::<dyn Foo>()?;
    let bar = container.resolve::<dyn Bar>()?;
    assert!(same_object(&foo, &bar));

    assert!(is_unresolvable(container.resolve::<FooImpl>()));
    assert!(is_unresolvable(container.resolve::<dyn Baz>()));
    Ok(())
}

#[test]
fn test_bind_interfaces_and_self() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_interfaces_and_self_to::<FooImpl>()?.as_cached();

    let concrete = container.resolve::<FooImpl>()?;
    assert!(same_object(&concrete, &container.resolve::<dyn Foo>()?));
    assert!(same_object(&concrete, &container.resolve::<dyn Bar>()?));
    assert!(is_unresolvable(container.resolve::<dyn Baz>()));
    Ok(())
}

#[test]
fn test_unbinding_one_interface_keeps_shared_instance() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_interfaces_to::<FooImpl>()?.as_single();

    let foo = container.resolve::<dyn Foo>()?;
    assert_eq!(container.unbind::<dyn Foo>(), 1);
    assert!(!container.has_binding::<dyn Foo>());

    let bar = container.resolve::<dyn Bar>()?;
    assert!(same_object(&foo, &bar));
    Ok(())
}

#[test]
fn test_resolve_all_interfaces() -> Result<()> {
    common::setup();
    let container = DiContainer::new();
    container.bind_contract::<dyn Foo>()?.to::<FooImpl>().as_cached();
    container.bind_contract::<dyn Foo>()?.to::<FooImpl>().as_cached();

    let ids: Vec<i32> = container
        .resolve_all::<dyn Foo>()?
        .iter()
        .map(|foo| foo.id())
        .collect();
    assert_eq!(ids, [0, 1]);
    Ok(())
}
