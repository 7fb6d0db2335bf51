//! 构造参数自动装配

use di_abstractions::{
    Arguments, Constructor, Dependency, DependencyResult, Instance, InstanceResolver,
    ResolveContext, TypeInfo,
};
use tracing::{trace, warn};

/// 为 `constructor` 准备参数并构造实例
///
/// 每个参数先在显式参数中按类型查找（与顺序无关，每个显式值只使用一次），
/// 找不到再通过 `resolver` 解析。查找失败会带上正在构造的类型名。
pub fn construct(
    resolver: &dyn InstanceResolver,
    context: &mut ResolveContext,
    constructor: &Constructor,
    explicit: &[Instance],
) -> DependencyResult<Instance> {
    let owner = constructor.concrete;
    let mut consumed = vec![false; explicit.len()];
    let mut values = Vec::new();

    for dependency in (constructor.dependencies)() {
        let value = match take_explicit(explicit, &mut consumed, dependency.type_info) {
            Some(value) => {
                trace!(owner = %owner, parameter = %dependency.type_info, "使用显式参数");
                value
            }
            None => resolve_dependency(resolver, context, &dependency)
                .map_err(|err| err.while_building(owner.short_name()))?,
        };
        values.push(value);
    }

    let unused = consumed.iter().filter(|used| !**used).count();
    if unused > 0 {
        warn!(owner = %owner, unused, "部分显式参数没有匹配的构造参数");
    }

    let mut arguments = Arguments::new(owner, values);
    (constructor.construct)(&mut arguments)
}

/// 第一个类型相同且未被使用的显式参数
fn take_explicit(
    explicit: &[Instance],
    consumed: &mut [bool],
    wanted: TypeInfo,
) -> Option<Instance> {
    let index = explicit
        .iter()
        .zip(consumed.iter())
        .position(|(value, used)| !*used && value.type_info().id == wanted.id)?;
    consumed[index] = true;
    Some(explicit[index].clone())
}

/// 解析单个参数
///
/// 集合参数先尝试集合类型本身的绑定；完全没有时改为收集全部元素绑定。
pub fn resolve_dependency(
    resolver: &dyn InstanceResolver,
    context: &mut ResolveContext,
    dependency: &Dependency,
) -> DependencyResult<Instance> {
    let direct = resolver.resolve_key(&dependency.key(), context);
    let (Some(spec), Some(element_key)) = (dependency.collection, dependency.element_key()) else {
        return direct;
    };
    match direct {
        Err(err) if err.is_unresolvable() => {
            let items = resolver.resolve_all_keys(&element_key, context)?;
            trace!(
                collection = %dependency.type_info,
                items = items.len(),
                "由元素绑定组装集合参数"
            );
            (spec.assemble)(items)
        }
        other => other,
    }
}
