//! 服务注册表的集成测试

use di_abstractions::{ResolveContext, ServiceKey, ServiceRegistry, ServiceRegistryExt};
use di_impl::ServiceRegistryImpl;
use di_impl_integration_tests::init_test_logger;
use infrastructure_common::DependencyError;
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Greeting(String);

#[derive(Debug)]
struct Alpha(Arc<Beta>);

#[derive(Debug)]
struct Beta(Option<Arc<Alpha>>);

#[derive(Debug)]
struct Gamma;

/// 注册 Alpha -> Beta -> Alpha 的循环
fn register_cycle(registry: &ServiceRegistryImpl) {
    registry.register(None, None, |ctx: &mut ResolveContext<'_>| {
        Ok(Alpha(ctx.resolve::<Beta>(None, None)?))
    });
    registry.register(None, None, |ctx: &mut ResolveContext<'_>| {
        Ok(Beta(Some(ctx.resolve::<Alpha>(None, None)?)))
    });
}

#[test]
fn test_register_value_round_trip() {
    init_test_logger();
    let registry = ServiceRegistryImpl::new();

    let cases: [(Option<&str>, Option<&str>, &str); 4] = [
        (None, None, "global default"),
        (Some("named"), None, "global named"),
        (None, Some("root"), "scoped default"),
        (Some("named"), Some("root/parent"), "scoped named"),
    ];

    for (name, scope, value) in cases {
        registry.register_value(name, scope, Greeting(value.to_string()));
    }
    for (name, scope, value) in cases {
        let resolved = registry.resolve::<Greeting>(name, scope).unwrap();
        assert_eq!(*resolved, Greeting(value.to_string()));
    }
}

#[test]
fn test_overwrite_keeps_latest() {
    let registry = ServiceRegistryImpl::new();
    registry.register_value(Some("n"), Some("s"), Greeting("first".into()));
    registry.register_value(Some("n"), Some("s"), Greeting("second".into()));

    let resolved = registry.resolve::<Greeting>(Some("n"), Some("s")).unwrap();
    assert_eq!(resolved.0, "second");
    assert_eq!(registry.registration_count(), 1);
}

#[test]
fn test_scope_isolation() {
    let registry = ServiceRegistryImpl::new();
    registry.register_value(None, Some("s"), Greeting("scoped".into()));
    assert!(registry.resolve::<Greeting>(None, None).unwrap_err().is_not_found());

    let other = ServiceRegistryImpl::new();
    other.register_value(None, None, Greeting("global".into()));
    assert!(other.resolve::<Greeting>(None, Some("s")).unwrap_err().is_not_found());
}

#[test]
fn test_not_found_mentions_type_name() {
    let registry = ServiceRegistryImpl::new();
    match registry.resolve::<Gamma>(Some("missing"), Some("nowhere")).unwrap_err() {
        DependencyError::ServiceNotFound { descriptor } => {
            assert!(descriptor.contains(std::any::type_name::<Gamma>()));
        }
        other => panic!("期望 ServiceNotFound，实际: {other}"),
    }
}

#[test]
fn test_two_cycle_is_detected_with_chain() {
    init_test_logger();
    let registry = ServiceRegistryImpl::new();
    register_cycle(&registry);

    match registry.resolve::<Alpha>(None, None).unwrap_err() {
        DependencyError::CircularDependency { chain } => {
            assert_eq!(chain.len(), 3);
            assert!(chain[0].starts_with("Alpha"));
            assert!(chain[1].starts_with("Beta"));
            assert!(chain[2].starts_with("Alpha"));
        }
        other => panic!("期望 CircularDependency，实际: {other}"),
    }
}

#[test]
fn test_three_cycle_chain_is_ordered() {
    let registry = ServiceRegistryImpl::new();
    for (from, to) in [("a", "b"), ("b", "c"), ("c", "a")] {
        registry.register(Some(from), None, move |ctx: &mut ResolveContext<'_>| {
            ctx.resolve::<Gamma>(Some(to), None).map(|_| Gamma)
        });
    }

    let err = registry.resolve::<Gamma>(Some("a"), None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "循环依赖检测到: Gamma(a, global) → Gamma(b, global) → Gamma(c, global) → Gamma(a, global)"
    );
}

#[test]
fn test_stack_is_clean_after_cycle() {
    let registry = ServiceRegistryImpl::new();
    register_cycle(&registry);

    // 每次独立解析都从空栈开始，报告完整且相同的循环
    for _ in 0..2 {
        match registry.resolve::<Alpha>(None, None).unwrap_err() {
            DependencyError::CircularDependency { chain } => assert_eq!(chain.len(), 3),
            other => panic!("期望 CircularDependency，实际: {other}"),
        }
    }
    match registry.resolve::<Beta>(None, None).unwrap_err() {
        DependencyError::CircularDependency { chain } => assert!(chain[0].starts_with("Beta")),
        other => panic!("期望 CircularDependency，实际: {other}"),
    }

    // 打破循环后，先前循环的键可以正常解析
    registry.register(None, None, |_: &mut ResolveContext<'_>| Ok(Beta(None)));
    let alpha = registry.resolve::<Alpha>(None, None).unwrap();
    assert!(alpha.0 .0.is_none());
}

#[test]
fn test_stack_is_clean_after_not_found_and_success() {
    let registry = ServiceRegistryImpl::new();
    registry.register(Some("outer"), None, |ctx: &mut ResolveContext<'_>| {
        ctx.resolve::<Gamma>(None, None)?;
        Ok(Greeting("outer".into()))
    });

    for _ in 0..2 {
        let err = registry.resolve::<Greeting>(Some("outer"), None).unwrap_err();
        assert!(err.is_not_found());
    }

    registry.register_value(None, None, Gamma);
    for _ in 0..2 {
        let greeting = registry.resolve::<Greeting>(Some("outer"), None).unwrap();
        assert_eq!(greeting.0, "outer");
    }
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let registry = ServiceRegistryImpl::new();
    registry.register(None, None, |ctx: &mut ResolveContext<'_>| {
        let greeting = ctx.resolve::<Greeting>(None, None)?;
        Ok(Greeting(format!("{}!", greeting.0)))
    });

    let err = registry.resolve::<Greeting>(None, None).unwrap_err();
    assert!(matches!(err, DependencyError::CircularDependency { ref chain } if chain.len() == 2));
}

#[test]
fn test_factory_errors_propagate_verbatim() {
    let registry = ServiceRegistryImpl::new();
    registry.register(None, None, |_: &mut ResolveContext<'_>| -> Result<Gamma, DependencyError> {
        Err(DependencyError::factory_failed(
            "Gamma",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "keychain locked"),
        ))
    });
    registry.register(None, None, |ctx: &mut ResolveContext<'_>| {
        ctx.resolve::<Gamma>(None, None)?;
        Ok(Greeting("unreachable".into()))
    });

    let err = registry.resolve::<Greeting>(None, None).unwrap_err();
    match err {
        DependencyError::FactoryFailed { type_name, source } => {
            assert_eq!(type_name, "Gamma");
            assert_eq!(source.to_string(), "keychain locked");
        }
        other => panic!("期望 FactoryFailed，实际: {other}"),
    }
}

#[test]
fn test_delete_then_resolve() {
    let registry = ServiceRegistryImpl::new();
    registry.register_value(Some("n"), None, Greeting("bye".into()));
    registry.delete::<Greeting>(Some("n"), None);
    assert!(registry.resolve::<Greeting>(Some("n"), None).unwrap_err().is_not_found());

    // 删除从未注册的名称不报错
    registry.delete::<Greeting>(Some("never"), None);
    registry.delete::<Greeting>(Some("never"), Some("nowhere"));
}

#[test]
fn test_clear_scope() {
    let registry = ServiceRegistryImpl::new();
    registry.register_value(None, Some("s"), Greeting("a".into()));
    registry.register_value(Some("other"), Some("s"), Greeting("b".into()));
    registry.register_value(None, Some("s"), Gamma);
    registry.register_value(None, Some("s/child"), Gamma);

    registry.clear_scope("s");
    assert!(!registry.has_registration::<Greeting>(None, Some("s")));
    assert!(!registry.has_registration::<Greeting>(Some("other"), Some("s")));
    assert!(!registry.has_registration::<Gamma>(None, Some("s")));
    assert!(registry.has_registration::<Gamma>(None, Some("s/child")));

    registry.clear_scope("never-existed");
    registry.clear_scope("s");
    assert_eq!(registry.scopes(), vec!["s/child"]);
}

#[test]
fn test_erased_registration_with_wrong_type_is_not_found() {
    let registry = ServiceRegistryImpl::new();
    let key = ServiceKey::of::<Greeting>(None, None);
    registry.register_erased(key.clone(), di_abstractions::value_factory(7_u64));

    assert!(registry.has_registration::<Greeting>(None, None));
    assert!(registry.resolve::<Greeting>(None, None).unwrap_err().is_not_found());

    let erased = registry.resolve_erased(&key).unwrap();
    assert_eq!(erased.downcast_ref::<u64>(), Some(&7));
}

#[test]
fn test_concurrent_resolves_do_not_share_stack() {
    let registry = Arc::new(ServiceRegistryImpl::new());
    registry.register_value(None, None, Greeting("base".into()));
    registry.register(Some("slow"), None, |ctx: &mut ResolveContext<'_>| {
        std::thread::sleep(std::time::Duration::from_millis(5));
        let base = ctx.resolve::<Greeting>(None, None)?;
        Ok(Greeting(format!("{} + slow", base.0)))
    });

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                (0..20)
                    .map(|_| registry.resolve::<Greeting>(Some("slow"), None).map(|g| g.0.clone()))
                    .collect::<Result<Vec<_>, _>>()
            })
        })
        .collect();

    for handle in handles {
        let values = handle.join().unwrap().unwrap();
        assert!(values.iter().all(|v| v == "base + slow"));
    }
}

#[test]
fn test_registry_can_be_shared_as_trait_object() -> anyhow::Result<()> {
    let registry: Arc<dyn ServiceRegistry> = Arc::new(ServiceRegistryImpl::new());
    registry.register_value(None, Some("root"), Greeting("dyn".into()));
    let resolved = registry.resolve::<Greeting>(None, Some("root"))?;
    assert_eq!(resolved.0, "dyn");
    assert_eq!(registry.registered_keys(), vec![ServiceKey::of::<Greeting>(None, Some("root"))]);
    Ok(())
}
