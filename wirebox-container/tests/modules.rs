use std::sync::Arc;

use wirebox_container::prelude::*;
use wirebox_container::{DeclaredNames, DependencyNameResolver};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wirebox_container=trace")
        .with_test_writer()
        .try_init();
}

struct StorageModule {
    url: &'static str,
}

impl Module for StorageModule {
    fn register(&self, registry: Registry) -> Result<Registry> {
        registry
            .constant("databaseUrl", String::from(self.url), RegisterOptions::new())?
            .function(
                "database",
                Factory::from_fn(|args: Arguments| {
                    let url: String = args.get(0)?;
                    Ok(format!("connected to {url}"))
                })
                .with_dependencies(["databaseUrl"]),
                RegisterOptions::new().cacheable(true),
            )
    }
}

struct ServiceModule;

impl Module for ServiceModule {
    fn register(&self, registry: Registry) -> Result<Registry> {
        registry.function(
            "service",
            Factory::from_async(|args: Arguments| async move {
                let db = args.arc::<String>(0)?;
                Ok::<_, BoxError>(format!("service using {db}"))
            })
            .with_parameters(["database"]),
            RegisterOptions::new(),
        )
    }
}

#[tokio::test]
async fn modules_compose_into_one_graph() {
    init_tracing();
    let injector = Registry::new()
        .install(&StorageModule { url: "postgres://localhost" })
        .unwrap()
        .install(&ServiceModule)
        .unwrap()
        .finalize_checked()
        .unwrap();

    let service: Arc<String> = injector.resolve("service").await.unwrap();
    assert_eq!(*service, "service using connected to postgres://localhost");
    assert!(injector.is_cached("database"));
}

#[tokio::test]
async fn test_registry_forks_from_shared_modules() {
    init_tracing();
    let base = Registry::new().install(&ServiceModule).unwrap();
    let prod = base.install(&StorageModule { url: "postgres://prod" }).unwrap();
    let test = base
        .constant("database", String::from("in-memory"), RegisterOptions::new())
        .unwrap();

    let prod_service: Arc<String> = prod.finalize().resolve("service").await.unwrap();
    let test_service: Arc<String> = test.finalize().resolve("service").await.unwrap();

    assert_eq!(*prod_service, "service using connected to postgres://prod");
    assert_eq!(*test_service, "service using in-memory");
}

/// Prefixes every dependency with an environment tag.
struct Namespaced(&'static str);

impl DependencyNameResolver for Namespaced {
    fn extract(&self, factory: &Factory) -> Vec<ProviderName> {
        DeclaredNames
            .extract(factory)
            .into_iter()
            .map(|name| ProviderName::from(format!("{}.{name}", self.0)))
            .collect()
    }
}

#[tokio::test]
async fn custom_name_resolver() {
    init_tracing();
    let registry = Registry::new()
        .with_name_resolver(Namespaced("staging"))
        .constant("staging.port", 9000u16, RegisterOptions::new())
        .unwrap()
        .function(
            "address",
            Factory::from_fn(|args: Arguments| {
                let port: u16 = args.get(0)?;
                Ok(format!("0.0.0.0:{port}"))
            })
            .with_parameters(["port"]),
            RegisterOptions::new(),
        )
        .unwrap();

    assert_eq!(registry.get("address").unwrap().dependencies(), &["staging.port"]);

    let address: Arc<String> = registry.finalize().resolve("address").await.unwrap();
    assert_eq!(*address, "0.0.0.0:9000");
}
