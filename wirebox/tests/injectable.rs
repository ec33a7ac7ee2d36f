use std::sync::Arc;

use wirebox::prelude::*;

#[derive(Debug)]
struct Database {
    url: String,
}

#[injectable]
impl Database {
    fn new(url: String) -> Self {
        Self { url }
    }
}

struct UserRepository {
    db: Arc<Database>,
    table: &'static str,
}

#[injectable(dependencies("primaryDb", "usersTable"))]
impl UserRepository {
    async fn new(db: Arc<Database>, table: &'static str) -> Self {
        Self { db, table }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("pool size must be positive")]
struct PoolSizeError;

struct Pool {
    size: u32,
}

#[injectable(constructor = "with_size")]
impl Pool {
    fn with_size(size: u32) -> std::result::Result<Self, PoolSizeError> {
        if size == 0 {
            return Err(PoolSizeError);
        }
        Ok(Self { size })
    }
}

#[injectable]
fn greeting(port: u16) -> String {
    format!("listening on {port}")
}

#[injectable]
async fn address(host: String, port: u16) -> String {
    format!("{host}:{port}")
}

#[injectable(dependencies("httpPort"))]
fn checked_port(port: u16) -> std::result::Result<u16, PoolSizeError> {
    if port == 0 { Err(PoolSizeError) } else { Ok(port) }
}

#[injectable]
fn banner() -> &'static str {
    "wirebox"
}

#[test]
fn function_factory_records_parameter_names() {
    let factory = greeting_factory();
    assert_eq!(factory.parameters().unwrap(), &["port"]);
    assert!(factory.explicit_dependencies().is_none());

    let factory = address_factory();
    assert_eq!(factory.parameters().unwrap(), &["host", "port"]);
}

#[test]
fn explicit_dependencies_are_attached() {
    let factory = checked_port_factory();
    assert_eq!(factory.parameters().unwrap(), &["port"]);
    assert_eq!(factory.explicit_dependencies().unwrap(), &["httpPort"]);
}

#[test]
fn construct_constants_are_generated() {
    assert_eq!(Database::PARAMETERS, &["url"]);
    assert_eq!(Database::DEPENDENCIES, None);
    assert_eq!(UserRepository::PARAMETERS, &["db", "table"]);
    assert_eq!(UserRepository::DEPENDENCIES, Some(&["primaryDb", "usersTable"][..]));
    assert_eq!(Pool::PARAMETERS, &["size"]);
}

#[test]
fn original_items_are_kept() {
    assert_eq!(greeting(80), "listening on 80");
    assert_eq!(banner(), "wirebox");
    assert_eq!(Database::new("x".into()).url, "x");
}

#[tokio::test]
async fn functions_resolve_by_parameter_name() {
    let injector = Registry::new()
        .constant("port", 8080u16, RegisterOptions::new())
        .unwrap()
        .constant("host", String::from("localhost"), RegisterOptions::new())
        .unwrap()
        .function("greeting", greeting_factory(), RegisterOptions::new())
        .unwrap()
        .function("address", address_factory(), RegisterOptions::new())
        .unwrap()
        .function("banner", banner_factory(), RegisterOptions::new())
        .unwrap()
        .finalize();

    let text: Arc<String> = injector.resolve("greeting").await.unwrap();
    assert_eq!(*text, "listening on 8080");

    let addr: Arc<String> = injector.resolve("address").await.unwrap();
    assert_eq!(*addr, "localhost:8080");

    let banner: Arc<&'static str> = injector.resolve("banner").await.unwrap();
    assert_eq!(*banner, "wirebox");
}

#[tokio::test]
async fn constructors_resolve_explicit_names() {
    let injector = Registry::new()
        .constant("url", String::from("postgres://primary"), RegisterOptions::new())
        .unwrap()
        .constant("usersTable", "users", RegisterOptions::new())
        .unwrap()
        .ctor::<Database>("primaryDb", RegisterOptions::new().cacheable(true))
        .unwrap()
        .ctor::<UserRepository>("users", RegisterOptions::new())
        .unwrap()
        .finalize();

    let repo: Arc<UserRepository> = injector.resolve("users").await.unwrap();
    assert_eq!(repo.db.url, "postgres://primary");
    assert_eq!(repo.table, "users");

    let db: Arc<Database> = injector.resolve("primaryDb").await.unwrap();
    assert!(Arc::ptr_eq(&db, &repo.db));
}

#[tokio::test]
async fn using_renames_introspected_parameters() {
    let injector = Registry::new()
        .constant("replicaUrl", String::from("postgres://replica"), RegisterOptions::new())
        .unwrap()
        .ctor::<Database>("replica", RegisterOptions::new().using("url", "replicaUrl"))
        .unwrap()
        .finalize();

    let db: Arc<Database> = injector.resolve("replica").await.unwrap();
    assert_eq!(db.url, "postgres://replica");
}

#[tokio::test]
async fn fallible_constructor_errors_pass_through() {
    let injector = Registry::new()
        .constant("size", 0u32, RegisterOptions::new())
        .unwrap()
        .ctor::<Pool>("pool", RegisterOptions::new())
        .unwrap()
        .finalize();

    let err = injector.build("pool").await.unwrap_err();
    assert_eq!(err.to_string(), "pool size must be positive");
    assert!(err.construction_error().unwrap().is::<PoolSizeError>());

    let injector = Registry::new()
        .constant("size", 4u32, RegisterOptions::new())
        .unwrap()
        .ctor::<Pool>("pool", RegisterOptions::new())
        .unwrap()
        .finalize();
    let pool: Arc<Pool> = injector.resolve("pool").await.unwrap();
    assert_eq!(pool.size, 4);
}

#[tokio::test]
async fn argument_type_mismatch_is_reported() {
    let injector = Registry::new()
        .constant("port", String::from("not a number"), RegisterOptions::new())
        .unwrap()
        .function("greeting", greeting_factory(), RegisterOptions::new())
        .unwrap()
        .finalize();

    match injector.build("greeting").await.unwrap_err() {
        WireboxError::TypeMismatch(e) => {
            assert_eq!(e.provider, "port");
            assert_eq!(e.expected, "u16");
        }
        other => panic!("Expected TypeMismatch, got: {other:?}"),
    }
}
