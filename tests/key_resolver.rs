mod common;
use common::ENV_LOCK;

use sshops::constants::auth;
use sshops::errors::ToolErrorKind;
use sshops::services::keys::KeyResolver;
use sshops::services::logger::Logger;
use sshops::tools::Target;

fn tmp_dir(prefix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
}

fn resolver() -> KeyResolver {
    KeyResolver::new(Logger::new("test"))
}

fn target(private_key_path: Option<&str>) -> Target {
    Target {
        host: "example.org".to_string(),
        user: "deploy".to_string(),
        port: 22,
        private_key_path: private_key_path.map(|s| s.to_string()),
    }
}

#[tokio::test]
async fn explicit_missing_path_reports_only_that_path() {
    let missing = "/nonexistent/sshops-test-key";
    let err = resolver()
        .resolve(Some(missing))
        .expect_err("missing explicit key must fail");

    assert_eq!(err.kind, ToolErrorKind::KeyResolution);
    assert!(err.message.contains(missing), "message: {}", err.message);
    assert!(
        !err.message.contains("id_rsa"),
        "defaults must not be consulted: {}",
        err.message
    );
}

#[tokio::test]
async fn default_candidates_tried_in_order_and_all_reported() {
    let _guard = ENV_LOCK.lock().await;

    let home = tmp_dir("sshops-empty-home");
    std::fs::create_dir_all(&home).expect("create home");
    let saved_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", &home);

    let err = resolver()
        .resolve(None)
        .expect_err("no defaults exist in empty home");

    match saved_home {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }

    assert_eq!(err.kind, ToolErrorKind::KeyResolution);
    let rsa = err.message.find("id_rsa").expect("mentions id_rsa");
    let ed25519 = err.message.find("id_ed25519").expect("mentions id_ed25519");
    let ecdsa = err.message.find("id_ecdsa").expect("mentions id_ecdsa");
    assert!(rsa < ed25519 && ed25519 < ecdsa, "fixed order: {}", err.message);
}

#[tokio::test]
async fn first_readable_default_wins() {
    let _guard = ENV_LOCK.lock().await;

    let home = tmp_dir("sshops-home");
    std::fs::create_dir_all(home.join(".ssh")).expect("create .ssh");
    std::fs::write(home.join(".ssh/id_rsa"), "RSA KEY").expect("write id_rsa");
    std::fs::write(home.join(".ssh/id_ed25519"), "ED KEY").expect("write id_ed25519");
    let saved_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", &home);

    let key = resolver().resolve(None).expect("id_rsa is readable");

    match saved_home {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }

    assert_eq!(key, "RSA KEY");
}

#[tokio::test]
async fn explicit_readable_path_returns_contents() {
    let dir = tmp_dir("sshops-keys");
    std::fs::create_dir_all(&dir).expect("create dir");
    let path = dir.join("deploy_key");
    std::fs::write(&path, "PEM MATERIAL").expect("write key");

    let key = resolver()
        .resolve(Some(path.to_str().expect("utf8 path")))
        .expect("explicit key is readable");
    assert_eq!(key, "PEM MATERIAL");
}

#[tokio::test]
async fn key_source_prefers_explicit_argument_over_env() {
    let _guard = ENV_LOCK.lock().await;

    std::env::set_var(auth::PRIVATE_KEY_ENV, "/from/env");
    assert_eq!(
        target(Some("/from/args")).key_source().as_deref(),
        Some("/from/args")
    );
    assert_eq!(target(None).key_source().as_deref(), Some("/from/env"));

    std::env::remove_var(auth::PRIVATE_KEY_ENV);
    assert_eq!(target(None).key_source(), None);
}
