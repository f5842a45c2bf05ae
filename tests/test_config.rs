use std::path::PathBuf;
use std::sync::Mutex;

use wicket::config::Config;

// Env vars are process-global; serialize the tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_config_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    unsafe {
        std::env::remove_var("LISTEN");
        std::env::remove_var("WICKET_CONFIG");
    }

    let cfg = Config::load();
    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.web_root, PathBuf::from("public"));
    assert_eq!(cfg.index_file, "index.html");
}

#[test]
fn test_config_listen_env_override() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    unsafe {
        std::env::remove_var("WICKET_CONFIG");
        std::env::set_var("LISTEN", "127.0.0.1:9000");
    }

    let cfg = Config::load();
    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");

    unsafe {
        std::env::remove_var("LISTEN");
    }
}

#[test]
fn test_config_from_yaml_file() {
    let dir = std::env::temp_dir().join(format!("wicket-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("partial.yaml");
    std::fs::write(&path, "listen_addr: \"127.0.0.1:7070\"\nweb_root: \"site\"\n").unwrap();

    let cfg = Config::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:7070");
    assert_eq!(cfg.web_root, PathBuf::from("site"));
    // Unspecified fields keep their defaults.
    assert_eq!(cfg.index_file, "index.html");
}

#[test]
fn test_config_file_via_env() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let dir = std::env::temp_dir().join(format!("wicket-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("full.yaml");
    std::fs::write(
        &path,
        "listen_addr: \"127.0.0.1:7071\"\nweb_root: \"www\"\nindex_file: \"home.html\"\n",
    )
    .unwrap();

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::set_var("WICKET_CONFIG", path.to_str().unwrap());
    }

    let cfg = Config::load();
    assert_eq!(cfg.listen_addr, "127.0.0.1:7071");
    assert_eq!(cfg.web_root, PathBuf::from("www"));
    assert_eq!(cfg.index_file, "home.html");

    unsafe {
        std::env::remove_var("WICKET_CONFIG");
    }
}

#[test]
fn test_config_bad_file_falls_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::set_var("WICKET_CONFIG", "/nonexistent/wicket.yaml");
    }

    let cfg = Config::load();
    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");

    unsafe {
        std::env::remove_var("WICKET_CONFIG");
    }
}
