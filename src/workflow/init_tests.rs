use super::run_init;
use crate::cli::InitArgs;
use crate::import;

fn init_args(root: &std::path::Path, force: bool, api_base: Option<&str>) -> InitArgs {
    InitArgs {
        workspace: Some(root.to_path_buf()),
        force,
        api_base: api_base.map(str::to_string),
    }
}

#[test]
fn init_writes_default_config_and_refuses_overwrite() {
    let dir = tempfile::tempdir().expect("create temp dir");

    run_init(&init_args(dir.path(), false, None)).expect("first init");
    let config = import::load_config(dir.path()).expect("load config");
    assert_eq!(config, import::default_config());

    let err = run_init(&init_args(dir.path(), false, None)).expect_err("second init");
    assert!(err.to_string().contains("use --force"));
}

#[test]
fn init_force_applies_api_base_override() {
    let dir = tempfile::tempdir().expect("create temp dir");
    run_init(&init_args(dir.path(), false, None)).expect("first init");

    run_init(&init_args(dir.path(), true, Some(" https://catalog.example "))).expect("re-init");

    let config = import::load_config(dir.path()).expect("load config");
    assert_eq!(config.api_base, "https://catalog.example");
}

#[test]
fn init_rejects_non_http_api_base() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let err = run_init(&init_args(dir.path(), false, Some("ftp://catalog"))).expect_err("bad base");

    assert!(err.to_string().contains("api_base"));
    assert!(!dir.path().join("import/config.json").exists());
}
