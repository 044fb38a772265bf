//! Mode selection and role derivation against a sandboxed platform.

mod common;

use std::fs;

use apphome_core::{AppContext, InitOptions, PathError, PathRole, ResolutionMode};
use common::{APP, Sandbox};

fn options() -> InitOptions {
    InitOptions::new(APP)
}

#[test]
fn system_mode_without_boot_config() {
    let sandbox = Sandbox::new();
    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    let roots = &sandbox.resolver.roots;

    assert_eq!(ctx.mode(), ResolutionMode::System);
    assert!(!ctx.using_local_mode());
    assert_eq!(ctx.path(PathRole::GlobalConfig), roots.global_config);
    assert_eq!(ctx.path(PathRole::UserConfig), roots.user_config);
    assert_eq!(ctx.path(PathRole::UserLocale), roots.user_local);
    assert_eq!(ctx.path(PathRole::Downloads), roots.downloads);
    assert_eq!(ctx.path(PathRole::Temp), roots.temp);
    assert_eq!(ctx.path(PathRole::Bundles), roots.user_config.join("Bundles"));
    assert_eq!(ctx.path(PathRole::FileLists), roots.user_local.join("FileLists"));
    assert_eq!(ctx.path(PathRole::ShareCache), roots.user_local.join("ShareCache"));
}

#[test]
fn user_roles_are_created_install_roles_only_reported() {
    let sandbox = Sandbox::new();
    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();

    for (role, path) in ctx.paths().iter() {
        if role.is_install_location() {
            assert!(!path.exists(), "{role} should not be created");
        } else {
            assert!(path.is_dir(), "{role} missing at {}", path.display());
        }
    }

    let mut reported: Vec<_> = ctx.diagnostics().iter().map(|d| d.role).collect();
    reported.sort();
    assert_eq!(
        reported,
        vec![PathRole::GlobalConfig, PathRole::Resources, PathRole::Locale]
    );
}

#[test]
fn boot_config_selects_local_mode() {
    let sandbox = Sandbox::new();
    sandbox.write_boot("# portable install\nportable-data\n");

    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    let exe_dir = sandbox.exe_dir();

    assert_eq!(ctx.mode(), ResolutionMode::Local);
    assert!(ctx.using_local_mode());
    assert_eq!(ctx.path(PathRole::UserConfig), exe_dir.join("portable-data"));
    for (role, path) in ctx.paths().iter() {
        assert!(
            path.starts_with(&exe_dir),
            "{role} escaped the install dir: {}",
            path.display()
        );
    }
    assert_eq!(ctx.path(PathRole::Temp), exe_dir.join("portable-data").join("tmp"));
}

#[test]
fn override_wins_over_boot_config_and_is_not_local_mode() {
    let sandbox = Sandbox::new();
    sandbox.write_boot("portable-data");
    let custom = sandbox.temp.path().join("custom-config");

    let ctx = AppContext::initialize_with(
        &sandbox.resolver,
        &options().with_config_override(&custom),
    )
    .unwrap();

    assert_eq!(ctx.mode(), ResolutionMode::Override);
    assert!(!ctx.using_local_mode());
    assert_eq!(ctx.path(PathRole::UserConfig), custom);
    assert_eq!(ctx.path(PathRole::UserLocale), custom);
    assert_eq!(ctx.bundle_path(), custom.join("Bundles"));
    assert_eq!(ctx.path(PathRole::Temp), sandbox.resolver.roots.temp);
    assert!(!sandbox.exe_dir().join("portable-data").exists());
}

#[test]
fn override_with_tilde_expands_against_home() {
    let sandbox = Sandbox::new();

    let ctx = AppContext::initialize_with(
        &sandbox.resolver,
        &options().with_config_override("~/alt"),
    )
    .unwrap();

    assert_eq!(
        ctx.path(PathRole::UserConfig),
        sandbox.resolver.home.join("alt")
    );
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_override_is_used_verbatim() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let sandbox = Sandbox::new();
    let custom = sandbox.temp.path().join(OsStr::from_bytes(b"cfg\xff"));

    let ctx = AppContext::initialize_with(
        &sandbox.resolver,
        &options().with_config_override(&custom),
    )
    .unwrap();

    assert_eq!(ctx.path(PathRole::UserConfig), custom);
    assert!(custom.is_dir());
}

#[test]
fn override_survives_missing_platform_roots() {
    let mut sandbox = Sandbox::new();
    sandbox.resolver.roots_unavailable = true;
    let custom = sandbox.temp.path().join("custom-config");

    let ctx = AppContext::initialize_with(
        &sandbox.resolver,
        &options().with_config_override(&custom),
    )
    .unwrap();

    assert_eq!(ctx.mode(), ResolutionMode::Override);
    assert_eq!(ctx.path(PathRole::UserConfig), custom);
    assert_eq!(ctx.path(PathRole::GlobalConfig), sandbox.exe_dir());
    assert_eq!(ctx.path(PathRole::Downloads), custom.join("Downloads"));
    assert_eq!(ctx.temp_path(), custom.join("tmp"));
    assert!(ctx.temp_path().is_dir());
}

#[test]
fn missing_platform_roots_are_fatal_in_system_mode() {
    let mut sandbox = Sandbox::new();
    sandbox.resolver.roots_unavailable = true;

    let err = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap_err();
    assert!(matches!(err, PathError::NoHomeDir));
}

#[test]
fn unusable_boot_config_stays_in_local_mode() {
    let sandbox = Sandbox::new();
    let exe_dir = sandbox.exe_dir();
    fs::create_dir(exe_dir.join(format!("{APP}.boot"))).unwrap();

    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();

    assert!(ctx.using_local_mode());
    assert_eq!(ctx.path(PathRole::UserConfig), exe_dir.join("Settings"));
    assert!(!sandbox.resolver.roots.user_config.exists());
}

#[test]
fn paths_are_stable_across_reads() {
    let sandbox = Sandbox::new();
    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();

    for role in PathRole::ALL {
        assert_eq!(ctx.path(role), ctx.path(role));
        assert_eq!(ctx.path(role), &ctx.paths()[role]);
    }
    assert_eq!(ctx.paths().clone(), *ctx.paths());
}

#[test]
fn derived_accessors_project_the_table() {
    let sandbox = Sandbox::new();
    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();

    assert_eq!(ctx.list_path(), ctx.path(PathRole::FileLists));
    assert_eq!(ctx.bundle_path(), ctx.path(PathRole::Bundles));
    assert_eq!(ctx.share_cache_path(), ctx.path(PathRole::ShareCache));
    assert_eq!(ctx.open_path(), ctx.temp_path().join("Open"));
    assert_eq!(ctx.app_file_name(), Some(APP));
    assert_eq!(ctx.app_path(), sandbox.exe_dir());
}

#[test]
fn unclean_shutdown_is_detected_from_run_marker() {
    let sandbox = Sandbox::new();

    let first = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    assert!(!first.was_unclean_shutdown());

    // No clean shutdown recorded.
    let second = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    assert!(second.was_unclean_shutdown());

    second.mark_clean_shutdown();
    let third = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    assert!(!third.was_unclean_shutdown());
}

#[test]
fn unwritable_config_root_is_fatal() {
    let sandbox = Sandbox::new();
    let blocker = sandbox.temp.path().join("blocker");
    fs::write(&blocker, b"not a dir").unwrap();

    let err = AppContext::initialize_with(
        &sandbox.resolver,
        &options().with_config_override(blocker.join("config")),
    )
    .unwrap_err();

    assert!(matches!(err, PathError::CreateFailed { .. }));
    assert!(err.is_fatal());
}

#[test]
fn uncreatable_secondary_role_degrades() {
    let mut sandbox = Sandbox::new();
    let blocker = sandbox.temp.path().join("blocker");
    fs::write(&blocker, b"not a dir").unwrap();
    sandbox.resolver.roots.temp = blocker.join("tmp");

    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();

    assert_eq!(ctx.temp_path(), blocker.join("tmp"));
    assert!(
        ctx.diagnostics()
            .iter()
            .any(|d| d.role == PathRole::Temp && matches!(d.error, PathError::CreateFailed { .. }))
    );
}

#[test]
fn os_version_is_passed_through() {
    let mut sandbox = Sandbox::new();
    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    assert_eq!(ctx.os_version().map(|v| (v.major, v.minor)), Some((6, 18)));

    sandbox.resolver.version = None;
    let ctx = AppContext::initialize_with(&sandbox.resolver, &options()).unwrap();
    assert_eq!(ctx.os_version(), None);
}
