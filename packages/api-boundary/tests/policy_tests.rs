//! Mode precedence and fallback on archives read from disk

mod common;

use api_boundary::features::module_descriptor::read_proprietary_module;
use api_boundary::testing::{JarBuilder, ModuleInfoBuilder};
use api_boundary::{
    ApiBoundaryConfig, BoundaryKind, BoundaryResolutionPolicy, DeclaredType, ModuleSystemMode,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn resolve(mode: ModuleSystemMode, archive: &api_boundary::Archive) -> std::sync::Arc<dyn api_boundary::ApiBoundary> {
    BoundaryResolutionPolicy::from_config(&ApiBoundaryConfig::new(mode))
        .unwrap()
        .resolve_archive_boundary(archive)
        .unwrap()
}

#[test]
fn automatic_module_falls_back_to_proprietary_descriptor() {
    let dir = TempDir::new().unwrap();
    let (_, archive) = common::on_disk(
        &dir,
        "legacy-1.4.2.jar",
        JarBuilder::new()
            .automatic_module_name("org.legacy")
            .mule_module("artifact.export.classPackages=org.legacy.api\nartifact.privileged.classPackages=org.legacy.spi\n")
            .class("org.legacy.api.Client")
            .class("org.legacy.impl.ClientImpl"),
    );

    let boundary = resolve(ModuleSystemMode::Mixed, &archive);
    let name = archive.name();
    assert_eq!(boundary.kind(), BoundaryKind::Proprietary);
    assert!(boundary.is_api(&DeclaredType::new(name, "org.legacy.api.Client")));
    assert!(boundary.is_api(&DeclaredType::new(name, "org.legacy.spi.Hook")));
    assert!(!boundary.is_api(&DeclaredType::new(name, "org.legacy.impl.ClientImpl")));
}

#[test]
fn plain_jar_without_descriptor_is_all_api() {
    let dir = TempDir::new().unwrap();
    let (_, archive) = common::on_disk(&dir, "plain-2.0.jar", JarBuilder::new().class("org.plain.A"));

    let boundary = resolve(ModuleSystemMode::Mixed, &archive);
    assert_eq!(boundary.kind(), BoundaryKind::Platform);
    assert_eq!(boundary.module_name(), Some("plain"));
    assert!(boundary.is_empty());
    assert!(boundary.is_api(&DeclaredType::new(archive.name(), "org.plain.A")));
}

#[test]
fn explicit_module_wins_over_descriptor() {
    let archive = JarBuilder::new()
        .module_info(ModuleInfoBuilder::new("org.foo").exports("org.foo.api"))
        .mule_module("artifact.export.classPackages=org.foo.api, org.foo.extra\n")
        .to_archive("foo.jar")
        .unwrap();

    let boundary = resolve(ModuleSystemMode::Mixed, &archive);
    assert_eq!(boundary.kind(), BoundaryKind::Platform);
    assert!(!boundary.is_api(&DeclaredType::new("foo.jar", "org.foo.extra.X")));
}

#[test]
fn proprietary_package_list_parsing() {
    let archive = common::proprietary_jar("mule.jar", &["org.foo", "org.bar", "", "org.baz", "org.foo"], &[]);
    let descriptor = read_proprietary_module(&archive, &Default::default())
        .unwrap()
        .unwrap();
    let expected: std::collections::BTreeSet<String> =
        ["org.bar", "org.baz", "org.foo"].iter().map(|s| s.to_string()).collect();
    assert_eq!(descriptor.standard_packages, expected);
}

#[test]
fn missing_file_is_archive_read_error() {
    let archive = api_boundary::Archive::from_path("/nonexistent/dir/missing.jar");
    let err = BoundaryResolutionPolicy::from_config(&ApiBoundaryConfig::default())
        .unwrap()
        .resolve_archive_boundary(&archive)
        .err()
        .unwrap();
    assert_eq!(err.kind(), "archive_read");
    assert!(err.to_string().contains("missing.jar"));
}

#[test]
fn adding_pattern_for_every_target_flips_export() {
    let archive = JarBuilder::new()
        .module_info(ModuleInfoBuilder::new("org.foo").exports_to("org.foo.shared", &["org.x", "org.y"]))
        .to_archive("foo.jar")
        .unwrap();
    let shared = DeclaredType::new("foo.jar", "org.foo.shared.S");

    let with = |patterns: &[&str]| {
        let config = patterns
            .iter()
            .fold(ApiBoundaryConfig::new(ModuleSystemMode::PlatformOnly), |c, p| c.with_excluded_target(*p));
        BoundaryResolutionPolicy::from_config(&config)
            .unwrap()
            .resolve_archive_boundary(&archive)
            .unwrap()
            .is_api(&shared)
    };

    assert!(with(&[]));
    assert!(with(&["org\\.x"]));
    assert!(!with(&["org\\.x", "org\\.y"]));
    assert!(!with(&["org\\..*"]));
}
