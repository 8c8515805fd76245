//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use api_boundary::testing::{JarBuilder, ModuleInfoBuilder};
use api_boundary::{Archive, ElementKind, ElementNode, TypeKind, Visibility};
use tempfile::TempDir;

/// Jar with an explicit module exporting `exported` and carrying one class per package
pub fn module_jar(name: &str, module: &str, exported: &[&str], classes: &[&str]) -> Archive {
    let mut info = ModuleInfoBuilder::new(module);
    for package in exported {
        info = info.exports(package);
    }
    let mut builder = JarBuilder::new().module_info(info);
    for class in classes {
        builder = builder.class(class);
    }
    builder.to_archive(name).unwrap()
}

/// Jar that only carries the proprietary descriptor
pub fn proprietary_jar(name: &str, standard: &[&str], privileged: &[&str]) -> Archive {
    let properties = format!(
        "module.name={}\nartifact.export.classPackages={}\nartifact.privileged.classPackages={}\n",
        name.trim_end_matches(".jar"),
        standard.join(", "),
        privileged.join(", ")
    );
    JarBuilder::new().mule_module(&properties).to_archive(name).unwrap()
}

/// Write the jar bytes to a temp dir and return an archive backed by the file
pub fn on_disk(dir: &TempDir, file_name: &str, builder: JarBuilder) -> (PathBuf, Archive) {
    let path = dir.path().join(file_name);
    std::fs::write(&path, builder.build().unwrap()).unwrap();
    let archive = Archive::from_path(&path);
    (path, archive)
}

pub fn class(archive: &Archive, qualified_name: &str) -> Arc<ElementNode> {
    ElementNode::top_level_type(Some(archive.name()), qualified_name, TypeKind::Class)
}

pub fn public_method(owner: &Arc<ElementNode>, signature: &str) -> Arc<ElementNode> {
    ElementNode::child(owner, ElementKind::Method, signature, Visibility::Public)
}
