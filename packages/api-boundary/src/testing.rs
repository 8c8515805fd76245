//! Fixture builders for tests
//!
//! `ModuleInfoBuilder` writes `module-info.class` bytes; `JarBuilder` packs
//! entries into an in-memory jar.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::features::module_descriptor::classfile::{ACC_MODULE, ACC_OPEN};
use crate::shared::models::Archive;

enum PoolEntry {
    Utf8(String),
    Class(u16),
    Module(u16),
    Package(u16),
}

#[derive(Default)]
struct PoolWriter {
    entries: Vec<PoolEntry>,
    utf8_index: HashMap<String, u16>,
}

impl PoolWriter {
    fn push(&mut self, entry: PoolEntry) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8_index.get(value) {
            return *index;
        }
        let index = self.push(PoolEntry::Utf8(value.to_string()));
        self.utf8_index.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.push(PoolEntry::Class(name_index))
    }

    fn module(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.push(PoolEntry::Module(name_index))
    }

    fn package(&mut self, dotted: &str) -> u16 {
        let name_index = self.utf8(&dotted.replace('.', "/"));
        self.push(PoolEntry::Package(name_index))
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.entries.len() as u16 + 1).to_be_bytes());
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(value) => {
                    out.push(1);
                    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
                    out.extend_from_slice(value.as_bytes());
                }
                PoolEntry::Class(index) => {
                    out.push(7);
                    out.extend_from_slice(&index.to_be_bytes());
                }
                PoolEntry::Module(index) => {
                    out.push(19);
                    out.extend_from_slice(&index.to_be_bytes());
                }
                PoolEntry::Package(index) => {
                    out.push(20);
                    out.extend_from_slice(&index.to_be_bytes());
                }
            }
        }
    }
}

/// Builds `module-info.class` bytes
pub struct ModuleInfoBuilder {
    name: String,
    flags: u16,
    exports: Vec<(String, Vec<String>)>,
    with_module_attribute: bool,
}

impl ModuleInfoBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            exports: Vec::new(),
            with_module_attribute: true,
        }
    }

    pub fn open(mut self) -> Self {
        self.flags |= ACC_OPEN;
        self
    }

    pub fn exports(mut self, package: &str) -> Self {
        self.exports.push((package.to_string(), Vec::new()));
        self
    }

    pub fn exports_to(mut self, package: &str, targets: &[&str]) -> Self {
        self.exports.push((
            package.to_string(),
            targets.iter().map(|t| t.to_string()).collect(),
        ));
        self
    }

    /// Produce a class file that carries no `Module` attribute
    pub fn without_module_attribute(mut self) -> Self {
        self.with_module_attribute = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();
        let this_class = pool.class("module-info");
        let attribute_name = pool.utf8("Module");
        let module_index = pool.module(&self.name);

        let mut body = Vec::new();
        body.extend_from_slice(&module_index.to_be_bytes());
        body.extend_from_slice(&self.flags.to_be_bytes());
        body.extend_from_slice(&0u16.to_be_bytes()); // version
        body.extend_from_slice(&0u16.to_be_bytes()); // requires
        body.extend_from_slice(&(self.exports.len() as u16).to_be_bytes());
        for (package, targets) in &self.exports {
            let package_index = pool.package(package);
            body.extend_from_slice(&package_index.to_be_bytes());
            body.extend_from_slice(&0u16.to_be_bytes());
            body.extend_from_slice(&(targets.len() as u16).to_be_bytes());
            for target in targets {
                body.extend_from_slice(&pool.module(target).to_be_bytes());
            }
        }
        body.extend_from_slice(&0u16.to_be_bytes()); // opens
        body.extend_from_slice(&0u16.to_be_bytes()); // uses
        body.extend_from_slice(&0u16.to_be_bytes()); // provides

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&53u16.to_be_bytes());
        pool.write(&mut out);
        out.extend_from_slice(&ACC_MODULE.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // super_class
        out.extend_from_slice(&0u16.to_be_bytes()); // interfaces
        out.extend_from_slice(&0u16.to_be_bytes()); // fields
        out.extend_from_slice(&0u16.to_be_bytes()); // methods
        if self.with_module_attribute {
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&attribute_name.to_be_bytes());
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(&body);
        } else {
            out.extend_from_slice(&0u16.to_be_bytes());
        }
        out
    }
}

/// Builds an in-memory jar
#[derive(Default)]
pub struct JarBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl JarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.to_string(), bytes.into()));
        self
    }

    pub fn module_info(self, module: ModuleInfoBuilder) -> Self {
        self.entry("module-info.class", module.build())
    }

    pub fn versioned_module_info(self, release: u32, module: ModuleInfoBuilder) -> Self {
        let name = format!("META-INF/versions/{}/module-info.class", release);
        self.entry(&name, module.build())
    }

    pub fn automatic_module_name(self, name: &str) -> Self {
        let manifest = format!(
            "Manifest-Version: 1.0\r\nAutomatic-Module-Name: {}\r\n\r\n",
            name
        );
        self.entry("META-INF/MANIFEST.MF", manifest)
    }

    pub fn mule_module(self, properties: &str) -> Self {
        self.entry("META-INF/mule-module.properties", properties)
    }

    /// Empty class file placeholder for a type, e.g. `org/foo/A.class`
    pub fn class(self, qualified_name: &str) -> Self {
        let name = format!("{}.class", qualified_name.replace('.', "/"));
        self.entry(&name, 0xCAFE_BABEu32.to_be_bytes().to_vec())
    }

    pub fn build(&self) -> ZipResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, bytes) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }
        Ok(writer.finish()?.into_inner())
    }

    pub fn to_archive(&self, name: &str) -> ZipResult<Archive> {
        Ok(Archive::from_bytes(name, self.build()?))
    }
}
