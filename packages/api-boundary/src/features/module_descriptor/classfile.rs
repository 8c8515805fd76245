//! Minimal class-file reader for `module-info.class`
//!
//! Only the constant pool and the `Module` attribute are decoded; everything
//! else is skipped by length.

use thiserror::Error;

/// Module flag: `open module`
pub const ACC_OPEN: u16 = 0x0020;
/// Class access flag carried by every module descriptor
pub const ACC_MODULE: u16 = 0x8000;

const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("invalid UTF-8 string in constant pool: {0}")]
    Utf8Decode(#[from] std::string::FromUtf8Error),
    #[error("class file has no Module attribute")]
    MissingModuleAttribute,
    #[error("class file has more than one Module attribute")]
    DuplicateModuleAttribute,
}

/// One `exports` directive of the `Module` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExport {
    /// Dot-qualified package name
    pub package: String,
    /// Target module names; empty for an unqualified export
    pub targets: Vec<String>,
}

/// Decoded `Module` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAttribute {
    pub name: String,
    pub flags: u16,
    pub exports: Vec<RawExport>,
}

impl ModuleAttribute {
    pub fn is_open(&self) -> bool {
        self.flags & ACC_OPEN != 0
    }
}

/// Parse the `Module` attribute out of `module-info.class` bytes
pub fn parse_module_info(bytes: &[u8]) -> Result<ModuleAttribute, ClassParseError> {
    let mut reader = ClassReader::new(bytes);
    reader.expect_magic()?;
    reader.skip(4)?; // minor + major version
    let constant_pool = ConstantPool::parse(&mut reader)?;

    reader.skip(6)?; // access_flags, this_class, super_class
    let interfaces_count = reader.read_u2()? as usize;
    reader.skip(interfaces_count * 2)?;

    for _ in 0..2 {
        // fields, then methods
        let count = reader.read_u2()?;
        for _ in 0..count {
            reader.skip(6)?;
            let attributes = reader.read_u2()?;
            skip_attributes(&mut reader, attributes)?;
        }
    }

    let attributes_count = reader.read_u2()?;
    let mut module = None;
    for _ in 0..attributes_count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        if constant_pool.utf8(name_index)? != "Module" {
            reader.skip(length)?;
            continue;
        }
        if module.is_some() {
            return Err(ClassParseError::DuplicateModuleAttribute);
        }
        let mut body = ClassReader::new(reader.read_slice(length)?);
        module = Some(parse_module_attribute(&mut body, &constant_pool)?);
    }

    module.ok_or(ClassParseError::MissingModuleAttribute)
}

fn parse_module_attribute(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<ModuleAttribute, ClassParseError> {
    let name = pool.module_name(reader.read_u2()?)?;
    let flags = reader.read_u2()?;
    reader.skip(2)?; // module_version_index

    let requires_count = reader.read_u2()? as usize;
    reader.skip(requires_count * 6)?;

    let exports_count = reader.read_u2()?;
    let mut exports = Vec::with_capacity(exports_count as usize);
    for _ in 0..exports_count {
        let package = pool.package_name(reader.read_u2()?)?.replace('/', ".");
        reader.skip(2)?; // exports_flags
        let to_count = reader.read_u2()?;
        let mut targets = Vec::with_capacity(to_count as usize);
        for _ in 0..to_count {
            targets.push(pool.module_name(reader.read_u2()?)?);
        }
        exports.push(RawExport { package, targets });
    }

    // opens, uses and provides do not affect the API surface
    let opens_count = reader.read_u2()?;
    for _ in 0..opens_count {
        reader.skip(4)?;
        let to_count = reader.read_u2()? as usize;
        reader.skip(to_count * 2)?;
    }
    let uses_count = reader.read_u2()? as usize;
    reader.skip(uses_count * 2)?;
    let provides_count = reader.read_u2()?;
    for _ in 0..provides_count {
        reader.skip(2)?;
        let with_count = reader.read_u2()? as usize;
        reader.skip(with_count * 2)?;
    }

    Ok(ModuleAttribute { name, flags, exports })
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Module { name_index: u16 },
    Package { name_index: u16 },
    Other,
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable); // index 0 unused

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    Constant::Utf8(String::from_utf8(reader.read_slice(length)?.to_vec())?)
                }
                // Integer, Float, Fieldref, Methodref, InterfaceMethodref, NameAndType,
                // Dynamic, InvokeDynamic
                3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // Long, Double take two slots
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    Constant::Unusable
                }
                // Class, String, MethodType
                7 | 8 | 16 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                19 => Constant::Module {
                    name_index: reader.read_u2()?,
                },
                20 => Constant::Package {
                    name_index: reader.read_u2()?,
                },
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    fn package_name(&self, index: u16) -> Result<String, ClassParseError> {
        match self.get(index)? {
            Constant::Package { name_index } => Ok(self.utf8(*name_index)?.to_string()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    fn module_name(&self, index: u16) -> Result<String, ClassParseError> {
        match self.get(index)? {
            Constant::Module { name_index } => Ok(self.utf8(*name_index)?.to_string()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        let end = self.pos.checked_add(len).ok_or(ClassParseError::UnexpectedEof)?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(ClassParseError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }

    fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        Ok(self.read_slice(1)?[0])
    }

    fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

fn skip_attributes(reader: &mut ClassReader<'_>, count: u16) -> Result<(), ClassParseError> {
    for _ in 0..count {
        reader.skip(2)?; // attribute_name_index
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ModuleInfoBuilder;

    #[test]
    fn test_parse_exports_and_targets() {
        let bytes = ModuleInfoBuilder::new("org.foo")
            .exports("org.foo.api")
            .exports_to("org.foo.spi", &["org.bar", "org.baz"])
            .build();

        let module = parse_module_info(&bytes).unwrap();
        assert_eq!(module.name, "org.foo");
        assert!(!module.is_open());
        assert_eq!(
            module.exports,
            vec![
                RawExport {
                    package: "org.foo.api".to_string(),
                    targets: vec![],
                },
                RawExport {
                    package: "org.foo.spi".to_string(),
                    targets: vec!["org.bar".to_string(), "org.baz".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_parse_open_module() {
        let bytes = ModuleInfoBuilder::new("org.open").open().build();
        let module = parse_module_info(&bytes).unwrap();
        assert!(module.is_open());
        assert!(module.exports.is_empty());
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = ModuleInfoBuilder::new("org.foo").build();
        bytes[0] = 0;
        assert!(matches!(parse_module_info(&bytes), Err(ClassParseError::InvalidMagic)));
    }

    #[test]
    fn test_truncated() {
        let bytes = ModuleInfoBuilder::new("org.foo").exports("org.foo.api").build();
        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            parse_module_info(truncated),
            Err(ClassParseError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_plain_class_has_no_module_attribute() {
        let bytes = ModuleInfoBuilder::new("org.foo").without_module_attribute().build();
        assert!(matches!(
            parse_module_info(&bytes),
            Err(ClassParseError::MissingModuleAttribute)
        ));
    }
}
