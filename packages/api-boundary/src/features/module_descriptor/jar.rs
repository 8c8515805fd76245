//! Jar access on top of the `zip` crate

use std::io::Read;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::errors::{BoundaryError, Result};
use crate::shared::models::{Archive, ArchiveReader};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Open jar with its entry names listed once
pub struct JarReader {
    archive_name: String,
    zip: ZipArchive<ArchiveReader>,
}

impl JarReader {
    /// Open the archive; any failure is logged and becomes `ArchiveRead`
    pub fn open(archive: &Archive) -> Result<Self> {
        let reader = archive
            .open()
            .map_err(|e| read_failure(archive.name(), e))?;
        let zip = ZipArchive::new(reader).map_err(|e| read_failure(archive.name(), e))?;
        Ok(Self {
            archive_name: archive.name().to_string(),
            zip,
        })
    }

    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    /// Bytes of an entry, `None` when the jar has no such entry
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(read_failure(&self.archive_name, e)),
        };

        let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| read_failure(&self.archive_name, e))?;
        Ok(Some(bytes))
    }

    /// Value of a main-section manifest attribute
    pub fn manifest_attribute(&mut self, attribute: &str) -> Result<Option<String>> {
        let Some(bytes) = self.read_entry(MANIFEST_PATH)? else {
            return Ok(None);
        };
        Ok(main_attribute(&String::from_utf8_lossy(&bytes), attribute))
    }
}

/// Largest preallocation for an entry; declared sizes come from the archive
const MAX_CAPACITY_HINT: u64 = 1 << 20;

fn capacity_hint(declared_size: u64) -> usize {
    declared_size.min(MAX_CAPACITY_HINT) as usize
}

fn read_failure(
    archive: &str,
    error: impl std::error::Error + Send + Sync + 'static,
) -> BoundaryError {
    tracing::error!(archive = %archive, error = %error, "Failed to open the archive as a jar");
    BoundaryError::archive_read(archive, error)
}

/// Look up an attribute in the main section of a manifest.
///
/// Lines starting with a single space continue the previous line; the main
/// section ends at the first blank line.
fn main_attribute(manifest: &str, attribute: &str) -> Option<String> {
    let mut headers: Vec<String> = Vec::new();
    for line in manifest.lines() {
        if line.is_empty() {
            break;
        }
        match (line.strip_prefix(' '), headers.last_mut()) {
            (Some(continuation), Some(last)) => last.push_str(continuation),
            _ => headers.push(line.to_string()),
        }
    }

    headers.iter().find_map(|header| {
        let (name, value) = header.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case(attribute)
            .then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::JarBuilder;

    #[test]
    fn test_read_entry() {
        let archive = JarBuilder::new()
            .entry("META-INF/notes.txt", "hello")
            .to_archive("lib.jar")
            .unwrap();

        let mut jar = JarReader::open(&archive).unwrap();
        assert_eq!(jar.read_entry("META-INF/notes.txt").unwrap(), Some(b"hello".to_vec()));
        assert_eq!(jar.read_entry("missing.txt").unwrap(), None);
        assert_eq!(jar.entry_names(), vec!["META-INF/notes.txt".to_string()]);
    }

    #[test]
    fn test_declared_size_does_not_drive_allocation() {
        assert_eq!(capacity_hint(0), 0);
        assert_eq!(capacity_hint(4096), 4096);
        assert_eq!(capacity_hint(u64::MAX), MAX_CAPACITY_HINT as usize);
        assert_eq!(capacity_hint(i64::MAX as u64 + 1), MAX_CAPACITY_HINT as usize);
    }

    #[test]
    fn test_corrupt_archive() {
        let archive = Archive::from_bytes("broken.jar", b"definitely not a zip".to_vec());
        let err = JarReader::open(&archive).err().unwrap();
        assert_eq!(err.kind(), "archive_read");
        assert!(err.to_string().contains("broken.jar"));
    }

    #[test]
    fn test_manifest_attribute() {
        let archive = JarBuilder::new()
            .automatic_module_name("org.legacy")
            .to_archive("legacy.jar")
            .unwrap();

        let mut jar = JarReader::open(&archive).unwrap();
        assert_eq!(
            jar.manifest_attribute("Automatic-Module-Name").unwrap(),
            Some("org.legacy".to_string())
        );
        assert_eq!(jar.manifest_attribute("Main-Class").unwrap(), None);
    }

    #[test]
    fn test_manifest_continuation_lines() {
        let manifest = "Manifest-Version: 1.0\r\nAutomatic-Module-Name: org.very.long.mod\r\n ule.name\r\n\r\nName: x\r\nAutomatic-Module-Name: ignored\r\n";
        assert_eq!(
            main_attribute(manifest, "automatic-module-name"),
            Some("org.very.long.module.name".to_string())
        );
    }
}
