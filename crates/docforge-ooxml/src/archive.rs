//! Archive handling for DOCX packages
//!
//! A DOCX file is a ZIP archive of XML parts and resources. The archive is
//! held fully in memory; saving to disk goes through a temporary file in the
//! target directory so a failed write never leaves a corrupt document behind.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{OoxmlError, Result};

/// Represents an unpacked DOCX package
#[derive(Debug, Default)]
pub struct OoxmlArchive {
    /// All parts in the package, keyed by path
    parts: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            parts.insert(name, contents);
        }

        Ok(Self { parts })
    }

    /// Get a part's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|v| v.as_slice())
    }

    /// Get a part's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.parts
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get("word/document.xml")
            .ok_or_else(|| OoxmlError::MissingFile("word/document.xml".to_string()))
    }

    /// Check if a part exists in the package
    pub fn contains(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    /// List all parts in the package
    pub fn part_list(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|s| s.as_str())
    }

    /// Header parts (word/header*.xml), in name order
    pub fn header_parts(&self) -> Vec<&str> {
        self.parts_with_prefix("word/header")
    }

    /// Footer parts (word/footer*.xml), in name order
    pub fn footer_parts(&self) -> Vec<&str> {
        self.parts_with_prefix("word/footer")
    }

    fn parts_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .parts
            .keys()
            .filter(|k| k.starts_with(prefix) && k.ends_with(".xml"))
            .map(|s| s.as_str())
            .collect();
        names.sort();
        names
    }

    /// Set or update a part's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.parts.insert(path.into(), contents);
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.parts.insert(path.into(), contents.into().into_bytes());
    }

    /// Remove a part from the package
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.parts.remove(path)
    }

    /// Serialize the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = std::io::Cursor::new(Vec::new());
        self.write_to(&mut output)?;
        Ok(output.into_inner())
    }

    /// Write the package to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        // Sort keys for deterministic output
        let mut paths: Vec<_> = self.parts.keys().collect();
        paths.sort();

        for path in paths {
            let contents = &self.parts[path];
            zip.start_file(path, options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write the package to a file atomically.
    ///
    /// The bytes land in a temporary file next to the target and are renamed
    /// into place only after a complete write.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        write_atomic(path, &bytes)
    }
}

/// Write bytes to `path` through a sibling temporary file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| OoxmlError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn part_operations() {
        let mut archive = OoxmlArchive::new();

        archive.set_string("test.xml", "<root/>");
        assert!(archive.contains("test.xml"));
        assert_eq!(archive.get_string("test.xml"), Some("<root/>".to_string()));

        archive.remove("test.xml");
        assert!(!archive.contains("test.xml"));
    }

    #[test]
    fn roundtrip_through_zip() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("word/document.xml", "<w:document/>");
        archive.set_string("word/header1.xml", "<w:hdr/>");

        let bytes = archive.to_bytes().unwrap();
        let restored = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();

        assert!(restored.contains("word/document.xml"));
        assert_eq!(restored.header_parts(), vec!["word/header1.xml"]);
        assert!(restored.footer_parts().is_empty());
    }

    #[test]
    fn atomic_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deep/out.docx");

        let mut archive = OoxmlArchive::new();
        archive.set_string("word/document.xml", "<w:document/>");
        archive.save(&target).unwrap();

        assert!(target.exists());
        let restored = OoxmlArchive::open(&target).unwrap();
        assert!(restored.contains("word/document.xml"));
    }
}
