use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Fixed artifact layout under one root directory
#[derive(Clone, Debug)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lexicon(&self) -> PathBuf {
        self.root.join("lexicon")
    }

    pub fn doc_store(&self) -> PathBuf {
        self.root.join("docStore")
    }

    pub fn forward_index(&self) -> PathBuf {
        self.root.join("forwardIndex")
    }

    pub fn barrels_dir(&self) -> PathBuf {
        self.root.join("barrels")
    }

    pub fn barrel(&self, shard: u32) -> PathBuf {
        self.barrels_dir().join(shard.to_string())
    }
}

/// Read a JSON artifact that must exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

/// Read a JSON artifact, mapping a missing file to `None`
pub fn read_json_opt<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match File::open(path) {
        Ok(file) => {
            let value = serde_json::from_reader(BufReader::new(file))?;
            Ok(Some(value))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Serialize to a temp file in the target directory, then rename over the
/// destination. Readers see the old file or the new one, never a partial
/// write.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_layout() {
        let paths = ArtifactPaths::new("/data");
        assert_eq!(paths.lexicon(), PathBuf::from("/data/lexicon"));
        assert_eq!(paths.doc_store(), PathBuf::from("/data/docStore"));
        assert_eq!(paths.forward_index(), PathBuf::from("/data/forwardIndex"));
        assert_eq!(paths.barrel(7), PathBuf::from("/data/barrels/7"));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("artifact");

        let mut map = BTreeMap::new();
        map.insert("alpha".to_string(), 1u32);
        write_json_atomic(&path, &map).unwrap();

        let back: BTreeMap<String, u32> = read_json(&path).unwrap();
        assert_eq!(back, map);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let got: Option<Vec<u32>> = read_json_opt(&tmp.path().join("absent")).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_rewrite_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("artifact");
        write_json_atomic(&path, &vec![1u32, 2]).unwrap();
        write_json_atomic(&path, &vec![3u32]).unwrap();
        let back: Vec<u32> = read_json(&path).unwrap();
        assert_eq!(back, vec![3]);
    }
}
