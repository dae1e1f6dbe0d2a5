use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::PersistError;
use crate::format::WorldFile;

/// A labelled directory of world files.
///
/// File names are plain names inside the directory (for example
/// `orbit.json`); separators and parent references are rejected.
#[derive(Debug, Clone)]
pub struct WorldDatabase {
    label: String,
    directory: PathBuf,
}

impl WorldDatabase {
    /// Open (and create if missing) the database directory.
    pub fn open(directory: impl Into<PathBuf>, label: &str) -> Result<Self, PersistError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        log::info!("opened database '{}' at {}", label, directory.display());
        Ok(Self {
            label: label.to_string(),
            directory,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_of(&self, filename: &str) -> Result<PathBuf, PersistError> {
        let invalid = filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\'])
            || filename.contains("..");
        if invalid {
            return Err(PersistError::InvalidFilename(filename.to_string()));
        }
        Ok(self.directory.join(filename))
    }

    /// Names of the files in the database, sorted.
    pub fn file_names(&self) -> Result<Vec<String>, PersistError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.path_of(filename).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Raw contents of a file.
    pub fn get_file(&self, filename: &str) -> Result<String, PersistError> {
        let path = self.path_of(filename)?;
        if !path.is_file() {
            return Err(PersistError::NotFound(filename.to_string()));
        }
        log::debug!("{}: reading {}", self.label, filename);
        Ok(fs::read_to_string(path)?)
    }

    /// A file parsed as JSON.
    pub fn get_json(&self, filename: &str) -> Result<Value, PersistError> {
        Ok(serde_json::from_str(&self.get_file(filename)?)?)
    }

    /// Create or overwrite a file.
    pub fn add_file(&self, filename: &str, data: &str) -> Result<(), PersistError> {
        let path = self.path_of(filename)?;
        fs::write(path, data)?;
        log::info!("{}: wrote {}", self.label, filename);
        Ok(())
    }

    pub fn remove_file(&self, filename: &str) -> Result<(), PersistError> {
        let path = self.path_of(filename)?;
        if !path.is_file() {
            return Err(PersistError::NotFound(filename.to_string()));
        }
        fs::remove_file(path)?;
        log::info!("{}: removed {}", self.label, filename);
        Ok(())
    }

    /// Remove every file; returns how many were removed.
    pub fn remove_all_files(&self) -> Result<usize, PersistError> {
        let names = self.file_names()?;
        for name in &names {
            fs::remove_file(self.directory.join(name))?;
        }
        log::info!("{}: removed {} files", self.label, names.len());
        Ok(names.len())
    }

    pub fn load_world(&self, filename: &str) -> Result<WorldFile, PersistError> {
        WorldFile::from_json(&self.get_file(filename)?)
    }

    pub fn save_world(&self, filename: &str, world: &WorldFile) -> Result<(), PersistError> {
        self.add_file(filename, &world.to_json()?)
    }
}
