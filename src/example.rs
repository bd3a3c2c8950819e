//! Code for working with the bundled demo projects
use anyhow::{Context, Result, bail};
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::Path;

/// The directory containing the demo projects.
const DEMOS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/demos");

/// Get the names of all demo projects
pub fn get_example_names() -> impl Iterator<Item = &'static str> {
    DEMOS_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name()?.to_str())
}

/// A bundled demo project
pub struct Example(Dir<'static>);

impl Example {
    /// Get the example with the specified name
    pub fn from_name(name: &str) -> Result<Self> {
        let dir = DEMOS_DIR
            .get_dir(name)
            .with_context(|| format!("Example '{name}' not found"))?;

        Ok(Self(dir.clone()))
    }

    /// Get the contents of the readme file for this example
    pub fn get_readme(&self) -> Result<&'static str> {
        self.0
            .get_file(self.0.path().join("README.txt"))
            .context("Missing file")?
            .contents_utf8()
            .context("File not UTF-8 encoded")
    }

    /// Extract this example to a specified destination, which must not already exist
    pub fn extract(&self, new_path: &Path) -> Result<()> {
        fs::create_dir(new_path)
            .with_context(|| format!("Could not create directory {}", new_path.display()))?;
        for entry in self.0.entries() {
            match entry {
                DirEntry::Dir(dir) => {
                    bail!("Subdirectories in demos not supported: {}", dir.path().display())
                }
                DirEntry::File(f) => {
                    let file_name = f.path().file_name().context("Missing file name")?;
                    fs::write(new_path.join(file_name), f.contents())?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_examples_have_readme() {
        for example in get_example_names() {
            let readme = Example::from_name(example)
                .unwrap()
                .get_readme()
                .with_context(|| format!("Could not load readme for {example}"))
                .unwrap();

            assert!(!readme.trim().is_empty());
        }
    }

    #[test]
    fn simple_example_exists() {
        assert!(get_example_names().any(|name| name == "simple"));
    }

    #[test]
    fn from_name_unknown() {
        let Err(err) = Example::from_name("no_such_example") else {
            panic!("Expected an error");
        };
        assert_eq!(err.to_string(), "Example 'no_such_example' not found");
    }

    #[test]
    fn extract_simple() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("simple");
        Example::from_name("simple").unwrap().extract(&dest).unwrap();
        assert!(dest.join("project.toml").is_file());
        assert!(dest.join("scenario.csv").is_file());

        // Destination already exists
        assert!(Example::from_name("simple").unwrap().extract(&dest).is_err());
    }
}
