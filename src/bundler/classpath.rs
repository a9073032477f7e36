use std::fmt;
use std::path::{Path, PathBuf};

/// Separator between classpath entries on the host platform
pub const SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Archives the launcher puts on the classpath, as they will sit in the runtime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Maps archive file names onto `lib_dir`, keeping their order
    pub fn from_names<I, S>(lib_dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: names
                .into_iter()
                .map(|name| lib_dir.join(name.as_ref()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", entry.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_live_under_lib_dir() {
        let cp = Classpath::from_names(Path::new("/out/app/lib"), ["b.jar", "c.jar"]);

        assert_eq!(
            cp.entries(),
            &[
                PathBuf::from("/out/app/lib/b.jar"),
                PathBuf::from("/out/app/lib/c.jar")
            ]
        );
        assert_eq!(
            cp.to_string(),
            format!("/out/app/lib/b.jar{}/out/app/lib/c.jar", SEPARATOR)
        );
    }

    #[test]
    fn test_empty_classpath_renders_nothing() {
        let cp = Classpath::from_names(Path::new("/out/app/lib"), Vec::<String>::new());
        assert!(cp.is_empty());
        assert_eq!(cp.to_string(), "");
    }
}
