//! Launcher script generation

use super::Classpath;
use std::fs;
use std::io;
use std::path::Path;

const UNIX_INTERPRETER: &str = "#!/usr/bin/env bash";

/// The single command a launcher runs, plus the script forms wrapping it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherScript {
    command: String,
}

impl LauncherScript {
    /// `<java> [jvm_args] -jar <executable> <main_class> [app_args] [-cp <classpath>]`
    ///
    /// Absent argument strings are left out rather than rendered as blanks.
    pub fn new(
        java: &Path,
        jvm_args: Option<&str>,
        executable: &Path,
        main_class: &str,
        app_args: Option<&str>,
        classpath: &Classpath,
    ) -> Self {
        let mut parts = vec![java.display().to_string()];
        parts.extend(jvm_args.map(str::to_string));
        parts.push("-jar".to_string());
        parts.push(executable.display().to_string());
        parts.push(main_class.to_string());
        parts.extend(app_args.map(str::to_string));
        if !classpath.is_empty() {
            parts.push("-cp".to_string());
            parts.push(classpath.to_string());
        }

        Self {
            command: parts.join(" "),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn unix_script(&self) -> String {
        format!("{}\n{} \"$@\"\n", UNIX_INTERPRETER, self.command)
    }

    pub fn windows_script(&self) -> String {
        format!("@echo off\r\n{} %*\r\n", self.command)
    }

    /// Writes the shell launcher and makes it executable for everyone
    pub fn write_unix(&self, path: &Path) -> io::Result<()> {
        write_script(path, &self.unix_script())?;
        make_executable(path)
    }

    pub fn write_windows(&self, path: &Path) -> io::Result<()> {
        write_script(path, &self.windows_script())
    }
}

fn write_script(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn script(jvm: Option<&str>, app: Option<&str>, cp: &[&str]) -> LauncherScript {
        LauncherScript::new(
            Path::new("/rt/bin/java"),
            jvm,
            Path::new("/rt/lib/app.jar"),
            "app.Main",
            app,
            &Classpath::from_names(Path::new("/rt/lib"), cp),
        )
    }

    #[test]
    fn test_minimal_command() {
        assert_eq!(
            script(None, None, &[]).command(),
            "/rt/bin/java -jar /rt/lib/app.jar app.Main"
        );
    }

    #[test]
    fn test_full_command() {
        let launcher = script(Some("-Xmx512m -Dmode=prod"), Some("--port 8080"), &["dep.jar"]);
        assert_eq!(
            launcher.command(),
            "/rt/bin/java -Xmx512m -Dmode=prod -jar /rt/lib/app.jar app.Main --port 8080 -cp /rt/lib/dep.jar"
        );
    }

    #[test]
    fn test_script_forms() {
        let launcher = script(None, None, &[]);
        assert_eq!(
            launcher.unix_script(),
            "#!/usr/bin/env bash\n/rt/bin/java -jar /rt/lib/app.jar app.Main \"$@\"\n"
        );
        assert_eq!(
            launcher.windows_script(),
            "@echo off\r\n/rt/bin/java -jar /rt/lib/app.jar app.Main %*\r\n"
        );
    }

    #[test]
    fn test_write_unix_creates_bin_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bin").join("app");

        script(None, None, &[]).write_unix(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(UNIX_INTERPRETER));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_unix_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app");
        script(None, None, &[]).write_unix(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
