//! Locations of the platform tools and the command lines used to drive them

use crate::process::CommandSpec;
use std::env::{self, consts::EXE_SUFFIX, JoinPathsError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Module namespaces that belong to the platform rather than to applications
pub const PLATFORM_NAMESPACES: &[&str] = &["java", "jdk", "javafx", "oracle"];

/// Compression level passed to the linker
const LINK_COMPRESSION: &str = "--compress=2";

/// Where the tools and the module definitions of a platform installation live
///
/// `java_home` holds `bin/jdeps`, `bin/jlink` and `bin/java`. `modules_home` holds
/// the `jmods` directory the linker reads from; it usually equals `java_home` but
/// can point at another installation when cross-linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkLayout {
    java_home: PathBuf,
    modules_home: PathBuf,
    extra_module_path: Vec<PathBuf>,
}

impl JdkLayout {
    pub fn new(java_home: impl Into<PathBuf>, modules_home: impl Into<PathBuf>) -> Self {
        Self {
            java_home: java_home.into(),
            modules_home: modules_home.into(),
            extra_module_path: Vec::new(),
        }
    }

    /// Adds module-path entries searched after `<modules_home>/jmods`
    pub fn with_extra_module_path(mut self, paths: Vec<PathBuf>) -> Self {
        self.extra_module_path = paths;
        self
    }

    pub fn java_home(&self) -> &Path {
        &self.java_home
    }

    pub fn modules_home(&self) -> &Path {
        &self.modules_home
    }

    pub fn tool(&self, name: &str) -> PathBuf {
        self.java_home
            .join("bin")
            .join(format!("{}{}", name, EXE_SUFFIX))
    }

    pub fn jmods_dir(&self) -> PathBuf {
        self.modules_home.join("jmods")
    }

    /// `<modules_home>/jmods` followed by any extra entries, joined with the
    /// platform path separator
    pub fn module_path(&self) -> Result<String, JoinPathsError> {
        let entries = std::iter::once(self.jmods_dir()).chain(self.extra_module_path.iter().cloned());
        let joined = env::join_paths(entries)?;
        Ok(joined.to_string_lossy().into_owned())
    }

    /// `jdeps --list-deps <archive>`
    pub fn list_deps_command(&self, archive: &Path, timeout: Duration) -> CommandSpec {
        CommandSpec::new(self.tool("jdeps"), timeout)
            .arg("--list-deps")
            .arg(archive)
    }

    /// `java --list-modules --module-path <modules_home>/jmods`
    pub fn list_modules_command(&self, timeout: Duration) -> CommandSpec {
        CommandSpec::new(self.tool("java"), timeout)
            .arg("--list-modules")
            .arg("--module-path")
            .arg(self.jmods_dir())
    }

    /// `jlink --module-path .. --add-modules .. --output <dir>` plus the size flags
    pub fn link_command<'a>(
        &self,
        modules: impl IntoIterator<Item = &'a str>,
        output_dir: &Path,
        timeout: Duration,
    ) -> Result<CommandSpec, JoinPathsError> {
        let modules = modules.into_iter().collect::<Vec<_>>().join(",");
        Ok(CommandSpec::new(self.tool("jlink"), timeout)
            .arg("--module-path")
            .arg(self.module_path()?)
            .arg("--add-modules")
            .arg(modules)
            .arg("--output")
            .arg(output_dir)
            .args(["--no-header-files", "--no-man-pages", LINK_COMPRESSION]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn layout() -> JdkLayout {
        JdkLayout::new("/opt/jdk", "/opt/jdk")
    }

    #[test]
    fn test_tool_paths() {
        let jdk = layout();
        assert_eq!(
            jdk.tool("jdeps"),
            PathBuf::from(format!("/opt/jdk/bin/jdeps{}", EXE_SUFFIX))
        );
        assert_eq!(jdk.jmods_dir(), PathBuf::from("/opt/jdk/jmods"));
    }

    #[test]
    fn test_list_deps_command() {
        let spec = layout().list_deps_command(Path::new("/b/libs/app.jar"), Duration::from_secs(60));
        assert_eq!(spec.tool_name(), "jdeps");
        assert_eq!(spec.args, vec!["--list-deps", "/b/libs/app.jar"]);
        assert_eq!(spec.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_list_modules_uses_modules_home() {
        let jdk = JdkLayout::new("/opt/jdk", "/opt/target-jdk");
        let spec = jdk.list_modules_command(Duration::from_secs(60));
        assert_eq!(spec.tool_name(), "java");
        assert_eq!(
            spec.arg_after("--module-path"),
            Some(OsStr::new("/opt/target-jdk/jmods"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_link_command() {
        let jdk = layout().with_extra_module_path(vec![PathBuf::from("/b/mlib")]);
        let spec = jdk
            .link_command(["java.base", "java.sql"], Path::new("/b/app"), Duration::from_secs(1200))
            .unwrap();

        assert_eq!(spec.tool_name(), "jlink");
        assert_eq!(
            spec.arg_after("--module-path"),
            Some(OsStr::new("/opt/jdk/jmods:/b/mlib"))
        );
        assert_eq!(
            spec.arg_after("--add-modules"),
            Some(OsStr::new("java.base,java.sql"))
        );
        assert_eq!(spec.arg_after("--output"), Some(OsStr::new("/b/app")));
        assert!(spec.has_arg("--no-header-files"));
        assert!(spec.has_arg("--no-man-pages"));
        assert!(spec.has_arg("--compress=2"));
    }

    #[test]
    #[cfg(unix)]
    fn test_module_path_rejects_separator_in_entry() {
        let jdk = layout().with_extra_module_path(vec![PathBuf::from("/a:b")]);
        assert!(jdk.module_path().is_err());
    }
}
