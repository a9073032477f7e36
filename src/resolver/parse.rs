//! Parsing of the analysis tools' line output

use super::ModuleName;
use crate::jdk::PLATFORM_NAMESPACES;

/// Extracts a platform module from one line of `jdeps --list-deps` output.
///
/// Only names in a platform namespace are kept. A trailing package qualifier
/// (`java.desktop/sun.awt`) is dropped.
pub fn parse_dependency_line(line: &str) -> Option<ModuleName> {
    let trimmed = line.trim();
    let (namespace, _) = trimmed.split_once('.')?;
    if !PLATFORM_NAMESPACES.contains(&namespace) {
        return None;
    }
    let name = trimmed.split_once('/').map_or(trimmed, |(module, _)| module);
    ModuleName::new(name)
}

/// Extracts the module from one line of `java --list-modules` output, dropping
/// the `@version` suffix.
pub fn parse_module_listing_line(line: &str) -> Option<ModuleName> {
    let trimmed = line.trim();
    let name = trimmed.split_once('@').map_or(trimmed, |(module, _)| module);
    ModuleName::new(name)
}
