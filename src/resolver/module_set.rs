use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Name of a platform module, e.g. `java.sql`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// Returns `None` for blank names
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicated set of platform modules
///
/// Iteration is in name order so the linker sees the same argument on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleSet(BTreeSet<ModuleName>);

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the module was not already present
    pub fn insert(&mut self, module: ModuleName) -> bool {
        self.0.insert(module)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|m| m.as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleName> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(ModuleName::as_str)
    }

    /// Adds every module of `other`
    pub fn union_with(&mut self, other: ModuleSet) {
        self.0.extend(other.0);
    }
}

impl Extend<ModuleName> for ModuleSet {
    fn extend<I: IntoIterator<Item = ModuleName>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<ModuleName> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = ModuleName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ModuleSet {
    type Item = ModuleName;
    type IntoIter = std::collections::btree_set::IntoIter<ModuleName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModuleSet {
    type Item = &'a ModuleName;
    type IntoIter = std::collections::btree_set::Iter<'a, ModuleName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ModuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().collect::<Vec<_>>().join(","))
    }
}
