//! In-memory section tree.
//!
//! A [`SectionTree`] maps section names to [`Section`]s; a section maps keys to raw
//! text values. Both are thin wrappers around [`IndexMap`] so that iteration follows
//! insertion order and written output is deterministic.
//!
//! Nesting is expressed only through naming: the section of a nested object is
//! `<parent>.<field>`. No explicit parent/child links are stored.
//!
//! A key can be present without a payload (`None`). That is distinct from an empty
//! string and is what an absent scalar field serializes to.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_tree::SectionTree;
//!
//! let mut tree = SectionTree::new();
//! tree.section_mut("Config").insert("Name", Some("prod".to_string()));
//! tree.section_mut("Config.Sub").insert("Enabled", Some("True".to_string()));
//!
//! assert_eq!(tree.value("Config", "Name"), Some("prod"));
//! assert_eq!(tree.children("Config").collect::<Vec<_>>(), vec!["Config.Sub"]);
//! ```

use indexmap::IndexMap;

/// Key/value pairs of one section, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section(IndexMap<String, Option<String>>);

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Section(IndexMap::new())
    }

    /// Inserts a key; `None` records the key with a null payload.
    ///
    /// If the section already contained this key, the old value is returned.
    pub fn insert<K: Into<String>>(
        &mut self,
        key: K,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.0.insert(key.into(), value)
    }

    /// Looks up a key: `None` if absent, `Some(None)` for a null payload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Section;
    ///
    /// let mut section = Section::new();
    /// section.insert("Note", None);
    /// section.insert("Name", Some("prod".to_string()));
    ///
    /// assert_eq!(section.get("Note"), Some(None));
    /// assert_eq!(section.get("Name"), Some(Some("prod")));
    /// assert_eq!(section.get("Missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.get(key).map(Option::as_deref)
    }

    /// Returns the text stored under `key`, treating a null payload like a missing key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over `(key, payload)` pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl FromIterator<(String, Option<String>)> for Section {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Section(IndexMap::from_iter(iter))
    }
}

impl IntoIterator for Section {
    type Item = (String, Option<String>);
    type IntoIter = indexmap::map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// All sections produced from, or consumed into, one object graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionTree(IndexMap<String, Section>);

impl SectionTree {
    /// Creates an empty `SectionTree`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::SectionTree;
    ///
    /// let tree = SectionTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        SectionTree(IndexMap::new())
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.0.get(name)
    }

    /// Returns the named section, creating it empty if needed.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        if !self.0.contains_key(name) {
            self.0.insert(name.to_string(), Section::new());
        }
        // Present: inserted just above when missing.
        &mut self.0[name]
    }

    /// Replaces a whole section, returning the previous one.
    pub fn insert_section<N: Into<String>>(&mut self, name: N, section: Section) -> Option<Section> {
        self.0.insert(name.into(), section)
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.0.shift_remove(name)
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Shorthand for the text under `section`/`key`; null payloads read as `None`.
    #[must_use]
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.value(key))
    }

    /// Names of the sections one level below `parent` (`parent.<name>` with no further dot).
    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.keys().filter_map(move |name| {
            let rest = name.strip_prefix(parent)?.strip_prefix('.')?;
            (!rest.is_empty() && !rest.contains('.')).then_some(name.as_str())
        })
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over section names, in insertion order.
    pub fn names(&self) -> indexmap::map::Keys<'_, String, Section> {
        self.0.keys()
    }

    /// Returns an iterator over `(name, section)` pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Section> {
        self.0.iter()
    }
}

impl FromIterator<(String, Section)> for SectionTree {
    fn from_iter<T: IntoIterator<Item = (String, Section)>>(iter: T) -> Self {
        SectionTree(IndexMap::from_iter(iter))
    }
}

impl IntoIterator for SectionTree {
    type Item = (String, Section);
    type IntoIter = indexmap::map::IntoIter<String, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections;

    #[test]
    fn test_section_mut_creates_once() {
        let mut tree = SectionTree::new();
        tree.section_mut("A").insert("x", Some("1".to_string()));
        tree.section_mut("A").insert("y", None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.section("A").map(Section::len), Some(2));
    }

    #[test]
    fn test_null_payload_is_not_empty_string() {
        let mut section = Section::new();
        section.insert("empty", Some(String::new()));
        section.insert("null", None);
        assert_eq!(section.value("empty"), Some(""));
        assert_eq!(section.value("null"), None);
        assert!(section.contains_key("null"));
    }

    #[test]
    fn test_children_only_direct_descendants() {
        let mut tree = SectionTree::new();
        for name in ["Root", "Root.A", "Root.A.Deep", "Root.B", "RootX", "Other.A"] {
            tree.section_mut(name);
        }
        let children: Vec<_> = tree.children("Root").collect();
        assert_eq!(children, vec!["Root.A", "Root.B"]);
    }

    #[test]
    fn test_editing_a_tree() {
        let mut tree = sections! {
            "App" => { "name" => "demo", "debug" => "True", "port" => 80 },
            "App.Cache" => { "size" => 10 },
        };

        let removed = tree.section_mut("App").remove("debug");
        assert_eq!(removed, Some(Some("True".to_string())));
        let keys: Vec<_> = tree.section("App").unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "port"]);

        let replacement: Section = [("size".to_string(), Some("20".to_string()))]
            .into_iter()
            .collect();
        let previous = tree.insert_section("App.Cache", replacement);
        assert_eq!(previous.unwrap().value("size"), Some("10"));
        assert_eq!(tree.value("App.Cache", "size"), Some("20"));

        assert!(tree.remove_section("App.Cache").is_some());
        assert!(tree.remove_section("App.Cache").is_none());
        assert_eq!(tree.children("App").count(), 0);
    }

    #[test]
    fn test_into_iter_yields_owned_pairs() {
        let tree = sections! { "A" => { "x" => 1, "y" => null }, "B" => {} };
        let owned: Vec<(String, Vec<(String, Option<String>)>)> = tree
            .into_iter()
            .map(|(name, section)| (name, section.into_iter().collect()))
            .collect();
        assert_eq!(
            owned,
            vec![
                (
                    "A".to_string(),
                    vec![
                        ("x".to_string(), Some("1".to_string())),
                        ("y".to_string(), None),
                    ]
                ),
                ("B".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let tree: SectionTree = ["Z", "A", "M"]
            .into_iter()
            .map(|n| (n.to_string(), Section::new()))
            .collect();
        let names: Vec<_> = tree.names().cloned().collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }
}
