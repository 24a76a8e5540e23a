/// Ordered list of tags, unique ignoring case.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagEditor {
    tags: Vec<String>,
}

impl TagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an editor by adding each tag in order, so duplicates and blanks
    /// in `tags` are dropped the same way interactive input would be.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut editor = Self::new();
        for tag in tags {
            editor.add(tag.as_ref());
        }
        editor
    }

    /// Appends a trimmed tag. Blank input and case-insensitive duplicates are
    /// ignored; returns whether the list changed.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Removes the tag equal to `tag` exactly.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.tags.iter().any(|existing| existing.to_lowercase() == needle)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn into_tags(self) -> Vec<String> {
        self.tags
    }
}
