//! Set of components active on the running platform

use indexmap::IndexSet;

/// Ordered, de-duplicated set of base component names
///
/// Platform entries such as `hue.light` contribute their base component `hue`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveComponents(IndexSet<String>);

impl ActiveComponents {
    pub fn from_loaded<I, S>(loaded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = loaded
            .into_iter()
            .filter_map(|name| {
                let base = name.as_ref().split('.').next()?.trim();
                (!base.is_empty()).then(|| base.to_string())
            })
            .collect();
        Self(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
