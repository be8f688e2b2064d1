// src/affe/model.rs

/// Insertion-ordered trait name -> value map. Re-inserting a name replaces
/// its value in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traits<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Traits<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> Traits<V> {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One ape of the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affe {
    /// The number after `#` in the storefront name.
    pub id: u32,
    pub name_strict: String,
    pub name_friendly: String,
    pub story: String,
    pub attributes_common: Traits<String>,
    /// Scores 0..=5.
    pub emotions_common: Traits<u32>,
    pub attributes_rare_textual: Traits<String>,
    pub attributes_rare_numerical: Traits<i64>,
    pub image_url: String,
    pub website: String,
    pub animation_url: String,
    /// Token id on the storefront contract.
    pub legacy_id: String,
}

impl Affe {
    pub fn new(id: u32) -> Self {
        Self { id, ..Default::default() }
    }

    /// Reshape for the ERC-721 contract: the chimp's name becomes the name
    /// and the storefront number moves into a `Birth Order` attribute.
    pub fn perform_721_hygiene(&mut self) {
        self.name_strict = self.name_friendly.clone();
        self.attributes_common
            .insert("Birth Order", format!("Affe mit Waffe #{}", self.id));
    }
}
