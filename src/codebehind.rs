//! Best-effort scan of a code-behind file.
//!
//! This is not a C# parser. Two line shapes are recognised: plain public
//! field declarations (`public string Name;`) and Web Forms event handler
//! signatures (`protected void Save_Click(object sender, EventArgs e)`).
//! Multi-line declarations, generics, initializers and attributes on fields
//! are not understood and are skipped silently.

use ahash::{AHashMap, AHashSet};
use regex::Regex;
use std::sync::LazyLock;

static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*public\s+(\w+)\s+(\w+)\s*;").expect("field pattern is a valid regex")
});

static EVENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"protected\s+void\s+(\w+)\s*\(\s*object\s+sender\s*,\s*EventArgs\s+e\s*\)")
        .expect("event pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub type_name: String,
    pub name: String,
}

impl FieldDeclaration {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        FieldDeclaration {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// The auto-property emitted into the `@code` block.
    pub fn body(&self) -> String {
        format!("public {} {} {{ get; set; }}", self.type_name, self.name)
    }
}

/// Field declarations in discovery order, unique by name.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<FieldDeclaration>,
    names: AHashSet<String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the field unless one with the same name is already present.
    /// Returns whether it was added.
    pub fn push(&mut self, field: FieldDeclaration) -> bool {
        if self.names.contains(&field.name) {
            return false;
        }
        self.names.insert(field.name.clone());
        self.fields.push(field);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDeclaration> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldDeclaration>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            let name = field.name.clone();
            if !set.push(field) {
                log::debug!("Dropping duplicate field declaration `{name}`");
            }
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStub {
    pub name: String,
    pub body: String,
}

impl EventStub {
    pub fn new(name: &str) -> Self {
        EventStub {
            name: name.to_string(),
            body: format!("private void {name}() {{ /* Converted event logic */ }}"),
        }
    }
}

/// Event handler stubs keyed by name, iterated in first-discovery order.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    stubs: Vec<EventStub>,
    index: AHashMap<String, usize>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stub. A stub with the same name is replaced in place.
    pub fn insert(&mut self, stub: EventStub) {
        match self.index.get(&stub.name) {
            Some(&i) => self.stubs[i] = stub,
            None => {
                self.index.insert(stub.name.clone(), self.stubs.len());
                self.stubs.push(stub);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventStub> {
        self.stubs.iter()
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

/// What was found in one code-behind file. Field declarations are not
/// deduplicated here.
#[derive(Debug, Clone, Default)]
pub struct CodeBehind {
    pub events: EventTable,
    pub fields: Vec<FieldDeclaration>,
}

pub fn extract(source: &str) -> CodeBehind {
    let fields = FIELD_PATTERN
        .captures_iter(source)
        .map(|caps| FieldDeclaration::new(&caps[1], &caps[2]))
        .collect::<Vec<_>>();

    let mut events = EventTable::new();
    for caps in EVENT_PATTERN.captures_iter(source) {
        events.insert(EventStub::new(&caps[1]));
    }

    log::debug!(
        "Extracted {} fields and {} event handlers from code-behind",
        fields.len(),
        events.len()
    );

    CodeBehind { events, fields }
}
