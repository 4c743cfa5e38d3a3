/// How an attribute value was delimited in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Unquoted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for a bare attribute such as `disabled`.
    pub value: Option<String>,
    pub quote: Quote,
}

impl Attribute {
    /// A quoted attribute, picking single quotes when the value holds a `"`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let quote = if value.contains('"') { Quote::Single } else { Quote::Double };
        Attribute {
            name: name.into(),
            value: Some(value),
            quote,
        }
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Written as `<tag ... />`.
    pub self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Position of the first attribute called `name`, ignoring case.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attribute_index(name).map(|i| self.attributes[i].value())
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attribute_index(name).map(|i| self.attributes.remove(i))
    }

    /// Removes every attribute called `name`, returning how many were dropped.
    pub fn remove_all_attributes(&mut self, name: &str) -> usize {
        let before = self.attributes.len();
        self.attributes.retain(|attr| !attr.name.eq_ignore_ascii_case(name));
        before - self.attributes.len()
    }

    /// Sets `name` to `value`, overwriting an existing attribute in place.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attribute_index(name) {
            Some(i) => self.attributes[i] = Attribute::new(name, value),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Renames the attribute `from` to `to`, keeping its position and value.
    /// An existing `to` attribute is replaced. Returns the moved value.
    pub fn rename_attribute(&mut self, from: &str, to: &str) -> Option<String> {
        let index = self.attribute_index(from)?;
        let mut attr = self.attributes.remove(index);
        let mut index = index;
        if let Some(existing) = self.attribute_index(to) {
            self.attributes.remove(existing);
            if existing < index {
                index -= 1;
            }
        }
        attr.name = to.to_string();
        let value = attr.value().to_string();
        self.attributes.insert(index, attr);
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Printed back verbatim: `<% %>` blocks, `<!DOCTYPE>`, stray close tags.
    Raw(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Visits every element depth-first in document order. A parent is
    /// visited before its children, and sees them after its own visit.
    pub fn visit_elements_mut<F: FnMut(&mut Element)>(&mut self, mut f: F) {
        visit_nodes_mut(&mut self.children, &mut f);
    }
}

fn visit_nodes_mut<F: FnMut(&mut Element)>(nodes: &mut [Node], f: &mut F) {
    for node in nodes {
        if let Node::Element(element) = node {
            f(element);
            visit_nodes_mut(&mut element.children, f);
        }
    }
}
