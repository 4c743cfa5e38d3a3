use super::tree::{Attribute, Document, Element, Node, Quote};
use std::fmt;

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.quote) {
            (None, _) => write!(f, "{}", self.name),
            (Some(value), Quote::Double) => write!(f, "{}=\"{}\"", self.name, value),
            (Some(value), Quote::Single) => write!(f, "{}='{}'", self.name, value),
            (Some(value), Quote::Unquoted) => write!(f, "{}={}", self.name, value),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attribute in &self.attributes {
            write!(f, " {attribute}")?;
        }
        if self.self_closing && self.children.is_empty() {
            return write!(f, " />");
        }
        write!(f, ">")?;
        if self.children.is_empty() && crate::mapping::is_void_element(&self.name) {
            return Ok(());
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => write!(f, "{element}"),
            Node::Text(text) | Node::Raw(text) => write!(f, "{text}"),
            Node::Comment(comment) => write!(f, "<!--{comment}-->"),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.children {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
