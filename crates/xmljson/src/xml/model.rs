//! XML data model

use indexmap::IndexMap;

/// XML document
///
/// A well-formed document holds exactly one [`Content::Element`] among its
/// children, next to any comments and processing instructions found in the
/// prolog or after the root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Content>,
}

impl Document {
    /// The root element, if any
    pub fn root(&self) -> Option<&Element> {
        self.children.iter().find_map(|child| match child {
            Content::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

impl Element {
    /// Element with no attributes and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Append a child, builder style
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Content>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    /// Character data with entities decoded; whitespace-only runs are kept
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl Content {
    /// Name the node is keyed under when it contributes to a parent object
    pub fn node_name(&self) -> &str {
        match self {
            Self::Element(element) => &element.name,
            Self::Text(_) => "#text",
            Self::CData(_) => "#cdata-section",
            Self::Comment(_) => "#comment",
            Self::ProcessingInstruction { target, .. } => target,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

impl From<Element> for Content {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
