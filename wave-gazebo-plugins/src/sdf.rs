//! Scene-description (SDF) element tree.
//!
//! An [`Element`] is an owned snapshot of an XML element: its tag name, its
//! text value, its attributes and its child elements in document order.
//! Plugins receive the `<plugin>` element of the world file and read their
//! settings from the named children:
//!
//! ```xml
//! <plugin name="wavefield_plugin" filename="libWavefieldModelPlugin.so">
//!   <wave>
//!     <number>3</number>
//!     <direction>1.0 0.0</direction>
//!   </wave>
//! </plugin>
//! ```

use std::path::Path;

use crate::error::SdfError;

/// A node of the scene-description tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    value: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Parse an XML document. The document's root element is returned.
    pub fn parse(xml: &str) -> Result<Self, SdfError> {
        let doc = roxmltree::Document::parse(xml)?;
        Ok(Self::from_node(doc.root_element()))
    }

    /// Read and parse an SDF file.
    pub fn load(path: &Path) -> Result<Self, SdfError> {
        let content = std::fs::read_to_string(path).map_err(|source| SdfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = Self::parse(&content)?;
        tracing::info!("Loaded SDF <{}> from {:?}", root.name, path);
        Ok(root)
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Self::new(node.tag_name().name());
        element.attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        let mut text: Option<String> = None;
        for child in node.children() {
            if child.is_element() {
                element.children.push(Self::from_node(child));
            } else if child.is_text()
                && let Some(t) = child.text()
            {
                text.get_or_insert_with(String::new).push_str(t);
            }
        }

        // Indentation between child elements is not a value.
        element.value = match text {
            Some(t) if !element.children.is_empty() && t.trim().is_empty() => None,
            other => other,
        };
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw text content, if the element has any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.get_element(name).is_some()
    }

    /// First direct child with the given tag name.
    pub fn get_element(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Nested lookup along a `/`-separated path of child names,
    /// e.g. `"wave/direction"`.
    pub fn find_element(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |elem, segment| elem.get_element(segment))
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
