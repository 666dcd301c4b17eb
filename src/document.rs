//! The parsed element tree.
//!
//! Elements own their strings outright rather than borrowing from the input,
//! since the source here is an arbitrary `Read` stream decoded one byte at a
//! time, not an already-materialized `&str` to borrow from. Each element's
//! attribute values are stored in a slot `Vec` aligned with its tag's
//! declared attribute order, so a not-yet-set attribute is just `None`
//! rather than an absent map entry.

use crate::entity;
use crate::error::{Error, Position};
use crate::schema::{Schema, TagId};

/// A handle into a [`Document`]'s element arena.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ElementId(usize);

struct ElementData {
    tag: TagId,
    parent: Option<ElementId>,
    first_child: Option<ElementId>,
    next_sibling: Option<ElementId>,
    attrs: Vec<Option<String>>,
    content: Option<String>,
}

/// A parsed document: the tree of elements built while parsing, plus the
/// [`Schema`] it was validated against.
///
/// Mutable during construction: the parser appends elements to it as it
/// goes, rather than building the whole tree in one shot from an
/// already-materialized string.
pub struct Document<'s> {
    schema: &'s Schema,
    elements: Vec<ElementData>,
    root: Option<ElementId>,
}

impl<'s> Document<'s> {
    pub(crate) fn new(schema: &'s Schema) -> Self {
        Document {
            schema,
            elements: Vec::new(),
            root: None,
        }
    }

    /// The schema this document was parsed against.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// The document's root element, if parsing completed far enough to
    /// create one.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    fn data(&self, id: ElementId) -> &ElementData {
        &self.elements[id.0]
    }

    /// Creates a new element named `name` as a child of `parent` (or as the
    /// document root, if `parent` is `None`), validating it against the
    /// schema.
    ///
    /// The root element's name must match the schema's root tag
    /// ([`Error::RootMismatch`]); any other element's name must be a
    /// declared child of its parent's tag at depth 1
    /// ([`Error::UnknownTagHere`]).
    ///
    /// `consumed` is the raw bytes consumed so far, passed through rather
    /// than a pre-computed [`Position`] so the line/column conversion only
    /// runs on the (rare) error path.
    pub(crate) fn create_element(
        &mut self,
        parent: Option<ElementId>,
        name: &str,
        consumed: &[u8],
    ) -> Result<ElementId, Error> {
        let tag = match parent {
            None => {
                let root_tag = self.schema.root();
                if self.schema.tag_name(root_tag) != name {
                    return Err(Error::RootMismatch(Position::from_consumed(consumed)));
                }
                root_tag
            }
            Some(parent_id) => {
                let parent_tag = self.data(parent_id).tag;
                self.schema
                    .find_child_by_name(parent_tag, name)
                    .ok_or_else(|| Error::UnknownTagHere(Position::from_consumed(consumed)))?
            }
        };

        let id = ElementId(self.elements.len());
        self.elements.push(ElementData {
            tag,
            parent,
            first_child: None,
            next_sibling: None,
            attrs: vec![None; self.schema.attrs(tag).len()],
            content: None,
        });

        match parent {
            None => self.root = Some(id),
            Some(parent_id) => {
                match self.data(parent_id).first_child {
                    None => self.elements[parent_id.0].first_child = Some(id),
                    Some(first) => {
                        let mut last = first;
                        while let Some(next) = self.data(last).next_sibling {
                            last = next;
                        }
                        self.elements[last.0].next_sibling = Some(id);
                    }
                }
            }
        }

        Ok(id)
    }

    /// Sets attribute `name` to `raw_value` on `element`, decoding entity
    /// references in the value.
    ///
    /// Fails if `name` isn't declared on the element's tag, or if it was
    /// already set. `consumed` is the raw bytes consumed so far, converted
    /// to a [`Position`] only on the error path.
    pub(crate) fn set_attribute_value(
        &mut self,
        element: ElementId,
        name: &str,
        raw_value: &str,
        consumed: &[u8],
    ) -> Result<(), Error> {
        let tag = self.data(element).tag;
        let index = self
            .schema
            .attrs(tag)
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| Error::UnknownAttribute(Position::from_consumed(consumed)))?;
        if self.data(element).attrs[index].is_some() {
            return Err(Error::DuplicateAttribute(Position::from_consumed(consumed)));
        }
        let decoded = entity::decode(raw_value)?;
        self.elements[element.0].attrs[index] = Some(decoded);
        Ok(())
    }

    /// Sets `element`'s text content, decoding entity references.
    ///
    /// A no-op if content was already set: the first contiguous text run is
    /// kept, later ones are silently dropped rather than concatenated.
    pub(crate) fn set_content(&mut self, element: ElementId, raw: &str) -> Result<(), Error> {
        if self.data(element).content.is_some() {
            return Ok(());
        }
        let decoded = entity::decode(raw)?;
        self.elements[element.0].content = Some(decoded);
        Ok(())
    }

    pub fn tag_name(&self, element: ElementId) -> &str {
        self.schema.tag_name(self.data(element).tag)
    }

    pub fn is_empty(&self, element: ElementId) -> bool {
        self.schema.is_empty_tag(self.data(element).tag)
    }

    pub fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        let tag = self.data(element).tag;
        let index = self.schema.attrs(tag).iter().position(|a| a.name == name)?;
        self.data(element).attrs[index].as_deref()
    }

    pub fn content(&self, element: ElementId) -> Option<&str> {
        self.data(element).content.as_deref()
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.data(element).parent
    }

    pub fn first_child(&self, element: ElementId) -> Option<ElementId> {
        self.data(element).first_child
    }

    pub fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        self.data(element).next_sibling
    }

    /// All required attributes on `element`'s tag that weren't set.
    pub fn missing_required_attrs(&self, element: ElementId) -> Vec<&str> {
        let tag = self.data(element).tag;
        self.schema
            .attrs(tag)
            .iter()
            .zip(self.data(element).attrs.iter())
            .filter(|(a, value)| a.required && value.is_none())
            .map(|(a, _)| a.name.as_str())
            .collect()
    }
}
