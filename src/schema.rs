//! The tag schema: which tags and attributes are legal where.
//!
//! A schema is a tree of tag declarations built once up front (via
//! [`Schema::builder`]) and then only ever read from while parsing. Tag
//! lookup by name is depth-1 only: a tag's declared children are searched
//! directly, never the whole schema tree, since a schema may legally reuse a
//! tag name at unrelated positions.

use std::fmt;
use std::io;

/// A handle into a [`Schema`]'s tag arena. Cheap to copy, meaningless across
/// different `Schema` instances.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct TagId(usize);

/// One attribute a tag may (or must) carry.
#[derive(Clone, Debug)]
pub struct AttrSpec {
    pub name: String,
    pub required: bool,
}

impl AttrSpec {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        AttrSpec {
            name: name.into(),
            required,
        }
    }
}

/// A tag declaration: its name, whether it must be self-closing, and its
/// attributes and legal children.
pub(crate) struct TagSpec {
    pub(crate) name: String,
    pub(crate) is_empty: bool,
    pub(crate) attrs: Vec<AttrSpec>,
    pub(crate) parent: Option<TagId>,
    pub(crate) children: Vec<TagId>,
}

/// A schema tree: the set of tags a [`crate::document::Document`] may use,
/// and where each is legal.
///
/// Built once (via [`Schema::builder`]) and then treated as read-only by the
/// parser.
#[derive(Default)]
pub struct Schema {
    tags: Vec<TagSpec>,
    root: Option<TagId>,
}

/// Reasons a schema cannot be extended further.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SchemaError {
    /// A root tag was already registered; a schema has exactly one.
    RootAlreadySet,
    /// Attempted to add a child tag under a tag declared `is_empty`.
    CannotExtendEmptyTag,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::RootAlreadySet => write!(f, "schema already has a root tag"),
            SchemaError::CannotExtendEmptyTag => {
                write!(f, "cannot add a child tag under a tag declared empty")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl Schema {
    /// Starts building a schema whose root tag is named `root_name`.
    pub fn builder(root_name: impl Into<String>) -> SchemaBuilder {
        let mut schema = Schema::default();
        let root = schema.push_tag(TagSpec {
            name: root_name.into(),
            is_empty: false,
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        schema.root = Some(root);
        SchemaBuilder { schema }
    }

    fn push_tag(&mut self, spec: TagSpec) -> TagId {
        let id = TagId(self.tags.len());
        self.tags.push(spec);
        id
    }

    pub(crate) fn tag(&self, id: TagId) -> &TagSpec {
        &self.tags[id.0]
    }

    /// The schema's single root tag.
    pub fn root(&self) -> TagId {
        self.root.expect("Schema::builder always sets a root")
    }

    pub fn tag_name(&self, id: TagId) -> &str {
        &self.tag(id).name
    }

    pub fn is_empty_tag(&self, id: TagId) -> bool {
        self.tag(id).is_empty
    }

    pub fn attrs(&self, id: TagId) -> &[AttrSpec] {
        &self.tag(id).attrs
    }

    /// Looks up `name` among `parent`'s *direct* declared children only.
    ///
    /// Deliberately not recursive: a tag name may legally be reused at
    /// unrelated positions in the tree, so a full-tree search could match
    /// the wrong declaration.
    pub(crate) fn find_child_by_name(&self, parent: TagId, name: &str) -> Option<TagId> {
        self.tag(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.tag(child).name == name)
    }

    /// Writes a preorder dump of the schema tree: each tag's name,
    /// emptiness, and attributes (name + required flag), indented by depth.
    ///
    /// Handy for a caller to sanity-check a schema it just built.
    pub fn display(&self, w: &mut impl io::Write) -> io::Result<()> {
        self.display_subtree(w, self.root(), 0)
    }

    fn display_subtree(&self, w: &mut impl io::Write, id: TagId, depth: usize) -> io::Result<()> {
        let tag = self.tag(id);
        let indent = "  ".repeat(depth);
        writeln!(
            w,
            "{indent}{}{}",
            tag.name,
            if tag.is_empty { " (empty)" } else { "" }
        )?;
        for attr in &tag.attrs {
            writeln!(
                w,
                "{indent}  @{} {}",
                attr.name,
                if attr.required { "(required)" } else { "(optional)" }
            )?;
        }
        for &child in &tag.children {
            self.display_subtree(w, child, depth + 1)?;
        }
        Ok(())
    }
}

/// Incrementally builds a [`Schema`], one tag at a time.
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// The tag id of the root tag this builder started from.
    pub fn root(&self) -> TagId {
        self.schema.root()
    }

    /// Declares a new tag named `name` as a child of `parent`, with the
    /// given attribute specs. Fails if `parent` is declared empty.
    pub fn add_tag(
        &mut self,
        parent: TagId,
        name: impl Into<String>,
        is_empty: bool,
        attrs: Vec<AttrSpec>,
    ) -> Result<TagId, SchemaError> {
        if self.schema.tag(parent).is_empty {
            return Err(SchemaError::CannotExtendEmptyTag);
        }
        let id = self.schema.push_tag(TagSpec {
            name: name.into(),
            is_empty,
            attrs,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.schema.tags[parent.0].children.push(id);
        Ok(id)
    }

    /// Declares attributes directly on the schema's root tag.
    pub fn set_root_attrs(&mut self, attrs: Vec<AttrSpec>) {
        let root = self.schema.root();
        self.schema.tags[root.0].attrs = attrs;
    }

    /// Declares the root tag itself as empty (self-closing, no children).
    pub fn set_root_empty(&mut self, is_empty: bool) {
        let root = self.schema.root();
        self.schema.tags[root.0].is_empty = is_empty;
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabinet_schema() -> Schema {
        let mut b = Schema::builder("cabinet");
        let root = b.schema.root();
        let shelf = b
            .add_tag(root, "shelf", false, vec![AttrSpec::new("position", true)])
            .unwrap();
        b.add_tag(
            shelf,
            "bottle",
            false,
            vec![AttrSpec::new("vintage", false)],
        )
        .unwrap();
        b.add_tag(shelf, "glass", true, vec![]).unwrap();
        b.build()
    }

    #[test]
    fn root_has_no_parent_and_is_findable_by_name() {
        let schema = cabinet_schema();
        let root = schema.root();
        assert_eq!(schema.tag_name(root), "cabinet");
        assert!(schema.tag(root).parent.is_none());
    }

    #[test]
    fn depth_one_lookup_finds_direct_children_only() {
        let schema = cabinet_schema();
        let root = schema.root();
        let shelf = schema.find_child_by_name(root, "shelf").unwrap();
        assert!(schema.find_child_by_name(root, "bottle").is_none());
        assert!(schema.find_child_by_name(shelf, "bottle").is_some());
        assert!(schema.find_child_by_name(shelf, "glass").is_some());
    }

    #[test]
    fn cannot_extend_an_empty_tag() {
        let mut b = Schema::builder("cabinet");
        let root = b.schema.root();
        let glass = b.add_tag(root, "glass", true, vec![]).unwrap();
        let err = b.add_tag(glass, "stem", false, vec![]).unwrap_err();
        assert_eq!(err, SchemaError::CannotExtendEmptyTag);
    }

    #[test]
    fn display_dumps_preorder_with_attrs() {
        let schema = cabinet_schema();
        let mut out = Vec::new();
        schema.display(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("cabinet"));
        assert!(text.contains("shelf"));
        assert!(text.contains("@position (required)"));
        assert!(text.contains("glass (empty)"));
    }
}
