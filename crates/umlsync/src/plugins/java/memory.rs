//! In-memory type facts
//!
//! A plain-data implementation of the introspection interfaces. Type facts can
//! be built in code or read from a JSON workspace document:
//!
//! ```json
//! {
//!   "active_project": "shop",
//!   "projects": {
//!     "shop": {
//!       "types": [
//!         { "kind": "interface", "name": "shop.Priced" },
//!         { "kind": "class", "name": "shop.Order", "interfaces": ["Priced"],
//!           "fields": [{ "name": "items", "type": "List<Product>" }] }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{
    erase_generics, EntityKind, Introspected, RawField, RawMethod, TypeHandle, TypeIndex,
    Workspace,
};

/// Structural facts of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFacts {
    pub kind: EntityKind,
    /// Qualified name, possibly with type parameters
    pub name: String,
    /// Package; derived from `name` when absent
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub fields: Vec<RawField>,
    #[serde(default)]
    pub methods: Vec<RawMethod>,
    #[serde(default)]
    pub nested: Vec<TypeFacts>,
    #[serde(default)]
    pub origin_path: Option<String>,
}

impl TypeFacts {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            package: Some(package_of(&name)),
            name,
            superclass: None,
            interfaces: Vec::new(),
            imports: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            origin_path: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Interface, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Enum, name)
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    pub fn field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: RawMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn nest(mut self, nested: TypeFacts) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn from_path(mut self, path: impl Into<String>) -> Self {
        self.origin_path = Some(path.into());
        self
    }

    fn normalized(mut self) -> Self {
        if self.package.is_none() {
            self.package = Some(package_of(&self.name));
        }
        self.nested = self.nested.into_iter().map(TypeFacts::normalized).collect();
        self
    }
}

/// Everything before the last separator of the erased name
fn package_of(name: &str) -> String {
    let erased = erase_generics(name);
    match erased.rsplit_once('.') {
        Some((package, _)) => package.to_string(),
        None => String::new(),
    }
}

impl TypeHandle for TypeFacts {
    fn qualified_name(&self) -> &str {
        &self.name
    }

    fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn origin_path(&self) -> Option<&str> {
        self.origin_path.as_deref()
    }

    fn superclass_name(&self) -> Introspected<Option<String>> {
        Ok(self.superclass.clone())
    }

    fn super_interface_names(&self) -> Introspected<Vec<String>> {
        Ok(self.interfaces.clone())
    }

    fn imports(&self) -> Introspected<Vec<String>> {
        Ok(self.imports.clone())
    }

    fn fields(&self) -> Introspected<Vec<RawField>> {
        Ok(self.fields.clone())
    }

    fn methods(&self) -> Introspected<Vec<RawMethod>> {
        Ok(self.methods.clone())
    }

    fn nested_types(&self) -> Introspected<Vec<Rc<dyn TypeHandle>>> {
        Ok(self
            .nested
            .iter()
            .map(|n| Rc::new(n.clone()) as Rc<dyn TypeHandle>)
            .collect())
    }
}

/// A type index over facts held in memory
///
/// Nested types are registered under their own names as well.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    types: HashMap<String, TypeFacts>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_types(types: impl IntoIterator<Item = TypeFacts>) -> Self {
        let mut index = Self::new();
        for facts in types {
            index.insert(facts);
        }
        index
    }

    /// Add or replace a type
    pub fn insert(&mut self, facts: TypeFacts) {
        let facts = facts.normalized();
        for nested in &facts.nested {
            self.insert(nested.clone());
        }
        self.types.insert(erase_generics(&facts.name), facts);
    }

    pub fn remove(&mut self, name: &str) -> Option<TypeFacts> {
        self.types.remove(&erase_generics(name))
    }

    pub fn get(&self, name: &str) -> Option<&TypeFacts> {
        self.types.get(&erase_generics(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type names in sorted order
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }
}

impl TypeIndex for MemoryIndex {
    fn find_type(&self, qualified_name: &str) -> Introspected<Option<Rc<dyn TypeHandle>>> {
        Ok(self
            .get(qualified_name)
            .map(|facts| Rc::new(facts.clone()) as Rc<dyn TypeHandle>))
    }
}

/// One project of a workspace document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFacts {
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(default)]
    pub types: Vec<TypeFacts>,
}

fn default_open() -> bool {
    true
}

/// A workspace document: projects and the active one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceFacts {
    #[serde(default)]
    pub active_project: Option<String>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectFacts>,
}

/// Projects held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkspace {
    projects: HashMap<String, Rc<MemoryIndex>>,
    closed: HashSet<String>,
    active: Option<String>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_facts(facts: WorkspaceFacts) -> Self {
        let mut workspace = Self::new();
        for (name, project) in facts.projects {
            if !project.open {
                workspace.closed.insert(name.clone());
            }
            workspace.add_project(name, MemoryIndex::from_types(project.types));
        }
        workspace.active = facts.active_project;
        workspace
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let facts: WorkspaceFacts = serde_json::from_str(text)?;
        Ok(Self::from_facts(facts))
    }

    pub fn add_project(&mut self, name: impl Into<String>, index: MemoryIndex) {
        self.projects.insert(name.into(), Rc::new(index));
    }

    pub fn with_project(mut self, name: impl Into<String>, index: MemoryIndex) -> Self {
        self.add_project(name, index);
        self
    }

    pub fn set_active(&mut self, name: impl Into<String>) {
        self.active = Some(name.into());
    }

    pub fn active_project_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn close(&mut self, name: &str) {
        self.closed.insert(name.to_string());
    }

    pub fn open(&mut self, name: &str) {
        self.closed.remove(name);
    }

    /// The index of a project whether open or not
    pub fn index(&self, name: &str) -> Option<Rc<MemoryIndex>> {
        self.projects.get(name).cloned()
    }

    pub fn project_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.projects.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Workspace for MemoryWorkspace {
    fn project(&self, name: &str) -> Option<Rc<dyn TypeIndex>> {
        if self.closed.contains(name) {
            return None;
        }
        self.projects
            .get(name)
            .map(|index| Rc::clone(index) as Rc<dyn TypeIndex>)
    }

    fn active_project(&self) -> Option<Rc<dyn TypeIndex>> {
        self.active.as_deref().and_then(|name| self.project(name))
    }
}
