//! Type name resolution
//!
//! Maps a type reference written in source (`Order`, `List<Order>`,
//! `shop.model.Order`) to a best-effort qualified name, trying a fixed chain of
//! strategies and stopping at the first hit.

use tracing::{debug, span, trace, Level};

use crate::core::{erase_generics, ResolverConfig, TypeHandle, TypeIndex};

/// Resolves type references against one project's type index
pub struct TypeNameResolver<'a> {
    index: &'a dyn TypeIndex,
    config: &'a ResolverConfig,
}

impl<'a> TypeNameResolver<'a> {
    pub fn new(index: &'a dyn TypeIndex, config: &'a ResolverConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    /// Resolve `raw` as seen from inside `context`
    ///
    /// Strategies, in order:
    /// 1. erase generic parameters
    /// 2. already qualified names are kept
    /// 3. primitive keywords are kept
    /// 4. implicitly imported packages
    /// 5. the context's own package
    /// 6. single-type imports whose last segment matches
    /// 7. wildcard imports, probing each candidate
    ///
    /// Exhausting every strategy yields the erased name unchanged.
    pub fn resolve(&self, context: &dyn TypeHandle, raw: &str) -> String {
        let resolve_span = span!(
            Level::TRACE,
            "resolve",
            context = context.qualified_name(),
            raw = raw
        );
        let _enter = resolve_span.enter();

        let name = erase_generics(raw);

        if self.config.is_qualified(&name) {
            trace!(resolved = %name, "Already qualified");
            return name;
        }
        if self.config.is_primitive(&name) {
            trace!(resolved = %name, "Primitive type");
            return name;
        }

        for package in &self.config.implicit_packages {
            if let Some(found) = self.probe(&self.config.qualify(package, &name)) {
                trace!(resolved = %found, "Found in implicit package");
                return found;
            }
        }

        if let Some(found) = self.probe(&self.config.qualify(context.package_name(), &name)) {
            trace!(resolved = %found, "Found in context package");
            return found;
        }

        let imports = match context.imports() {
            Ok(imports) => imports,
            Err(err) => {
                debug!(error = %err, "Imports unavailable, skipping import strategies");
                Vec::new()
            }
        };
        let wildcard = self.config.wildcard_suffix();

        if let Some(found) = imports
            .iter()
            .filter(|import| !import.ends_with(&wildcard))
            .find(|import| self.last_segment(import) == name)
        {
            trace!(resolved = %found, "Found in single-type import");
            return found.clone();
        }

        for import in imports.iter().filter(|import| import.ends_with(&wildcard)) {
            let package = &import[..import.len() - wildcard.len()];
            if let Some(found) = self.probe(&self.config.qualify(package, &name)) {
                trace!(resolved = %found, import = %import, "Found through wildcard import");
                return found;
            }
        }

        trace!(resolved = %name, "Unresolved, keeping name");
        name
    }

    /// Canonical name of `qualified` if the index knows it
    ///
    /// Provider failures count as "not found".
    fn probe(&self, qualified: &str) -> Option<String> {
        match self.index.find_type(qualified) {
            Ok(Some(handle)) => Some(handle.qualified_name().to_string()),
            Ok(None) => None,
            Err(err) => {
                debug!(candidate = qualified, error = %err, "Lookup failed, treating as not found");
                None
            }
        }
    }

    fn last_segment<'s>(&self, qualified: &'s str) -> &'s str {
        qualified
            .rsplit(self.config.qualifier_separator)
            .next()
            .unwrap_or(qualified)
    }
}
