use std::collections::BTreeSet;
use std::sync::Arc;

use cairn_types::{TypeDescriptor, TypeOracle};

use crate::context::push_warning;
use crate::{ResolutionAborted, ResolutionWarning};

/// Hierarchy walk with a visited set shared by every root of one request.
///
/// Names are marked visited on first contact, so an unresolved name is reported
/// once and a cycle simply stops the walk.
pub(crate) struct Walk<'o, O: TypeOracle + ?Sized> {
    oracle: &'o O,
    visited: BTreeSet<String>,
    pub(crate) warnings: Vec<ResolutionWarning>,
}

impl<'o, O: TypeOracle + ?Sized> Walk<'o, O> {
    pub(crate) fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            visited: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Every name this walk touched, resolved or not.
    pub(crate) fn visited(&self) -> &BTreeSet<String> {
        &self.visited
    }

    fn enter(
        &mut self,
        name: &str,
        referenced_from: Option<&str>,
    ) -> Result<Option<Arc<TypeDescriptor>>, ResolutionAborted> {
        if !self.visited.insert(name.to_owned()) {
            tracing::trace!(target: "cairn.inherit", ty = name, "already visited");
            return Ok(None);
        }

        let resolved = self.oracle.resolve(name).map_err(|source| {
            tracing::warn!(
                target: "cairn.inherit",
                ty = name,
                error = %source,
                "type oracle failed; aborting resolution"
            );
            ResolutionAborted {
                name: name.to_owned(),
                source,
            }
        })?;

        if resolved.is_none() {
            tracing::debug!(
                target: "cairn.inherit",
                ty = name,
                from = referenced_from,
                "unresolved type; skipping branch"
            );
            push_warning(
                &mut self.warnings,
                ResolutionWarning::UnresolvedType {
                    name: name.to_owned(),
                    referenced_from: referenced_from.map(str::to_owned),
                },
            );
        }
        Ok(resolved)
    }

    /// Follow the supertype chain from `start` up to its root.
    ///
    /// Returns the chain members in visit order (most derived first).
    pub(crate) fn chain<F>(
        &mut self,
        start: &str,
        mut visit: F,
    ) -> Result<Vec<Arc<TypeDescriptor>>, ResolutionAborted>
    where
        F: FnMut(&TypeDescriptor),
    {
        let mut chain = Vec::new();
        let mut next: Option<(String, Option<String>)> = Some((start.to_owned(), None));
        while let Some((name, from)) = next.take() {
            let Some(ty) = self.enter(&name, from.as_deref())? else {
                break;
            };
            tracing::trace!(target: "cairn.inherit", ty = %ty.name, "visiting supertype");
            visit(&*ty);
            next = ty
                .supertype
                .clone()
                .map(|parent| (parent, Some(ty.name.clone())));
            chain.push(ty);
        }
        Ok(chain)
    }

    /// Pre-order depth-first walk of `root` and everything it extends.
    ///
    /// Children are visited supertype first, then capabilities in declaration order.
    pub(crate) fn depth_first<F>(
        &mut self,
        root: &str,
        referenced_from: Option<&str>,
        mut visit: F,
    ) -> Result<(), ResolutionAborted>
    where
        F: FnMut(&TypeDescriptor),
    {
        let mut stack: Vec<(String, Option<String>)> =
            vec![(root.to_owned(), referenced_from.map(str::to_owned))];
        while let Some((name, from)) = stack.pop() {
            let Some(ty) = self.enter(&name, from.as_deref())? else {
                continue;
            };
            tracing::trace!(target: "cairn.inherit", ty = %ty.name, "visiting capability");
            visit(&*ty);
            let children: Vec<&str> = ty.direct_supertypes().collect();
            for child in children.into_iter().rev() {
                stack.push((child.to_owned(), Some(ty.name.clone())));
            }
        }
        Ok(())
    }
}
