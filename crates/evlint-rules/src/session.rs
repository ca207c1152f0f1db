//! Per-compilation analysis session: well-known type resolution and
//! cancellation.
//!
//! The session replaces any global type cache: it is constructed once per
//! compilation and passed by reference, so concurrent passes over distinct
//! compilations never share mutable state.

use dashmap::DashMap;
use evlint_common::CancellationToken;
use evlint_tree::{SymbolBank, TypeId, WellKnownNames};
use tracing::trace;

/// The three resolved types every rule needs before it can activate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub event_source: TypeId,
    pub event_attribute: TypeId,
    pub non_event_attribute: TypeId,
}

pub struct AnalysisSession<'a> {
    bank: &'a SymbolBank,
    names: WellKnownNames,
    /// Name -> resolution result. Written at most once per name; a raced
    /// recomputation resolves to the same value, so only work is redundant.
    cache: DashMap<String, Option<TypeId>>,
    token: CancellationToken,
}

impl<'a> AnalysisSession<'a> {
    pub fn new(bank: &'a SymbolBank, names: WellKnownNames, token: CancellationToken) -> Self {
        Self { bank, names, cache: DashMap::new(), token }
    }

    /// Session with the default convention names and no cancellation source.
    pub fn with_defaults(bank: &'a SymbolBank) -> Self {
        Self::new(bank, WellKnownNames::default(), CancellationToken::new())
    }

    pub fn bank(&self) -> &'a SymbolBank {
        self.bank
    }

    pub fn names(&self) -> &WellKnownNames {
        &self.names
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Lazily resolve a type name, caching the result (absence included).
    pub fn resolve(&self, name: &str) -> Option<TypeId> {
        if let Some(cached) = self.cache.get(name) {
            return *cached;
        }
        let resolved = self.bank.resolve_type(name);
        trace!(name, found = resolved.is_some(), "resolved well-known type");
        *self.cache.entry(name.to_string()).or_insert(resolved)
    }

    /// The capability gate: `None` unless all three well-known types resolve,
    /// in which case every rule stays silent for this compilation.
    pub fn well_known(&self) -> Option<WellKnownTypes> {
        Some(WellKnownTypes {
            event_source: self.resolve(&self.names.event_source)?,
            event_attribute: self.resolve(&self.names.event_attribute)?,
            non_event_attribute: self.resolve(&self.names.non_event_attribute)?,
        })
    }
}
