//! Finding the generators bound to a symbol's annotations.

use std::fmt;

use log::trace;

use crate::analysis::{AnnotationData, Symbol};
use crate::error::TransformResult;
use crate::identity::GeneratorIdentity;
use crate::plugin::Generator;
use crate::resolver::TypeResolver;

/// A constructed generator together with the annotation that bound it.
pub struct DiscoveredGenerator {
    pub identity: GeneratorIdentity,
    pub annotation: AnnotationData,
    pub generator: Box<dyn Generator>,
}

impl fmt::Debug for DiscoveredGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredGenerator")
            .field("identity", &self.identity.to_string())
            .field("annotation", &self.annotation.name())
            .finish_non_exhaustive()
    }
}

pub struct GeneratorDiscovery<'a> {
    resolver: TypeResolver<'a>,
}

impl<'a> GeneratorDiscovery<'a> {
    pub fn new(resolver: TypeResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Generators for every generator-bound annotation on `symbol`, in
    /// annotation order.
    ///
    /// Each one is constructed from the data of the annotation found on the
    /// symbol, not from the binding attribute. Unbound annotations are
    /// skipped, so a symbol without any yields an empty list.
    pub fn find_generators(&self, symbol: &Symbol) -> TransformResult<Vec<DiscoveredGenerator>> {
        symbol
            .annotations()
            .iter()
            .filter_map(|annotation| Some((annotation.binding()?, annotation.data())))
            .map(|(identity, data)| {
                trace!("GeneratorDiscovery: {symbol} is bound to {identity}");
                let generator = self.resolver.resolve(identity, data)?;
                Ok(DiscoveredGenerator {
                    identity: identity.clone(),
                    annotation: data.clone(),
                    generator,
                })
            })
            .collect()
    }
}
