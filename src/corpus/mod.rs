//! @ai:module:intent PDDL corpus discovery: classification, domain resolution, traversal
//! @ai:module:public_api FileClassifier, DomainResolver, CorpusWalker

pub mod classifier;
pub mod resolver;
pub mod walker;

pub use classifier::{FileClassifier, FileClassifierTrait};
pub use resolver::{DomainResolver, DomainResolverTrait};
pub use walker::{CorpusWalker, DomainDirectory, ResolvedPair};
