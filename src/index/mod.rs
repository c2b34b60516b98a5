pub mod lexical;
pub mod semantic;

pub use lexical::{EmptyVocabularyError, LexicalIndex};
pub use semantic::SemanticIndex;
