pub mod by_type;
pub mod get;
pub mod region;
pub mod tree;

pub use by_type::{AllVocabulariesByTypeQuery, ListVocabulariesQuery, VocabulariesByTypeQuery, VocabularyMapQuery};
pub use get::{GetVocabularyQuery, ParentVocabularyQuery};
pub use region::CountriesByRegionQuery;
pub use tree::{VocabularyTree, VocabularyTreeQuery};
