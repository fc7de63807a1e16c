pub mod add;
pub mod add_all;
pub mod delete;
pub mod hosting_legal_entities;
pub mod seed;
pub mod update;

pub use add::AddVocabularyCommand;
pub use add_all::AddVocabulariesCommand;
pub use delete::{DeleteAllVocabulariesCommand, DeleteVocabulariesByTypeCommand, DeleteVocabularyCommand};
pub use hosting_legal_entities::UpdateHostingLegalEntitiesCommand;
pub use update::UpdateVocabularyCommand;
