pub mod builder;
pub mod differ;
pub mod enforcer;
pub mod error;
pub mod revisioner;

pub use builder::RecordBuilder;
pub use differ::FieldChange;
pub use error::RevisionError;
pub use revisioner::Revisioner;
