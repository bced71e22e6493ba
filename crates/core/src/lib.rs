pub mod error;
pub mod policy;
pub mod record;
pub mod subject;
pub mod testing;
pub mod value;

pub use error::SubjectError;
pub use policy::RetentionPolicy;
pub use record::{CastHint, RevisionRecord};
pub use subject::{ActorRef, REVISION_HISTORY, Revisionable};
pub use value::Value;
