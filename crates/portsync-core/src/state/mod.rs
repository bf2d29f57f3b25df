pub mod document;
mod layout;
pub mod resource;

pub use document::StateDocument;
pub use resource::{Attachment, Instance, Resource, ResourceKind, PortInstance};
