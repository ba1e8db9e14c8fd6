mod credential;
mod entity;
mod record;
mod remote_id;
mod tenant;
mod webhook;

pub use credential::*;
pub use entity::*;
pub use record::*;
pub use tenant::*;
pub use webhook::*;

pub(crate) use remote_id::{deserialize_id, deserialize_optional_id};
