pub mod error;
pub mod host;
pub mod launcher;
pub mod model;
pub mod privilege;
