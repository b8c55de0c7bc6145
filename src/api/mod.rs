//! Transport layer: the HTTP client wrapper, the wire types and the REST
//! implementation of the controllers' remote boundary.

pub mod client;
pub mod filebrowser;
pub mod types;
