pub mod client;
pub mod object;
pub mod photo;
pub mod response;

pub use client::Graph;
pub use object::GraphObject;
pub use photo::Photo;
