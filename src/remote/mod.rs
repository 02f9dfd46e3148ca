mod client;
mod source;

pub use client::SpaceflightNewsClient;
pub use source::PageSource;
