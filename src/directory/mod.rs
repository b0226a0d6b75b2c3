mod rest;
mod service;
mod types;

pub use rest::RestDirectoryClient;
pub use service::DirectoryService;
pub use types::{GroupId, GroupInfo, PhotoSize, Principal, PrincipalId, PrincipalKind, UserPhoto};
