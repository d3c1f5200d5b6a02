pub mod layout;
pub mod mapper;
