pub mod page;
pub mod session;
pub mod site;
pub mod user;
