pub mod activity;
pub mod broker;
pub mod connections;
pub mod document;
pub mod users;

pub use broker::SessionBroker;
