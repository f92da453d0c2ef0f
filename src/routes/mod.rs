pub mod api;
pub mod site;
