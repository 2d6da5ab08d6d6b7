pub mod admin;
pub mod redirect;

pub use admin::management_routes;
pub use redirect::{RedirectService, redirect_routes};
