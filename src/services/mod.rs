pub mod auth_services;
pub mod password;
pub mod post_services;
pub mod upload_services;
