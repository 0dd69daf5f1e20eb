pub mod admin;

pub mod assignments;

pub mod auth;

pub mod classes;

pub mod submissions;

pub mod users;

pub use admin::configure_admin_routes;
pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;
