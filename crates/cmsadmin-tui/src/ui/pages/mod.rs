//! One module per routed page. Each exposes `render(frame, app, area)`.

pub mod dashboard;
pub mod database;
pub mod domains;
pub mod landing;
pub mod users;
pub mod websites;
