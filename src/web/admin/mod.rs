mod contacts;
mod dashboard;
mod reviews;
mod types;

pub use contacts::{load_contacts, mark_read};
pub use dashboard::dashboard;
pub use reviews::{approve_review, load_pending, reject_review};
