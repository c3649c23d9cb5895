pub mod admin;
pub mod auth;
pub mod contact;
pub mod flash;
pub mod landing;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;

pub use flash::{Flash, flash_from_codes, render_flash};
pub use responses::{ApiMessage, json_message};
pub use state::AppState;
pub use templates::{PageLayout, escape_html, render_footer, render_login_page, render_page};
