use crate::web::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashTone {
    Success,
    Error,
}

/// One-shot notice rendered at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub tone: FlashTone,
    pub title: String,
    pub description: String,
}

impl Flash {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone: FlashTone::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone: FlashTone::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn render(&self) -> String {
        let class = match self.tone {
            FlashTone::Success => "success",
            FlashTone::Error => "error",
        };
        format!(
            r#"<div class="flash {class}" role="status"><strong>{title}</strong><span>{description}</span></div>"#,
            title = escape_html(&self.title),
            description = escape_html(&self.description),
        )
    }
}

pub fn render_flash(flash: Option<&Flash>) -> String {
    flash.map(Flash::render).unwrap_or_default()
}

/// Maps the `status` / `error` query codes used by redirects to a notice.
pub fn flash_from_codes(status: Option<&str>, error: Option<&str>) -> Option<Flash> {
    if let Some(status) = status {
        let flash = match status {
            "sent" => Some(Flash::success(
                "Message sent!",
                "Thanks for reaching out. I'll get back to you soon.",
            )),
            "welcome" => Some(Flash::success("Welcome!", "Access granted.")),
            "logged_out" => Some(Flash::success("Signed out", "The admin session has ended.")),
            _ => None,
        };

        if flash.is_some() {
            return flash;
        }
    }

    error.map(|error| match error {
        "session_expired" => Flash::error(
            "Session expired",
            "Enter the password again to continue.",
        ),
        _ => Flash::error("Error", "Something went wrong. Please try again."),
    })
}
