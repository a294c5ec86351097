//! Login and logout against the local session store

use anyhow::Result;
use std::io::Write;

use crate::commands::render::{self, OutputFormat};
use crate::infrastructure::session_store::SessionStore;

pub async fn login<W: Write>(sessions: &SessionStore, out: &mut W, format: OutputFormat, token: &str) -> Result<()> {
    let session = sessions.save(token).await?;
    render::message(
        out,
        format,
        &format!("Logged in; token stored at {}", session.created_at.to_rfc3339()),
    )
}

pub async fn logout<W: Write>(sessions: &SessionStore, out: &mut W, format: OutputFormat) -> Result<()> {
    let text = if sessions.clear().await? {
        "Logged out"
    } else {
        "No stored session"
    };
    render::message(out, format, text)
}
