//! Login, register, logout and whoami

use std::io::BufRead;

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::json;

use bancario_core::domain::{LoginRequest, RegisterRequest};

use super::{get_context, print_json};
use crate::output;

/// Password from the first line of piped stdin, or an interactive prompt
fn read_password(prompt: &str, confirm: bool) -> Result<String> {
    if atty::isnt(atty::Stream::Stdin) {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']).to_string();
        if password.is_empty() {
            bail!("No password on stdin");
        }
        return Ok(password);
    }

    let mut prompt_builder = Password::new().with_prompt(prompt);
    if confirm {
        prompt_builder = prompt_builder.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt_builder.interact()?)
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

pub async fn login(username: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let username = prompt_if_missing(username, "Username")?;
    let password = read_password("Password", false)?;

    let session = ctx.auth.login(&LoginRequest { username, password }).await?;

    if json {
        return print_json(&json!({
            "authenticated": true,
            "user_id": session.user_id(),
            "is_admin": session.is_admin(),
        }));
    }

    let name = session
        .user
        .as_ref()
        .map(|u| u.display_name())
        .unwrap_or_default();
    if name.is_empty() {
        output::success("Logged in");
    } else {
        output::success(&format!("Logged in as {}", name));
    }
    Ok(())
}

pub async fn register(
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let profile = RegisterRequest {
        first_name: prompt_if_missing(first_name, "First name")?,
        last_name: prompt_if_missing(last_name, "Last name")?,
        username: prompt_if_missing(username, "Username")?,
        password: read_password("Password", true)?,
    };

    let session = ctx.auth.register(&profile).await?;

    if json {
        return print_json(&json!({
            "authenticated": true,
            "user_id": session.user_id(),
        }));
    }
    output::success(&format!("Registered and logged in as {}", profile.username));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    let was_logged_in = ctx.auth.is_authenticated();
    ctx.auth.logout();

    if was_logged_in {
        output::success("Logged out");
    } else {
        output::info("Not logged in");
    }
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;

    if json {
        return print_json(&json!({
            "authenticated": ctx.auth.is_authenticated(),
            "user": ctx.auth.current_user(),
            "is_admin": ctx.auth.is_admin(),
        }));
    }

    if !ctx.auth.is_authenticated() {
        println!("{}", "Not logged in".dimmed());
        return Ok(());
    }

    match ctx.auth.current_user() {
        Some(user) => {
            println!("{}", user.display_name().bold());
            println!("  Username: {}", user.username);
            println!("  User ID: {}", user.user_id().unwrap_or("-"));
            println!("  Admin: {}", if user.is_admin { "yes" } else { "no" });
        }
        None => println!("Logged in (no user profile returned by the server)"),
    }
    Ok(())
}
