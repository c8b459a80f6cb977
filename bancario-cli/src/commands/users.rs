//! Users command - application operators and their passwords

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Password};

use bancario_core::domain::{PasswordChange, UserCreate, UserUpdate};
use bancario_core::{Page, User};

use super::{get_context, print_json, require_admin, require_login};
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one user
    Get {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a user (password is prompted)
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change user fields
    Update {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        admin: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a user
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Change a user's password (defaults to the logged-in user)
    ChangePassword {
        id: Option<String>,
    },
}

pub async fn run(command: UserCommands) -> Result<()> {
    let ctx = get_context()?;
    // changing your own password needs only a session
    if matches!(command, UserCommands::ChangePassword { id: None }) {
        require_login(&ctx)?;
    } else {
        require_admin(&ctx)?;
    }

    match command {
        UserCommands::List { skip, limit, json } => {
            let page = Page::new(skip, limit.unwrap_or(ctx.config.page_size));
            let users = ctx.users.list(page).await?;
            if json {
                return print_json(&users);
            }
            print_users(&users);
        }
        UserCommands::Get { id, json } => {
            let user = ctx.users.get(&id).await?;
            if json {
                return print_json(&user);
            }
            println!("{}", user.display_name().bold());
            println!("  ID: {}", user.user_id().unwrap_or("-"));
            println!("  Username: {}", user.username);
            println!("  Active: {}", if user.active { "yes" } else { "no" });
            println!("  Admin: {}", if user.is_admin { "yes" } else { "no" });
        }
        UserCommands::Create {
            first_name,
            last_name,
            username,
            admin,
            json,
        } => {
            let password = Password::new()
                .with_prompt("Password for the new user")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?;
            let input = UserCreate {
                first_name,
                last_name,
                username,
                password,
                is_admin: admin,
            };
            let user = ctx.users.create(&input).await?;
            if json {
                return print_json(&user);
            }
            output::success(&format!("User {} created", user.username));
        }
        UserCommands::Update {
            id,
            first_name,
            last_name,
            username,
            active,
            admin,
            json,
        } => {
            let changes = UserUpdate {
                first_name,
                last_name,
                username,
                password: None,
                active,
                is_admin: admin,
            };
            let user = ctx.users.update(&id, &changes).await?;
            if json {
                return print_json(&user);
            }
            output::success(&format!("User {} updated", user.username));
        }
        UserCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete user {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            ctx.users.delete(&id).await?;
            output::success(&format!("User {} deleted", id));
        }
        UserCommands::ChangePassword { id } => {
            let id = match id.or_else(|| ctx.auth.current_user_id()) {
                Some(id) => id,
                None => anyhow::bail!("No user id given and the session has none"),
            };
            let current = Password::new().with_prompt("Current password").interact()?;
            let new = Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm new password", "Passwords do not match")
                .interact()?;
            ctx.users
                .change_password(&id, &PasswordChange { current, new })
                .await?;
            output::success("Password changed");
        }
    }

    Ok(())
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Username", "Name", "Active", "Admin"]);
    for user in users {
        table.add_row(vec![
            user.user_id().unwrap_or("-").to_string(),
            user.username.clone(),
            user.display_name(),
            if user.active { "yes" } else { "no" }.to_string(),
            if user.is_admin { "yes".green().to_string() } else { "no".to_string() },
        ]);
    }
    println!("{}", table);
}
