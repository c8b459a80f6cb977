//! Branches command

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use bancario_core::domain::{BranchCreate, BranchUpdate};
use bancario_core::{Branch, Page};

use super::{get_context, print_json, require_admin};
use crate::output;

#[derive(Subcommand)]
pub enum BranchCommands {
    /// List branches
    List {
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one branch
    Get {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Branches in a city
    ByCity {
        city: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a branch
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change branch fields
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a branch
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: BranchCommands) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;

    match command {
        BranchCommands::List { skip, limit, json } => {
            let page = Page::new(skip, limit.unwrap_or(ctx.config.page_size));
            let branches = ctx.branches.list(page).await?;
            list(&branches, json)?;
        }
        BranchCommands::Get { id, json } => {
            let branch = ctx.branches.get(&id).await?;
            if json {
                return print_json(&branch);
            }
            println!("{}", branch.name.bold());
            println!("  ID: {}", branch.id);
            println!("  City: {}", branch.city);
            println!("  Address: {}", branch.address);
            println!("  Phone: {}", branch.phone);
        }
        BranchCommands::ByCity { city, json } => {
            let branches = ctx.branches.by_city(&city).await?;
            list(&branches, json)?;
        }
        BranchCommands::Create {
            name,
            city,
            address,
            phone,
            json,
        } => {
            let input = BranchCreate {
                name,
                city,
                address,
                phone,
            };
            let branch = ctx.branches.create(&input).await?;
            if json {
                return print_json(&branch);
            }
            output::success(&format!("Branch {} created (id {})", branch.name, branch.id));
        }
        BranchCommands::Update {
            id,
            name,
            city,
            address,
            phone,
            json,
        } => {
            let changes = BranchUpdate {
                name,
                city,
                address,
                phone,
            };
            let branch = ctx.branches.update(&id, &changes).await?;
            if json {
                return print_json(&branch);
            }
            output::success(&format!("Branch {} updated", branch.id));
        }
        BranchCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete branch {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            ctx.branches.delete(&id).await?;
            output::success(&format!("Branch {} deleted", id));
        }
    }

    Ok(())
}

fn list(branches: &[Branch], json: bool) -> Result<()> {
    if json {
        return print_json(branches);
    }
    if branches.is_empty() {
        println!("No branches found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "City", "Address", "Phone"]);
    for branch in branches {
        table.add_row(vec![
            branch.id.clone(),
            branch.name.clone(),
            branch.city.clone(),
            branch.address.clone(),
            branch.phone.clone(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
