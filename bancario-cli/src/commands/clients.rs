//! Clients command - bank customers

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use bancario_core::domain::{ClientCreate, ClientFilter, ClientUpdate};
use bancario_core::{Client, Page};

use super::{get_context, print_json, require_login};
use crate::output;

#[derive(Subcommand)]
pub enum ClientCommands {
    /// List clients, optionally filtered by the server
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        document: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        branch_id: Option<String>,
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Free-text search
    Search {
        term: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one client
    Get {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clients registered at a branch
    ByBranch {
        branch_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a client
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        document: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        branch_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change client fields
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        document: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        branch_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a client
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: ClientCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        ClientCommands::List {
            name,
            document,
            email,
            branch_id,
            skip,
            limit,
            json,
        } => {
            let filter = ClientFilter {
                name,
                document,
                email,
                branch_id,
            };
            let page = Page::new(skip, limit.unwrap_or(ctx.config.page_size));
            let clients = ctx.clients.list_filtered(&filter, page).await?;
            list(&clients, json)?;
        }
        ClientCommands::Search { term, json } => {
            let clients = ctx.clients.search(&term).await?;
            list(&clients, json)?;
        }
        ClientCommands::Get { id, json } => {
            let client = ctx.clients.get(&id).await?;
            if json {
                return print_json(&client);
            }
            println!("{}", client.name.bold());
            println!("  ID: {}", client.id);
            println!("  Document: {}", client.document);
            println!("  Email: {}", output::or_dash(client.email.as_deref()));
            println!("  Phone: {}", output::or_dash(client.phone.as_deref()));
            println!("  Address: {}", output::or_dash(client.address.as_deref()));
            println!("  Branch: {}", output::or_dash(client.branch_id.as_deref()));
        }
        ClientCommands::ByBranch { branch_id, json } => {
            let clients = ctx.clients.by_branch(&branch_id).await?;
            list(&clients, json)?;
        }
        ClientCommands::Create {
            name,
            document,
            email,
            phone,
            address,
            branch_id,
            json,
        } => {
            require_login(&ctx)?;
            let input = ClientCreate {
                name,
                document,
                email,
                phone,
                address,
                branch_id,
            };
            let client = ctx.clients.create(&input).await?;
            if json {
                return print_json(&client);
            }
            output::success(&format!("Client {} created (id {})", client.name, client.id));
        }
        ClientCommands::Update {
            id,
            name,
            document,
            email,
            phone,
            address,
            user_id,
            branch_id,
            json,
        } => {
            require_login(&ctx)?;
            let changes = ClientUpdate {
                name,
                document,
                phone,
                address,
                email,
                user_id,
                branch_id,
            };
            let client = ctx.clients.update(&id, &changes).await?;
            if json {
                return print_json(&client);
            }
            output::success(&format!("Client {} updated", client.id));
        }
        ClientCommands::Delete { id, force } => {
            require_login(&ctx)?;
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete client {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            ctx.clients.delete(&id).await?;
            output::success(&format!("Client {} deleted", id));
        }
    }

    Ok(())
}

fn list(clients: &[Client], json: bool) -> Result<()> {
    if json {
        return print_json(clients);
    }
    if clients.is_empty() {
        println!("No clients found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Document", "Email", "Phone", "Branch"]);
    for client in clients {
        table.add_row(vec![
            client.id.clone(),
            client.name.clone(),
            client.document.clone(),
            output::or_dash(client.email.as_deref()),
            output::or_dash(client.phone.as_deref()),
            output::or_dash(client.branch_id.as_deref()),
        ]);
    }
    println!("{}", table);
    Ok(())
}
