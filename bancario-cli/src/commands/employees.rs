//! Employees command

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use bancario_core::domain::{EmployeeCreate, EmployeeUpdate};
use bancario_core::{Employee, Page};

use super::{get_context, print_json, require_admin};
use crate::output;

#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// List employees
    List {
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one employee
    Get {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Employees working at a branch
    ByBranch {
        branch_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an employee
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        branch_id: String,
        #[arg(long)]
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change employee fields
    Update {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        branch_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an employee
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: EmployeeCommands) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;

    match command {
        EmployeeCommands::List { skip, limit, json } => {
            let page = Page::new(skip, limit.unwrap_or(ctx.config.page_size));
            let employees = ctx.employees.list(page).await?;
            list(&employees, json)?;
        }
        EmployeeCommands::Get { id, json } => {
            let employee = ctx.employees.get(&id).await?;
            if json {
                return print_json(&employee);
            }
            println!("{}", employee.full_name().bold());
            println!("  ID: {}", employee.id);
            println!("  Position: {}", employee.position);
            println!("  Branch: {}", employee.branch_id);
            println!("  User: {}", employee.user_id);
        }
        EmployeeCommands::ByBranch { branch_id, json } => {
            let employees = ctx.employees.by_branch(&branch_id).await?;
            list(&employees, json)?;
        }
        EmployeeCommands::Create {
            first_name,
            last_name,
            position,
            branch_id,
            user_id,
            json,
        } => {
            let input = EmployeeCreate {
                first_name,
                last_name,
                position,
                branch_id,
                user_id,
            };
            let employee = ctx.employees.create(&input).await?;
            if json {
                return print_json(&employee);
            }
            output::success(&format!("Employee {} created (id {})", employee.full_name(), employee.id));
        }
        EmployeeCommands::Update {
            id,
            first_name,
            last_name,
            position,
            branch_id,
            user_id,
            json,
        } => {
            let changes = EmployeeUpdate {
                first_name,
                last_name,
                position,
                branch_id,
                user_id,
            };
            let employee = ctx.employees.update(&id, &changes).await?;
            if json {
                return print_json(&employee);
            }
            output::success(&format!("Employee {} updated", employee.id));
        }
        EmployeeCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete employee {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            ctx.employees.delete(&id).await?;
            output::success(&format!("Employee {} deleted", id));
        }
    }

    Ok(())
}

fn list(employees: &[Employee], json: bool) -> Result<()> {
    if json {
        return print_json(employees);
    }
    if employees.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Position", "Branch", "User"]);
    for employee in employees {
        table.add_row(vec![
            employee.id.clone(),
            employee.full_name(),
            employee.position.clone(),
            employee.branch_id.clone(),
            employee.user_id.clone(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
