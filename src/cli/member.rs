//! Member CLI commands

use clap::Subcommand;

use crate::display::format_member_list;
use crate::error::FairshareResult;
use crate::services::MemberService;
use crate::storage::Storage;

/// Member subcommands
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a member to the group
    Add {
        /// Display name
        name: String,
    },
    /// List members
    List,
}

/// Handle a member command
pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> FairshareResult<()> {
    let service = MemberService::new(storage);

    match cmd {
        MemberCommands::Add { name } => {
            let member = service.add(&name)?;
            println!("Added member: {}", member.display_name);
            println!("  ID: {}", member.id);
        }
        MemberCommands::List => {
            print!("{}", format_member_list(&service.list()?));
        }
    }

    Ok(())
}
