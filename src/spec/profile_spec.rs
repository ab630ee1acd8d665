//! `profile` management command

use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;

use super::{flag_set, opt_value, Spec, SpecContext};
use crate::error::{IrError, IrResult};
use crate::profile::{Profile, ProfileManager};

pub const PROFILE_COMMAND: &str = "profile";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSpec;

fn name_arg() -> Arg {
    Arg::new("name").required(true).help("Profile name")
}

impl Spec for ProfileSpec {
    fn name(&self) -> &str {
        PROFILE_COMMAND
    }

    fn command(&self) -> Command {
        Command::new(PROFILE_COMMAND)
            .about("Manage profiles (named working directories for playbook runs)")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(Command::new("create").about("Create a profile").arg(name_arg()))
            .subcommand(
                Command::new("checkout")
                    .about("Activate a profile")
                    .arg(name_arg())
                    .arg(
                        Arg::new("create")
                            .short('c')
                            .long("create")
                            .action(ArgAction::SetTrue)
                            .help("Create the profile if it does not exist"),
                    ),
            )
            .subcommand(Command::new("activate").about("Activate a profile").arg(name_arg()))
            .subcommand(Command::new("deactivate").about("Clear the active profile"))
            .subcommand(
                Command::new("list").about("List profiles").arg(
                    Arg::new("active")
                        .long("active")
                        .action(ArgAction::SetTrue)
                        .help("Only print the active profile name"),
                ),
            )
            .subcommand(Command::new("delete").about("Delete a profile").arg(name_arg()))
            .subcommand(
                Command::new("cleanup")
                    .about("Remove run artifacts from a profile")
                    .arg(name_arg()),
            )
            .subcommand(
                Command::new("show")
                    .about("Show a profile (the active one by default)")
                    .arg(Arg::new("name").help("Profile name")),
            )
    }

    fn handle(&self, ctx: &SpecContext<'_>, matches: &ArgMatches) -> IrResult<Option<i32>> {
        let profiles = ctx.profiles;
        let Some((action, sub)) = matches.subcommand() else {
            return Ok(None);
        };
        let name = opt_value::<String>(sub, "name");
        let required_name = || name.clone().unwrap_or_default();

        match action {
            "create" => {
                let profile = profiles.create(&required_name())?;
                println!("{} Profile '{}' created", "OK".green(), profile.name);
            }
            "checkout" => {
                let profile = profiles.checkout(&required_name(), flag_set(sub, "create"))?;
                println!("{} Now using profile '{}'", "OK".green(), profile.name);
            }
            "activate" => {
                let profile = profiles.activate(&required_name())?;
                println!("{} Now using profile '{}'", "OK".green(), profile.name);
            }
            "deactivate" => {
                profiles.deactivate()?;
                println!("{} No active profile", "OK".green());
            }
            "list" => list(profiles, flag_set(sub, "active"))?,
            "delete" => {
                profiles.delete(&required_name())?;
                println!("{} Profile '{}' deleted", "OK".green(), required_name());
            }
            "cleanup" => {
                let removed = profiles.cleanup(&required_name())?;
                println!(
                    "{} Profile '{}' cleaned ({} entries removed)",
                    "OK".green(),
                    required_name(),
                    removed
                );
            }
            "show" => {
                let profile = match name.as_deref() {
                    Some(name) => profiles.get(name)?,
                    None => profiles
                        .get_active()?
                        .ok_or(IrError::NoActiveProfileFound)?,
                };
                show(profiles, &profile)?;
            }
            _ => return Ok(None),
        }

        Ok(None)
    }
}

fn list(profiles: &ProfileManager, active_only: bool) -> IrResult<()> {
    let active = profiles.get_active()?.map(|p| p.name);

    if active_only {
        if let Some(name) = active {
            println!("{}", name);
        }
        return Ok(());
    }

    let all = profiles.list()?;
    if all.is_empty() {
        println!("No profiles");
        return Ok(());
    }

    for profile in all {
        if active.as_deref() == Some(profile.name.as_str()) {
            println!("{} {}", "*".green().bold(), profile.name.green().bold());
        } else {
            println!("  {}", profile.name);
        }
    }
    Ok(())
}

fn show(profiles: &ProfileManager, profile: &Profile) -> IrResult<()> {
    let active = profiles.is_active(&profile.name)?;

    println!("{}: {}", "Name".bold(), profile.name);
    println!("{}: {}", "Path".bold(), profile.path.display());
    println!("{}: {}", "Inventory".bold(), profile.inventory().display());
    if let Some(created_at) = profile.created_at {
        println!("{}: {}", "Created".bold(), created_at.to_rfc3339());
    }
    println!(
        "{}: {}",
        "Active".bold(),
        if active { "yes".green() } else { "no".normal() }
    );
    Ok(())
}
