//! Profile file helpers

use anyhow::{Context, Result, bail};
use dsip_core::{ProcessParams, Profile};

use crate::ProfileCommand;

pub fn run(cmd: ProfileCommand) -> Result<()> {
    match cmd {
        ProfileCommand::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Profile::from_params(&ProcessParams::default(), 0)
                .save(&path)
                .with_context(|| format!("Failed to write profile: {}", path.display()))?;
            println!("Wrote identity profile to {}", path.display());
        }
        ProfileCommand::Show { path } => {
            let parsed = Profile::load(&path)
                .with_context(|| format!("Failed to read profile: {}", path.display()))?;
            print!("{}", parsed.profile.to_text());
            let outside = parsed.profile.outside_ui_ranges();
            if !outside.is_empty() {
                eprintln!("outside the editor's slider ranges: {}", outside.join(", "));
            }
            if !parsed.warnings.is_empty() {
                eprintln!("{} problem(s):", parsed.warnings.len());
                for warning in &parsed.warnings {
                    eprintln!("  {warning}");
                }
            }
        }
    }
    Ok(())
}
