//! Prospectus command implementation.

use crate::cli::ProspectusArgs;
use crate::error::Result;
use crate::{persist, prospectus};

/// Execute the prospectus command.
pub fn execute_prospectus(args: ProspectusArgs) -> Result<()> {
    let result = persist::load_json(&args.json_file)?;
    println!("{}", prospectus::render(&result)?);
    Ok(())
}
