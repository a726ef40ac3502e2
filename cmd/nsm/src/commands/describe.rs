//! Describe command implementation.

use super::{load_policies, InputArgs};
use anyhow::Result;
use nsm_translator::describe::describe_policies;

/// Runs the describe command.
pub fn run(input: &InputArgs) -> Result<()> {
    let policies = load_policies(input)?;
    print!("{}", describe_policies(&policies));
    Ok(())
}
