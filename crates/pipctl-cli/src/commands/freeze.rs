//! `pipctl freeze` and `pipctl list`

use pipctl_core::{Pip, PipConfig};

use super::run_context;
use crate::cli::Target;
use crate::error::Result;

pub fn run_freeze(pip: &Pip, target: Target, config: &PipConfig) -> Result<()> {
    for line in pip.freeze(&run_context(target, config))? {
        println!("{}", line);
    }
    Ok(())
}

pub fn run_list(
    pip: &Pip,
    prefix: Option<&str>,
    json: bool,
    target: Target,
    config: &PipConfig,
) -> Result<()> {
    let packages = pip.list(prefix, &run_context(target, config))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
    } else {
        for (name, version) in &packages {
            println!("{}=={}", name, version);
        }
    }
    Ok(())
}
