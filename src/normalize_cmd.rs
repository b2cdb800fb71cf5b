use anyhow::Result;

use crate::{cli::NormalizeArgs, naming::normalize_name, table};

pub fn execute(args: &NormalizeArgs) -> Result<()> {
    let rows = args
        .names
        .iter()
        .map(|name| vec![name.clone(), normalize_name(name)])
        .collect::<Vec<_>>();
    table::print_table(&["raw", "normalized"], &rows);
    Ok(())
}
