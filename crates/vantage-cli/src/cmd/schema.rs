//! `vantage schema` -- Print the JSON Schema of the selection rule.

use clap::Args;
use vantage_runtime::selection_schema;

use crate::output::print_json;

#[derive(Args)]
pub struct SchemaArgs {}

pub fn run(_args: SchemaArgs) -> Result<(), Box<dyn std::error::Error>> {
    let schema = selection_schema();
    if schema.is_null() {
        return Err("failed to generate the selection rule schema".into());
    }
    print_json(&schema);
    Ok(())
}
