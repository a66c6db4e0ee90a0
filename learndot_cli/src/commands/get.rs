use anyhow::Result;
use clap::Args;
use learndot_api::Client;

use crate::output::{print_response, OutputFormat};
use crate::validation;

#[derive(Args)]
pub struct GetArgs {
    /// Entity collection (e.g. contacts, courses)
    pub entity: String,

    /// Id of the record to fetch
    pub id: String,
}

pub async fn run(args: &GetArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let entity = validation::validate_entity(&args.entity)?;
    let id = validation::parse_record_id(&args.id)?;
    let resp = client.get(&entity, id).await?;
    print_response(&resp, format)
}
