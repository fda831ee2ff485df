use anyhow::Result;

use super::{build_client, ClientOptions};

pub fn run(options: ClientOptions) -> Result<()> {
    let client = build_client(options)?;
    println!("{}", client.url());
    Ok(())
}
