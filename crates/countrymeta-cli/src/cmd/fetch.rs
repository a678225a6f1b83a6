//! Fetch subcommand - discover and download relations, write the relation index

use anyhow::Result;
use clap::Args;

use countrymeta_core::{ReqwestTransport, SharedProgress};
use countrymeta_store::RelationStore;

use super::{DirArgs, fetch_rows, key_value_table};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Number of parallel relation requests
    #[arg(short, long)]
    pub workers: Option<usize>,
}

pub fn run(args: FetchArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let store = RelationStore::open(&args.dirs.build_dir(config))?;
    let fetch_config = config.fetch_config(args.workers);

    let summary = countrymeta_fetch::run(&fetch_config, &ReqwestTransport, &store, progress)?;
    let index_path =
        countrymeta_reshape::write_relation_index(&args.dirs.output_dir(config), &summary.outcome.index)?;

    let mut rows = fetch_rows(&summary);
    rows.push(("Relation index", index_path.display().to_string()));
    rows.push(("Cache", store.dir().display().to_string()));
    eprintln!("\n{}", key_value_table(("Fetch", "Result"), &rows));
    Ok(())
}
