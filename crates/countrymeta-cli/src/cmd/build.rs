//! Build subcommand - discover, fetch, reshape and write both artifacts

use anyhow::Result;
use clap::Args;

use countrymeta_core::{ReqwestTransport, SharedProgress};
use countrymeta_reshape::TagRules;
use countrymeta_store::RelationStore;

use super::{DirArgs, fetch_rows, key_value_table};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Number of parallel relation requests
    #[arg(short, long)]
    pub workers: Option<usize>,
}

pub fn run(args: BuildArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let output_dir = args.dirs.output_dir(config);
    let store = RelationStore::open(&args.dirs.build_dir(config))?;
    let fetch_config = config.fetch_config(args.workers);

    let summary = countrymeta_fetch::run(&fetch_config, &ReqwestTransport, &store, progress)?;
    let index = &summary.outcome.index;

    let line = progress.stage_line("reshape");
    line.set_message(format!("{} countries", index.len()));
    let metadata = countrymeta_reshape::run(index, &store, &TagRules::default());
    line.finish_and_clear();
    let metadata = metadata?;

    let index_path = countrymeta_reshape::write_relation_index(&output_dir, index)?;
    let metadata_path = countrymeta_reshape::write_metadata(&output_dir, &metadata)?;

    let mut rows = fetch_rows(&summary);
    rows.push(("Countries", metadata.len().to_string()));
    rows.push(("Relation index", index_path.display().to_string()));
    rows.push(("Metadata", metadata_path.display().to_string()));
    eprintln!("\n{}", key_value_table(("Build", "Result"), &rows));
    Ok(())
}
