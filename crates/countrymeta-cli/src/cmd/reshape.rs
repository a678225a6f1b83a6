//! Reshape subcommand - rebuild the metadata artifact from cached relations
//!
//! Needs no network: reads the relation index of a previous `fetch`/`build`
//! and the documents in the build directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use countrymeta_core::SharedProgress;
use countrymeta_reshape::{RELATION_INDEX_FILE, TagRules};
use countrymeta_store::RelationStore;

use super::{DirArgs, key_value_table};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReshapeArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Relation index to reshape (default: <output>/osm-country-relation-ids.json)
    #[arg(short, long)]
    pub index: Option<PathBuf>,
}

pub fn run(args: ReshapeArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let output_dir = args.dirs.output_dir(config);
    let index_path = args
        .index
        .clone()
        .unwrap_or_else(|| output_dir.join(RELATION_INDEX_FILE));
    let index = countrymeta_reshape::read_relation_index(&index_path)?;
    log::info!("{}: {} countries", index_path.display(), index.len());

    let store = RelationStore::open(&args.dirs.build_dir(config))?;

    let line = progress.stage_line("reshape");
    line.set_message(format!("{} countries", index.len()));
    let metadata = countrymeta_reshape::run(&index, &store, &TagRules::default());
    line.finish_and_clear();
    let metadata = metadata?;

    let metadata_path = countrymeta_reshape::write_metadata(&output_dir, &metadata)?;

    let rows = [
        ("Relation index", index_path.display().to_string()),
        ("Countries", metadata.len().to_string()),
        ("Metadata", metadata_path.display().to_string()),
    ];
    eprintln!("\n{}", key_value_table(("Reshape", "Result"), &rows));
    Ok(())
}
