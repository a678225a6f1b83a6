//! `countrymeta cache` - inspect or clear the relation cache

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use countrymeta_store::RelationStore;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cached relation documents
    List {
        /// Build directory (containing relations/)
        #[arg(short, long)]
        build_dir: Option<PathBuf>,
    },
    /// Delete cached relation documents
    Clean {
        /// Build directory (containing relations/)
        #[arg(short, long)]
        build_dir: Option<PathBuf>,

        /// Actually delete (otherwise dry-run)
        #[arg(long)]
        confirm: bool,
    },
}

pub fn run(args: CacheArgs, config: &Config) -> Result<()> {
    match args.action {
        CacheAction::List { build_dir } => {
            let store = open(build_dir, config)?;
            list(&store)
        }
        CacheAction::Clean { build_dir, confirm } => {
            let store = open(build_dir, config)?;
            clean(&store, confirm)
        }
    }
}

fn open(build_dir: Option<PathBuf>, config: &Config) -> Result<RelationStore> {
    RelationStore::open(&build_dir.unwrap_or_else(|| config.build.dir.clone()))
}

fn list(store: &RelationStore) -> Result<()> {
    let ids = store.list()?;
    if ids.is_empty() {
        eprintln!("No cached relations in {}.", store.dir().display());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Relation").fg(Color::Cyan),
            Cell::new("Bytes").fg(Color::Cyan),
        ]);
    for &id in &ids {
        let size = std::fs::metadata(store.path(id)).map_or(0, |m| m.len());
        table.add_row(vec![Cell::new(id), Cell::new(size)]);
    }

    eprintln!("\n{table}");
    eprintln!("{} relations in {}", ids.len(), store.dir().display());
    Ok(())
}

fn clean(store: &RelationStore, confirm: bool) -> Result<()> {
    if !confirm {
        let count = store.list()?.len();
        eprintln!(
            "{count} cached relations in {} would be removed. Re-run with --confirm.",
            store.dir().display()
        );
        return Ok(());
    }
    let removed = store.clear()?;
    eprintln!("Removed {removed} cached relations.");
    Ok(())
}
