use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio — a filesystem document store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory (created if missing)
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a JSON document (from --data, --file, or stdin)
    Put(PutArgs),
    /// Print one document
    Get(GetArgs),
    /// Print every document in a collection
    List(CollectionArgs),
    /// Print the record names in a collection
    Names(CollectionArgs),
    /// Delete a record, or a whole collection when no resource is given
    Delete(DeleteArgs),
    /// Write six sample users, list them, then delete one
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct PutArgs {
    pub collection: String,
    pub resource: String,
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct GetArgs {
    pub collection: String,
    pub resource: String,
}

#[derive(Args)]
pub struct CollectionArgs {
    pub collection: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub collection: String,
    pub resource: Option<String>,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Collection the sample users are written to
    #[arg(long, default_value = "users")]
    pub collection: String,
}
