use std::io::Read;

use anyhow::Context;
use colored::Colorize;
use folio_store::RecordStore;
use serde_json::Value;

use crate::cli::*;
use crate::demo;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = RecordStore::open_default(&cli.root)
        .with_context(|| format!("opening store at {}", cli.root.display()))?;
    let format = cli.format;

    match cli.command {
        Command::Put(args) => cmd_put(&store, args),
        Command::Get(args) => cmd_get(&store, args, format),
        Command::List(args) => cmd_list(&store, args, format),
        Command::Names(args) => cmd_names(&store, args, format),
        Command::Delete(args) => cmd_delete(&store, args),
        Command::Demo(args) => cmd_demo(&store, args, format),
    }
}

fn read_input(args: &PutArgs) -> anyhow::Result<String> {
    if let Some(data) = &args.data {
        return Ok(data.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading document from stdin")?;
    Ok(buf)
}

fn cmd_put(store: &RecordStore, args: PutArgs) -> anyhow::Result<()> {
    let input = read_input(&args)?;
    let document: Value = serde_json::from_str(&input).context("document is not valid JSON")?;
    store.write(&args.collection, &args.resource, &document)?;
    println!(
        "{} Wrote {}/{}",
        "✓".green().bold(),
        args.collection.bold(),
        args.resource.yellow()
    );
    Ok(())
}

fn cmd_get(store: &RecordStore, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let document: Value = store.read(&args.collection, &args.resource)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&document)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}

fn cmd_list(store: &RecordStore, args: CollectionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let documents: Vec<Value> = store.read_all_as(&args.collection)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&documents)?),
        OutputFormat::Text => {
            if documents.is_empty() {
                println!("No records in {}.", args.collection.bold());
            }
            for doc in &documents {
                println!("{}", serde_json::to_string_pretty(doc)?);
            }
        }
    }
    Ok(())
}

fn cmd_names(store: &RecordStore, args: CollectionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let names = store.list(&args.collection)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&names)?),
        OutputFormat::Text => {
            for name in &names {
                println!("  {}", name.yellow());
            }
        }
    }
    Ok(())
}

fn cmd_delete(store: &RecordStore, args: DeleteArgs) -> anyhow::Result<()> {
    match &args.resource {
        Some(resource) => {
            store.delete(&args.collection, resource)?;
            println!("Deleted {}/{}", args.collection.bold(), resource.yellow());
        }
        None => {
            store.delete_collection(&args.collection)?;
            println!("Deleted collection {}", args.collection.bold());
        }
    }
    Ok(())
}

fn cmd_demo(store: &RecordStore, args: DemoArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = demo::run(store, &args.collection)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "written": report.written,
                "users": report.users,
                "deleted": report.deleted,
                "remaining": report.remaining,
            })
        ),
        OutputFormat::Text => {
            println!("{} Wrote {} users to {}", "✓".green().bold(), report.written, args.collection.bold());
            for user in &report.users {
                println!(
                    "  {} ({}) {}",
                    user.name.yellow(),
                    user.age,
                    user.company.dimmed()
                );
            }
            println!("Deleted {}; {} remaining", report.deleted.yellow(), report.remaining);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cli(root: PathBuf, command: Command) -> Cli {
        Cli {
            command,
            root,
            verbose: false,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn put_get_delete_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("db");

        run_command(cli(
            root.clone(),
            Command::Put(PutArgs {
                collection: "users".into(),
                resource: "John".into(),
                data: Some(r#"{"name": "John", "age": 30}"#.into()),
                file: None,
            }),
        ))
        .unwrap();

        let store = RecordStore::open_default(&root).unwrap();
        let john: Value = store.read("users", "John").unwrap();
        assert_eq!(john["name"], "John");

        run_command(cli(
            root.clone(),
            Command::Get(GetArgs { collection: "users".into(), resource: "John".into() }),
        ))
        .unwrap();

        run_command(cli(
            root.clone(),
            Command::Delete(DeleteArgs { collection: "users".into(), resource: Some("John".into()) }),
        ))
        .unwrap();
        assert!(!store.exists("users", "John").unwrap());
    }

    #[test]
    fn put_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("paul.json");
        std::fs::write(&doc, r#"{"name": "Paul"}"#).unwrap();
        let store = RecordStore::open_default(dir.path().join("db")).unwrap();

        cmd_put(
            &store,
            PutArgs {
                collection: "users".into(),
                resource: "Paul".into(),
                data: None,
                file: Some(doc),
            },
        )
        .unwrap();
        assert!(store.exists("users", "Paul").unwrap());
    }

    #[test]
    fn put_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open_default(dir.path()).unwrap();
        let err = cmd_put(
            &store,
            PutArgs {
                collection: "users".into(),
                resource: "John".into(),
                data: Some("{not json".into()),
                file: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
        assert!(!store.exists("users", "John").unwrap());
    }

    #[test]
    fn get_missing_record_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open_default(dir.path()).unwrap();
        let err = cmd_get(
            &store,
            GetArgs { collection: "users".into(), resource: "nobody".into() },
            OutputFormat::Json,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn delete_without_resource_drops_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open_default(dir.path()).unwrap();
        store.write("users", "John", &serde_json::json!({})).unwrap();

        cmd_delete(&store, DeleteArgs { collection: "users".into(), resource: None }).unwrap();
        assert!(!dir.path().join("users").exists());
    }

    #[test]
    fn list_and_names_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open_default(dir.path()).unwrap();
        cmd_demo(&store, DemoArgs { collection: "users".into() }, OutputFormat::Text).unwrap();

        for format in [OutputFormat::Text, OutputFormat::Json] {
            cmd_list(&store, CollectionArgs { collection: "users".into() }, format).unwrap();
            cmd_names(&store, CollectionArgs { collection: "users".into() }, format).unwrap();
        }
        assert_eq!(store.list("users").unwrap().len(), 5);
    }
}
