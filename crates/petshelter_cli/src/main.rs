//! Command-line probe for the pet store.
//!
//! # Responsibility
//! - Drive the provider the way a UI host would, one request per run.
//! - Keep output line-oriented for quick local checks.

use clap::{Parser, Subcommand};
use log::info;
use petshelter_core::contract::{pet_entry, DATABASE_NAME};
use petshelter_core::{
    default_log_level, init_logging, ContentUri, ContentValues, Cursor, DatabaseLocation,
    GenderPolicy, PetProvider, PetService, ShelterConfig,
};
use rusqlite::types::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "petshelter", version, about = "Inspect and edit the pet shelter store")]
struct Cli {
    /// Database file (created if missing)
    #[arg(long, global = true, default_value = DATABASE_NAME)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level used with --log-dir
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Reject gender codes outside 0..=2 instead of only above 2
    #[arg(long, global = true)]
    strict_gender: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage info
    Ping,
    /// Insert the sample pet
    InsertDummy,
    /// Insert a pet
    Insert {
        #[command(flatten)]
        fields: PetFields,
    },
    /// List pets at a collection or item address
    #[command(alias = "ls")]
    List { uri: Option<String> },
    /// Update pets at an address
    Update {
        uri: String,
        #[command(flatten)]
        fields: PetFields,
    },
    /// Delete pets at an address
    #[command(alias = "rm")]
    Delete { uri: String },
    /// Print the type label of an address
    Type { uri: String },
}

impl Command {
    /// Stable name for log lines; never carries field values.
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::InsertDummy => "insert-dummy",
            Self::Insert { .. } => "insert",
            Self::List { .. } => "list",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Type { .. } => "type",
        }
    }
}

#[derive(clap::Args, Debug)]
struct PetFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    breed: Option<String>,
    /// 0 = unknown, 1 = male, 2 = female
    #[arg(long, allow_hyphen_values = true)]
    gender: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    weight: Option<i64>,
}

impl PetFields {
    fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        if let Some(name) = &self.name {
            values.put_str(pet_entry::NAME, name.as_str());
        }
        if let Some(breed) = &self.breed {
            values.put_str(pet_entry::BREED, breed.as_str());
        }
        if let Some(gender) = self.gender {
            values.put_i64(pet_entry::GENDER, gender);
        }
        if let Some(weight) = self.weight {
            values.put_i64(pet_entry::WEIGHT, weight);
        }
        values
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    if let Command::Ping = cli.command {
        println!("petshelter_core ping={}", petshelter_core::ping());
        println!("petshelter_core version={}", petshelter_core::core_version());
        return Ok(());
    }

    let config = ShelterConfig {
        database: DatabaseLocation::File(cli.db.clone()),
        gender_policy: if cli.strict_gender {
            GenderPolicy::Strict
        } else {
            GenderPolicy::UpperBoundOnly
        },
        ..ShelterConfig::default()
    };
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );
    let provider = PetProvider::open(&config).map_err(|err| err.to_string())?;
    let service = PetService::new(&provider);

    match cli.command {
        Command::Ping => {}
        Command::InsertDummy => {
            let created = service.insert_dummy_pet().map_err(|err| err.to_string())?;
            print_insert_result(created)?;
        }
        Command::Insert { fields } => {
            let created = provider
                .insert(provider.content_uri(), &fields.to_values())
                .map_err(|err| err.to_string())?;
            print_insert_result(created)?;
        }
        Command::List { uri } => {
            let uri = match uri {
                Some(value) => parse_uri(&value)?,
                None => provider.content_uri().clone(),
            };
            let cursor = provider
                .query(&uri, None, None, Some(pet_entry::ID))
                .map_err(|err| err.to_string())?;
            print_cursor(&cursor);
        }
        Command::Update { uri, fields } => {
            let uri = parse_uri(&uri)?;
            let changed = provider
                .update(&uri, &fields.to_values(), None)
                .map_err(|err| err.to_string())?;
            println!("updated={changed}");
        }
        Command::Delete { uri } => {
            let uri = parse_uri(&uri)?;
            let removed = provider.delete(&uri, None).map_err(|err| err.to_string())?;
            println!("deleted={removed}");
        }
        Command::Type { uri } => {
            let uri = parse_uri(&uri)?;
            println!("{}", provider.get_type(&uri).map_err(|err| err.to_string())?);
        }
    }
    Ok(())
}

fn parse_uri(value: &str) -> Result<ContentUri, String> {
    ContentUri::parse(value).map_err(|err| err.to_string())
}

fn print_insert_result(created: Option<ContentUri>) -> Result<(), String> {
    match created {
        Some(uri) => {
            println!("created={uri}");
            Ok(())
        }
        None => Err("storage refused the new pet".to_string()),
    }
}

fn print_cursor(cursor: &Cursor) {
    println!("{}", cursor.columns().join("\t"));
    for row in cursor.rows() {
        let cells: Vec<String> = row
            .values()
            .iter()
            .map(|value| match value {
                Value::Null => String::new(),
                Value::Integer(number) => number.to_string(),
                Value::Real(number) => number.to_string(),
                Value::Text(text) => text.clone(),
                Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}
