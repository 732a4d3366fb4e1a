use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use itch_jam_scan::{
    classify::Keywords,
    cli::{Cli, Commands},
    crawl::{self, JamClient},
    model::GameType,
    render,
    store::{JamStore, SearchFilter},
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };
    let keywords = match &cli.keywords {
        Some(path) => Keywords::load(path)?,
        None => Keywords::default(),
    };
    let mut store = JamStore::open(&db_path)?;

    match cli.command {
        Commands::Crawl { id, force } => {
            let client = JamClient::new()?;
            if id.is_empty() {
                let fetched = crawl::crawl_listings(&mut store, &client, &keywords, force)?;
                println!("Crawled {} jams", fetched);
            } else {
                for jam_id in &id {
                    match crawl::crawl_one(&mut store, &client, &keywords, jam_id) {
                        Ok(gametype) => println!("{}: {}", jam_id, gametype),
                        Err(err) => eprintln!("skipping {}: {:#}", jam_id, err),
                    }
                }
            }
        }

        Commands::List {
            gametype,
            owner,
            name,
            id,
            old,
        } => {
            // bare `list` means upcoming tabletop jams, the common query
            let gametype = match (&gametype, &owner, &name, &id) {
                (None, None, None, None) => Some("tabletop".to_string()),
                _ => gametype,
            };
            let filter = SearchFilter {
                gametype: gametype
                    .as_deref()
                    .map(|word| word.parse::<GameType>())
                    .transpose()?,
                owner,
                name,
                id,
                include_old: old,
            };
            let jams = store.search(&filter)?;
            if jams.is_empty() {
                println!("No jams found");
            } else {
                print!("{}", render::listing_table(&jams));
            }
        }

        Commands::Show { id } => {
            let jams = store.get(&id)?;
            for jam_id in &id {
                match jams.iter().find(|jam| &jam.id == jam_id) {
                    Some(jam) => println!("{}\n", render::detail(jam)),
                    None => eprintln!("{} not found", jam_id),
                }
            }
        }

        Commands::Classify { id, gametype } => {
            let ids = if id.is_empty() {
                store
                    .search(&SearchFilter {
                        gametype: Some(GameType::Unclassified),
                        include_old: true,
                        ..Default::default()
                    })?
                    .into_iter()
                    .map(|jam| jam.id)
                    .collect()
            } else {
                id
            };

            match gametype {
                Some(word) => {
                    let gametype = word.parse::<GameType>()?;
                    for jam_id in &ids {
                        store.classify(jam_id, gametype)?;
                        println!("Classified {} as {}", jam_id, gametype);
                    }
                }
                None => {
                    for jam_id in &ids {
                        let Some(jam) = store.get(std::slice::from_ref(jam_id))?.into_iter().next()
                        else {
                            eprintln!("{} not found", jam_id);
                            continue;
                        };
                        println!("{}\n", render::detail(&jam));
                        let gametype = prompt_gametype()?;
                        store.classify(jam_id, gametype)?;
                        println!("Classified {} as {}", jam_id, gametype);
                    }
                }
            }
        }

        Commands::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("Deleted {} jams", removed);
        }

        Commands::Migrate => {
            let migrated = store.migrate_legacy()?;
            if migrated == 0 {
                println!("No legacy table present; nothing to migrate");
            } else {
                println!("Migrated {} jams to the normalized schema", migrated);
            }
        }
    }

    Ok(())
}

fn default_db_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "itch-jam-scan")
        .context("Could not determine data directory")?;
    std::fs::create_dir_all(dirs.data_dir()).context("Failed to create data directory")?;
    Ok(dirs.data_dir().join("itch_jam.db"))
}

/// Ask for a game type on stdin until the answer parses.
fn prompt_gametype() -> Result<GameType> {
    loop {
        print!("Game type [tabletop/digital/unclassified]: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            anyhow::bail!("stdin closed during interactive classification");
        }
        match line.trim().parse::<GameType>() {
            Ok(gametype) => return Ok(gametype),
            Err(_) => println!("Unrecognized type: {}", line.trim()),
        }
    }
}
