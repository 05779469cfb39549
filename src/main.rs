mod cli;

use anyhow::{anyhow, Context};
use chrono::Local;
use clap::Parser;
use rand::Rng;

use dice_maestro::history::{format_timestamp, stats};
use dice_maestro::ids::UuidGenerator;
use dice_maestro::{Collection, CustomKind, Dice, FileStore, Roller, Storage};

use cli::{Cli, Command, DiceCommand, Faces, GamesCommand};

type AppStorage = Storage<FileStore>;

fn roll(
    storage: &mut AppStorage,
    roller: &mut Roller<impl Rng, UuidGenerator>,
    queries: &[String],
    times: u32,
) -> anyhow::Result<()> {
    let dice = queries
        .iter()
        .map(|query| {
            storage
                .find_dice(query)
                .ok_or_else(|| anyhow!("No dice called {}. Try `dice list`.", query))
        })
        .collect::<anyhow::Result<Vec<Dice>>>()?;

    for dice in &dice {
        for _ in 0..times {
            match roller.roll(dice) {
                Ok(result) => {
                    println!("{}", result);
                    if let Err(e) = storage.add_roll_to_history(result) {
                        log::warn!("Roll was not saved to history: {}", e);
                    }
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", dice.name(), e);
                    break;
                }
            }
        }
    }
    Ok(())
}

fn handle_dice(storage: &mut AppStorage, command: DiceCommand) -> anyhow::Result<()> {
    let mut ids = UuidGenerator;
    match command {
        DiceCommand::List => {
            for dice in storage.all_dice() {
                let kind = match &dice {
                    Dice::Standard(_) => "standard",
                    Dice::Custom(custom) => match custom.kind() {
                        Some(CustomKind::Numbers) => "numbers",
                        Some(CustomKind::Colors) => "colors",
                        None => "custom",
                    },
                };
                println!("{:<40} {:<8} {:<8} {}", dice.id(), kind, dice.color(), dice);
            }
        }
        DiceCommand::Create { name, faces, color } => {
            let created = match faces {
                Faces {
                    range: Some(range), ..
                } => {
                    let (min, max) = (range[0], range[1]);
                    storage.create_number_dice(&mut ids, &name, min, max, &color)?
                }
                Faces {
                    colors: Some(colors),
                    ..
                } => storage.create_color_dice(&mut ids, &name, colors)?,
                Faces {
                    sides: Some(sides), ..
                } => storage.create_custom_dice(&mut ids, &name, sides, &color)?,
                Faces { .. } => return Err(anyhow!("Give the dice --sides, --range or --colors")),
            };
            println!("Created {} ({})", Dice::from(created.clone()), created.id);
        }
        DiceCommand::Delete { id } => {
            let removed = storage.delete_custom_dice(&id)?;
            println!("Deleted {}", removed.name);
        }
    }
    Ok(())
}

fn handle_history(storage: &mut AppStorage, clear: bool, limit: usize) -> anyhow::Result<()> {
    if clear {
        storage
            .clear_roll_history()
            .context("error clearing roll history")?;
        println!("Roll history cleared.");
        return Ok(());
    }

    let history = storage.get_roll_history();
    let now = Local::now();
    for roll in history.iter().take(limit) {
        println!(
            "{:>10}  {}",
            format_timestamp(roll.timestamp, now),
            roll
        );
    }
    let summary = stats(&history, now);
    println!("Total rolls: {}  Today's rolls: {}", summary.total, summary.today);
    Ok(())
}

fn handle_games(
    storage: &mut AppStorage,
    roller: &mut Roller<impl Rng, UuidGenerator>,
    command: GamesCommand,
) -> anyhow::Result<()> {
    let mut ids = UuidGenerator;
    let templates = storage.templates_or_seed(&mut ids);
    match command {
        GamesCommand::List => {
            for template in templates {
                println!(
                    "{} ({}-{} players) [{}]: {}",
                    template.name, template.min_players, template.max_players, template.id, template.description
                );
                println!("    {}", template.rules);
            }
        }
        GamesCommand::Start { template, players } => {
            let session = storage.start_game(&mut ids, &template, players)?;
            println!(
                "Started {} with {}. Session id: {}",
                template,
                session.players.join(", "),
                session.id
            );
        }
        GamesCommand::Turn { session } => {
            let player = storage
                .find_session(&session)
                .and_then(|s| s.current_player().map(str::to_string))
                .unwrap_or_default();
            let (session, rolls) = storage.play_turn(roller, &session)?;
            println!("{} rolled:", player);
            for roll in rolls {
                println!("  {}", roll);
            }
            if let Some(next) = session.current_player() {
                println!("Next up: {}", next);
            }
        }
        GamesCommand::Roll { session, dice } => {
            let (session, roll) = storage.roll_in_game(roller, &session, &dice)?;
            println!("{}", roll);
            if let Some(next) = session.current_player() {
                println!("Next up: {}", next);
            }
        }
        GamesCommand::Sessions => {
            for session in storage.get_game_sessions() {
                println!(
                    "{} [{}] players: {} ({} rolls, {}'s turn)",
                    session.id,
                    session.template_id,
                    session.players.join(", "),
                    session.rolls.len(),
                    session.current_player().unwrap_or("nobody")
                );
            }
        }
        GamesCommand::End { session } => {
            let ended = storage.end_game(&session)?;
            println!("Ended {} after {} rolls", ended.id, ended.rolls.len());
        }
    }
    Ok(())
}

fn reset(storage: &mut AppStorage, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        return Err(anyhow!("This deletes everything in {:?}. Pass --yes to go ahead.", storage.store().dir()));
    }
    for collection in Collection::ALL {
        storage
            .remove_collection(collection)
            .with_context(|| format!("error removing {}", collection.key()))?;
    }
    println!("Removed all custom dice, history and games.");
    Ok(())
}

fn run(
    command: Command,
    mut storage: AppStorage,
    mut roller: Roller<impl Rng, UuidGenerator>,
) -> anyhow::Result<()> {
    match command {
        Command::Roll { dice, times } => roll(&mut storage, &mut roller, &dice, times),
        Command::Dice(command) => handle_dice(&mut storage, command),
        Command::History { clear, limit } => handle_history(&mut storage, clear, limit),
        Command::Games(command) => handle_games(&mut storage, &mut roller, command),
        Command::Reset { yes } => reset(&mut storage, yes),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger = pretty_env_logger::formatted_timed_builder();
    logger.filter_level(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    let storage = Storage::with_prefix(FileStore::new(&cli.store.data_dir), cli.store.key_prefix);
    log::debug!("Using data directory {:?}", storage.store().dir());

    match cli.store.seed {
        Some(seed) => {
            log::info!("Rolling with seed {}", seed);
            run(cli.command, storage, Roller::from_seed(seed))
        }
        None => run(cli.command, storage, Roller::new()),
    }
}
