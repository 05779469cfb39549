use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use dice_maestro::dice::DEFAULT_CUSTOM_COLOR;

/// Roll dice, manage custom dice and play dice games!
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(flatten)]
    pub store: StoreArgs,

    /// Log debug output
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Directory the dice, history and games are kept in
    #[arg(long, env = "DICE_DATA_DIR", default_value = ".dice-maestro", global = true)]
    pub data_dir: PathBuf,

    /// Prefix for every storage key. `dice-roller-` matches the browser app.
    #[arg(long, env = "DICE_KEY_PREFIX", default_value = "", global = true)]
    pub key_prefix: String,

    /// Seed the dice for reproducible rolls
    #[arg(long, env = "DICE_SEED", global = true)]
    pub seed: Option<u64>,
}

/// Actions
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Roll one or more dice, by id (`d20`) or name
    Roll {
        #[arg(required = true)]
        dice: Vec<String>,

        /// Roll each dice this many times
        #[arg(long, short = 'n', default_value_t = 1)]
        times: u32,
    },

    /// Manage custom dice
    #[command(subcommand)]
    Dice(DiceCommand),

    /// Show the roll history
    History {
        /// Forget every roll
        #[arg(long)]
        clear: bool,

        /// Show at most this many rolls
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Play dice games
    #[command(subcommand)]
    Games(GamesCommand),

    /// Delete all custom dice, history, games and templates
    Reset {
        /// Required, as nothing can be recovered afterwards
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DiceCommand {
    /// List standard and custom dice
    List,

    /// Create a custom dice
    Create {
        name: String,

        #[command(flatten)]
        faces: Faces,

        /// Display color. Color dice take the first of their --colors instead.
        #[arg(long, default_value = DEFAULT_CUSTOM_COLOR, conflicts_with = "colors")]
        color: String,
    },

    /// Delete a custom dice. Its rolls stay in the history.
    Delete { id: String },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Faces {
    /// Free-text labels, one per side
    #[arg(long, num_args = 1.., value_name = "LABEL")]
    pub sides: Option<Vec<String>>,

    /// Number the sides from MIN to MAX
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_hyphen_values = true)]
    pub range: Option<Vec<i32>>,

    /// Hex colors, one per side
    #[arg(long, num_args = 1.., value_name = "HEX")]
    pub colors: Option<Vec<String>>,
}

#[derive(Subcommand, Debug)]
pub enum GamesCommand {
    /// List game templates
    List,

    /// Start a game from a template
    Start {
        template: String,

        #[arg(required = true)]
        players: Vec<String>,
    },

    /// Roll the game's dice for the player whose turn it is
    Turn { session: String },

    /// Roll one of the game's dice, by id, for the player whose turn it is
    Roll { session: String, dice: String },

    /// List running games
    Sessions,

    /// End a running game
    End { session: String },
}
