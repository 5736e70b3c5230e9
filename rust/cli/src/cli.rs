use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "riverboat",
    version,
    about = "Texas Hold'em rules engine: evaluate hands, deal, simulate"
)]
pub struct RiverboatCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the best five-card hand out of 5 to 7 cards
    Eval {
        /// Cards such as `As Kd 10h`
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
    },
    /// Deal one hand and check it down to showdown
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=10))]
        seats: u8,
    },
    /// Play many hands with a random policy and verify chip conservation
    Sim {
        #[arg(long)]
        hands: u64,
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(2..=10))]
        seats: u8,
        #[arg(long)]
        seed: Option<u64>,
        /// JSONL file for hand records
        #[arg(long)]
        output: Option<String>,
    },
    /// Print resolved settings and where each value came from
    Cfg,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Eval { .. } => "eval",
            Commands::Deal { .. } => "deal",
            Commands::Sim { .. } => "sim",
            Commands::Cfg => "cfg",
        }
    }
}
