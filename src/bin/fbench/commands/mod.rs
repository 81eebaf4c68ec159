mod phenyl;
mod score;

use phenyl::run_phenyl;
use score::run_score;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Score(args) => run_score(args, ctx),
        Command::Phenyl(args) => run_phenyl(args, ctx),
    }
}
