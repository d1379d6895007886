//! `kfx tokens`: show the include-expanded token stream

use crate::common::{build_parser, GlobalOpts, SourceArgs};
use crate::errors::CliError;
use clap::Args;
use kfx_config::Settings;
use kfx_xargs::Token;

#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn handle_tokens(cmd: TokensCommand, opts: GlobalOpts) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let parser = build_parser(&cmd.source, &settings)?;
    let tokens = parser.expand_file(&cmd.source.file)?;

    let with_origin = opts.verbosity_level() > 0;
    for token in &tokens {
        println!("{}", format_token(token, with_origin));
    }
    Ok(())
}

fn format_token(token: &Token, with_origin: bool) -> String {
    if with_origin {
        format!("{}[{}] {}", token.origin, token.index, token.text)
    } else {
        token.text.clone()
    }
}
