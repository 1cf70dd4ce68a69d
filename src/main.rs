use std::env;

use anyhow::{bail, Result};
use log::debug;
use tokensregex::TokensRegex;

fn main() -> Result<()> {
    env_logger::init();
    let (pattern, input) = parse_args()?;
    let regex = TokensRegex::new(&pattern, "")?;
    debug!("automaton for {:?}:\n{}", pattern, regex.nfa());
    let is_match = regex.exec(&input)?;
    println!("Result is {}", is_match);
    Ok(())
}

fn parse_args() -> Result<(String, String)> {
    let args: Vec<String> = env::args().skip(1).collect();
    match <[String; 2]>::try_from(args) {
        Ok([pattern, input]) => Ok((pattern, input)),
        Err(_) => bail!("usage: tokensregex <pattern> <input>"),
    }
}
