//! Command grammar and dispatch.

use crate::args::{ArgSpec, Cast, CmdlineParser};
use crate::auth::Session;
use crate::error::CliError;
use crate::volumes::Outcome;

pub mod retype;

/// The full command-line grammar: modifier options plus the
/// `<service> <action> <object-id>` positional triple.
fn grammar() -> CmdlineParser {
    CmdlineParser::new()
        .named(ArgSpec::new("volume_type").alias("--type").alias("--volume_type"))
        .named(ArgSpec::new("zone").alias("--availability_zone").alias("--zone"))
        .named(ArgSpec::new("size").alias("--size_gb").alias("--size").cast(Cast::Int))
        .positional(ArgSpec::new("service"))
        .positional(ArgSpec::new("action"))
        .positional(ArgSpec::new("object_id"))
}

/// Parse raw tokens and route to the matching handler.
///
/// Adding a command means adding a route arm; everything else is data.
pub async fn dispatch(session: &Session, argv: &[String]) -> Result<Outcome, CliError> {
    let args = grammar().parse(argv)?;
    let service = args.get_str("service").unwrap_or_default();
    let action = args.get_str("action").unwrap_or_default();
    match (service, action) {
        ("volume", "retype") => retype::run(session, &args).await,
        _ => Err(CliError::UnknownCommand),
    }
}

/// Fixed usage banner, printed after any terminal error.
pub fn usage() {
    println!();
    println!("Usage:");
    println!();
    println!("vkc volume retype <volume-id> [ --type <new_type> ] [ --zone <new_zone> ]");
    println!();
}
