//! `volume retype`: resolve the volume, then ask for a type/zone migration.

use crate::args::ParsedArgs;
use crate::auth::Session;
use crate::error::CliError;
use crate::volumes::{self, Outcome, RetypeRequest};

pub async fn run(session: &Session, args: &ParsedArgs) -> Result<Outcome, CliError> {
    let object_id = args.get_str("object_id").unwrap_or_default();
    let volume_id = volumes::find_volume(session, object_id).await?;
    let request = RetypeRequest {
        new_type: args.get_str("volume_type").map(str::to_string),
        availability_zone: args.get_str("zone").map(str::to_string),
    };
    volumes::retype(session, &volume_id, &request).await
}
