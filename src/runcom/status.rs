//! Translation of `rc.d/<name> check` output

use crate::error::ErrorKind;
use crate::service::Status;

/// Map the stdout of a status check to a [`Status`]
///
/// rc.subr prints exactly `<name>(ok)` or `<name>(failed)`. Anything else
/// means the script is not a working registration of this service, reported
/// as [`ErrorKind::NotInstalled`] with the status left [`Status::Unknown`].
pub fn translate(output: &str, name: &str) -> Result<Status, ErrorKind> {
    match output.strip_prefix(name) {
        Some("(ok)\n") => Ok(Status::Running),
        Some("(failed)\n") => Ok(Status::Stopped),
        _ => Err(ErrorKind::NotInstalled),
    }
}
