//! CLI commands module.

mod align;
mod config;
mod enroll;
mod identify;
mod list;

pub use align::AlignCommand;
pub use config::ConfigCommand;
pub use enroll::EnrollCommand;
pub use identify::IdentifyCommand;
pub use list::ListCommand;

use speakerid::{Error, SpeakerId};

use crate::output::print_verbose;
use crate::settings::{load_settings, Settings};
use crate::Cli;

/// Loads settings and opens the configured template store.
pub(crate) fn open_speakers(cli: &Cli) -> anyhow::Result<(Settings, SpeakerId)> {
    let settings = load_settings(cli.config.as_deref())?;
    let store = settings.store_path(cli.store.as_deref());
    print_verbose(cli, &format!("Using template store: {}", store.display()));
    let sid = SpeakerId::open(settings.engine.clone(), &store)?;
    Ok((settings, sid))
}

/// Returns an actionable hint for failures the user can fix.
pub fn hint(err: &anyhow::Error) -> Option<String> {
    let err = err.downcast_ref::<Error>()?;
    Some(match err {
        Error::EmptyStore => "no templates are enrolled yet; run `speakerid enroll` first".into(),
        Error::CorruptRecord { index, .. } => format!(
            "template store is damaged at record {index}; restore it from a backup \
             or remove the records from that point on"
        ),
        Error::DimensionMismatch { expected, got } => format!(
            "feature frames have {got} components but the store expects {expected}; \
             check the feature extractor or `speakerid config set dim`"
        ),
        Error::EmptySequence => "the feature file contains no frames".into(),
        Error::InvalidLabel(_) => "labels must be non-empty and fit on one line".into(),
        Error::Io(_) => "check that the template store path is readable and writable".into(),
        Error::Cancelled => "identification was interrupted".into(),
        _ => return None,
    })
}
