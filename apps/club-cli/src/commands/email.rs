//! `club email`: preview of an automatic email. Nothing is sent.

use std::io::Write;

use clap::ValueEnum;

use club_core::template::{equipment_notification, payment_confirmation};

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmailChoice {
    /// Payment confirmation
    Payment,
    /// Equipment complete/incomplete, from the equipment status
    Equipment,
}

pub fn run(
    snapshot: &Snapshot,
    licensee_id: &str,
    choice: EmailChoice,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let licensee = snapshot.licensee(licensee_id)?;
    let templates = &snapshot.email_templates;
    let club = &snapshot.settings.club_info;

    let email = match choice {
        EmailChoice::Payment => {
            let pack = snapshot.pack(&licensee.pack_id)?;
            payment_confirmation(
                templates,
                licensee,
                pack,
                &snapshot.settings.reductions,
                club,
            )?
        }
        EmailChoice::Equipment => equipment_notification(templates, licensee, club)?,
    };

    if json {
        return write_json(out, &email);
    }

    writeln!(out, "Template: {}", email.template)?;
    writeln!(out, "To: {} <{}>", email.recipient_name, email.recipient_email)?;
    writeln!(out, "Subject: {}", email.subject)?;
    writeln!(out)?;
    writeln!(out, "{}", email.body)?;
    Ok(())
}
