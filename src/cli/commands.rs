use std::error::Error;
use std::fs;

use crate::cli::config::ResolvedSettings;
use crate::printer::session::Printer;
use crate::state::state_model::CertificateId;
use crate::trace::logger::TraceLogger;

/// Open a printer handle from resolved settings.
pub fn open_printer(settings: &ResolvedSettings) -> Result<Printer, Box<dyn Error>> {
    let url = settings
        .url
        .as_deref()
        .ok_or("no printer URL: pass --url or set printer.url in the config file")?;

    let mut printer =
        Printer::connect(url, &settings.transport)?.with_settle_policy(settings.settle);
    if let Some(path) = &settings.trace_path {
        printer = printer.with_tracer(TraceLogger::new(path));
    }
    Ok(printer)
}

// ============================================================================
// list / current
// ============================================================================

pub fn cmd_list(printer: &Printer) -> Result<(), Box<dyn Error>> {
    let ids = printer.certificate_ids("list certificates")?;
    for id in ids.iter() {
        println!("{}", id);
    }
    Ok(())
}

pub fn cmd_current(printer: &Printer) -> Result<(), Box<dyn Error>> {
    let id = printer.current_certificate_id()?;
    println!("{}", id);
    Ok(())
}

// ============================================================================
// upload / activate / delete
// ============================================================================

pub fn cmd_upload(
    printer: &Printer,
    key_path: &str,
    cert_path: &str,
    activate: bool,
) -> Result<(), Box<dyn Error>> {
    let key_pem = fs::read(key_path).map_err(|e| format!("reading {}: {}", key_path, e))?;
    let cert_pem = fs::read(cert_path).map_err(|e| format!("reading {}: {}", cert_path, e))?;

    let Some(id) = printer.upload_certificate(&key_pem, &cert_pem)? else {
        eprintln!("Upload accepted, but no new certificate appeared on the printer.");
        if activate {
            return Err("nothing to activate: the new certificate's id is unknown".into());
        }
        return Ok(());
    };

    println!("{}", id);
    if activate {
        printer.activate_certificate(&id)?;
        eprintln!("Certificate {} activated; the printer is restarting.", id);
    }
    Ok(())
}

pub fn cmd_activate(printer: &Printer, id: &str) -> Result<(), Box<dyn Error>> {
    let id = CertificateId::from(id);
    printer.activate_certificate(&id)?;
    eprintln!("Certificate {} activated; the printer is restarting.", id);
    Ok(())
}

pub fn cmd_delete(printer: &Printer, id: &str) -> Result<(), Box<dyn Error>> {
    let id = CertificateId::from(id);
    printer.delete_certificate(&id)?;
    eprintln!("Certificate {} deleted.", id);
    Ok(())
}
