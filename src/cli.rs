//! Terminal front-end: a line-oriented REPL over the onboarding wizard.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::draft::{DocumentSlot, Field, UploadFile};
use crate::error::{Error, Result};
use crate::support;
use crate::validation::format_file_size;
use crate::wizard::{WizardController, WizardStatus};

pub const HELP: &str = "\
Commands:
  set <field> <value>        update a field (e.g. set fullName Asha Rao)
  attach <slot> <path>       upload a file (slots: profilePhoto, panCard, aadharFront,
                             aadharBack, cancelledCheque, gstCertificate, other)
  detach <slot>              clear a document slot
  remove-other <n>           drop the n-th other document (1-based)
  send-otp                   send or resend the email verification code
  verify-otp <code>          verify the 6-digit code
  banks                      list bank names
  next | back                move between steps
  status                     show the current step, draft and errors
  submit                     submit from the preview step
  dismiss                    hide the submission error banner
  reset                      discard the draft and start over
  support                    show support contacts
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: Field, value: String },
    /// `slot == None` appends to the other-documents list.
    Attach { slot: Option<DocumentSlot>, path: PathBuf },
    Detach(DocumentSlot),
    RemoveOther(usize),
    SendOtp,
    VerifyOtp(String),
    Banks,
    Next,
    Back,
    Status,
    Submit,
    Dismiss,
    Reset,
    Support,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Command::Set {
                    field: field.parse()?,
                    value: value.trim().to_string(),
                }
            }
            "attach" => {
                let (slot, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("usage: attach <slot> <path>")?;
                let slot = if slot.eq_ignore_ascii_case("other") {
                    None
                } else {
                    Some(parse_slot(slot)?)
                };
                Command::Attach {
                    slot,
                    path: PathBuf::from(path.trim()),
                }
            }
            "detach" => Command::Detach(parse_slot(rest)?),
            "remove-other" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| "usage: remove-other <n>".to_string())?;
                if n == 0 {
                    return Err("documents are numbered from 1".to_string());
                }
                Command::RemoveOther(n - 1)
            }
            "send-otp" => Command::SendOtp,
            "verify-otp" => {
                if rest.is_empty() {
                    return Err("usage: verify-otp <code>".to_string());
                }
                Command::VerifyOtp(rest.to_string())
            }
            "banks" => Command::Banks,
            "next" | "continue" => Command::Next,
            "back" => Command::Back,
            "status" => Command::Status,
            "submit" => Command::Submit,
            "dismiss" => Command::Dismiss,
            "reset" => Command::Reset,
            "support" => Command::Support,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(command)
    }
}

fn parse_slot(raw: &str) -> std::result::Result<DocumentSlot, String> {
    DocumentSlot::from_key(raw.trim()).ok_or_else(|| format!("unknown document slot: {raw}"))
}

/// MIME type a browser would report for the file's extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Read a file from disk the way the file picker would hand it over.
pub async fn read_upload(path: &Path) -> Result<UploadFile> {
    let content = tokio::fs::read(path).await.map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    Ok(UploadFile::new(name, mime_from_path(path), content))
}

/// Run one command and return the text to print.
pub async fn execute(controller: &mut WizardController, command: Command) -> Result<String> {
    let output = match command {
        Command::Set { field, value } => {
            controller.set_field(field, &value)?;
            controller.blur(field);
            match controller.field_error(field) {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field} = {}", controller.draft().get(field)),
            }
        }
        Command::Attach { slot, path } => {
            let file = read_upload(&path).await?;
            let summary = format!("{} ({})", file.name, format_file_size(file.size()));
            match slot {
                Some(slot) => {
                    controller.attach(slot, file)?;
                    format!("{}: {summary}", slot.label())
                }
                None => {
                    controller.attach_other(file)?;
                    format!("Other document: {summary}")
                }
            }
        }
        Command::Detach(slot) => match controller.detach(slot)? {
            Some(file) => format!("Removed {} from {}", file.name, slot.label()),
            None => format!("{} was empty", slot.label()),
        },
        Command::RemoveOther(index) => {
            let file = controller.remove_other(index)?;
            format!("Removed {}", file.name)
        }
        Command::SendOtp => {
            controller.send_otp().await?;
            controller.otp().message().unwrap_or("Code sent").to_string()
        }
        Command::VerifyOtp(code) => {
            controller.verify_otp(&code).await?;
            "Email verified".to_string()
        }
        Command::Banks => controller.load_banks().await?.join("\n"),
        Command::Next => {
            let step = controller.advance()?;
            format!("Now on {step}")
        }
        Command::Back => {
            let step = controller.retreat()?;
            format!("Now on {step}")
        }
        Command::Status => render_status(controller),
        Command::Submit => {
            let id = controller.submit().await?;
            format!("Registration submitted. Partner id: {id}")
        }
        Command::Dismiss => {
            controller.dismiss_banner();
            String::new()
        }
        Command::Reset => {
            controller.reset();
            "Draft discarded".to_string()
        }
        Command::Support => support::directory()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(output)
}

/// Current step, its fields and any visible messages.
pub fn render_status(controller: &WizardController) -> String {
    let mut out = String::new();

    if let WizardStatus::Success { partner_id } = controller.status() {
        let _ = writeln!(out, "Registration complete. Partner id: {partner_id}");
        return out;
    }

    let step = controller.step();
    let _ = writeln!(out, "Step: {step}");
    if let Some(banner) = controller.banner() {
        let _ = writeln!(out, "! {banner}");
    }

    let draft = controller.draft();
    for field in step.fields() {
        let _ = writeln!(out, "  {:<24} {}", field.name(), draft.get(field));
    }
    if step == crate::wizard::WizardStep::BasicInfo {
        let _ = writeln!(out, "  {:<24} {}", "otp", controller.otp_state());
    }
    if step == crate::wizard::WizardStep::Documents {
        for slot in DocumentSlot::ALL {
            let value = draft
                .documents
                .get(*slot)
                .map(|f| format!("{} ({})", f.name, format_file_size(f.size())))
                .unwrap_or_default();
            let _ = writeln!(out, "  {:<24} {value}", slot.key());
        }
        for (i, file) in draft.documents.others().iter().enumerate() {
            let _ = writeln!(out, "  other #{:<17} {}", i + 1, file.name);
        }
    }

    for (key, msg) in controller.visible_errors() {
        let _ = writeln!(out, "  ✗ {key}: {msg}");
    }
    let _ = write!(
        out,
        "Continue: {}",
        if controller.can_advance() { "enabled" } else { "disabled" }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_set_keeps_spaces_in_value() {
        let cmd: Command = "set fullName  Asha K. Rao ".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                field: Field::FullName,
                value: "Asha K. Rao".into()
            }
        );
    }

    #[test]
    fn parse_set_empty_value_clears() {
        let cmd: Command = "set landmark".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                field: Field::Landmark,
                value: String::new()
            }
        );
    }

    #[test]
    fn parse_attach() {
        let cmd: Command = "attach panCard /tmp/pan.png".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Attach {
                slot: Some(DocumentSlot::PanCard),
                path: PathBuf::from("/tmp/pan.png")
            }
        );
        let cmd: Command = "attach other ./extra.pdf".parse().unwrap();
        assert!(matches!(cmd, Command::Attach { slot: None, .. }));
        assert!("attach selfie x.png".parse::<Command>().is_err());
        assert!("attach panCard".parse::<Command>().is_err());
    }

    #[test]
    fn parse_misc() {
        assert_eq!("NEXT".parse::<Command>(), Ok(Command::Next));
        assert_eq!("remove-other 2".parse::<Command>(), Ok(Command::RemoveOther(1)));
        assert!("remove-other 0".parse::<Command>().is_err());
        assert!("verify-otp".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("set nickname x".parse::<Command>().is_err());
    }

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_from_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_from_path(Path::new("a")), "application/octet-stream");
    }

    #[tokio::test]
    async fn read_upload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheque.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = read_upload(&path).await.unwrap();
        assert_eq!(file.name, "cheque.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size(), 8);

        let err = read_upload(&dir.path().join("missing.png")).await.unwrap_err();
        assert!(matches!(err, Error::File { .. }));
    }
}
