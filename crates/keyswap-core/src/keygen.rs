//! Key-pair generation through an external `ssh-keygen`-style program.
//!
//! The program is invoked as
//! `<program> -t <cipher> -C <comment> -f <folder>/<key_name> -N ""`
//! with its stdio inherited, so prompts and the randomart go straight to
//! the user. Only the exit status is inspected.

use std::ffi::OsString;
use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{KeyswapError, KeyswapResult};
use crate::store::Store;

/// Algorithm used when the cipher prompt is left blank.
pub const DEFAULT_CIPHER: &str = "ed25519";

/// Program invoked to create key pairs.
pub const DEFAULT_KEYGEN_PROGRAM: &str = "ssh-keygen";

/// Exit status of a finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> KeyswapResult<ExitOutcome>;
}

/// Runner that spawns a real process with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> KeyswapResult<ExitOutcome> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| KeyswapError::Keygen(format!("failed to run {program}: {e}")))?;
        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

/// Defaults applied to blank generator answers.
#[derive(Debug, Clone)]
pub struct KeygenDefaults {
    pub cipher: String,
    pub comment: String,
}

impl KeygenDefaults {
    /// The answered cipher, or the default when blank.
    pub fn cipher_or(&self, answer: &str) -> String {
        non_blank(answer).unwrap_or(self.cipher.as_str()).to_string()
    }

    /// The answered comment, or the default when blank.
    pub fn comment_or(&self, answer: &str) -> String {
        non_blank(answer).unwrap_or(self.comment.as_str()).to_string()
    }
}

/// Fully resolved parameters for one key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeygenRequest {
    pub folder_dir: PathBuf,
    pub cipher: String,
    pub key_name: String,
    pub comment: String,
}

impl KeygenRequest {
    /// Build a request from raw answers, filling blanks from `defaults`.
    ///
    /// A blank key name becomes `id_<cipher>` using the resolved cipher.
    pub fn resolve(
        folder_dir: impl Into<PathBuf>,
        cipher: &str,
        key_name: &str,
        comment: &str,
        defaults: &KeygenDefaults,
    ) -> Self {
        let cipher = defaults.cipher_or(cipher);
        let key_name = non_blank(key_name)
            .map(str::to_string)
            .unwrap_or_else(|| default_key_name(&cipher));
        let comment = defaults.comment_or(comment);

        Self {
            folder_dir: folder_dir.into(),
            cipher,
            key_name,
            comment,
        }
    }

    /// Path of the private key that will be written.
    pub fn output_path(&self) -> PathBuf {
        self.folder_dir.join(&self.key_name)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Default key file name for a cipher.
pub fn default_key_name(cipher: &str) -> String {
    format!("id_{cipher}")
}

/// Owner name shown in the default comment.
///
/// This is the last component of the home directory path, not the OS
/// login name; the two differ when the home directory is renamed.
pub fn owner_name(home: &Path) -> String {
    home.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<owner>@<host>`.
pub fn default_comment(home: &Path, host: &str) -> String {
    format!("{}@{}", owner_name(home), host)
}

/// Hostname of this machine.
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}

/// Arguments passed to the key generation program.
pub fn keygen_args(request: &KeygenRequest) -> Vec<OsString> {
    vec![
        "-t".into(),
        request.cipher.clone().into(),
        "-C".into(),
        request.comment.clone().into(),
        "-f".into(),
        request.output_path().into_os_string(),
        "-N".into(),
        OsString::new(),
    ]
}

/// Create the identity folder `name` (mode `0700`) if it is missing.
///
/// Returns the folder path and whether it was created.
pub fn ensure_identity_dir(store: &Store, name: &str) -> KeyswapResult<(PathBuf, bool)> {
    let dir = store.identity_dir(name);
    if dir.exists() {
        return Ok((dir, false));
    }

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(&dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }
    debug!(dir = %dir.display(), "created identity folder");
    Ok((dir, true))
}

/// Key pair generator bound to a program and a process runner.
pub struct Keygen {
    program: String,
    runner: Box<dyn ProcessRunner>,
}

impl Keygen {
    pub fn new(program: impl Into<String>, runner: Box<dyn ProcessRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Generate the key pair described by `request`.
    pub fn generate(&self, request: &KeygenRequest) -> KeyswapResult<()> {
        let args = keygen_args(request);
        debug!(program = %self.program, ?args, "running key generator");

        let outcome = self.runner.run(&self.program, &args)?;
        if !outcome.success() {
            let status = match outcome.code {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            };
            return Err(KeyswapError::Keygen(format!("{} failed: {status}", self.program)));
        }

        info!(
            path = %request.output_path().display(),
            cipher = %request.cipher,
            "generated key pair"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<(String, Vec<OsString>)>>>;

    struct RecordingRunner {
        code: Option<i32>,
        calls: Calls,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[OsString]) -> KeyswapResult<ExitOutcome> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            Ok(ExitOutcome { code: self.code })
        }
    }

    fn defaults() -> KeygenDefaults {
        KeygenDefaults {
            cipher: DEFAULT_CIPHER.to_string(),
            comment: "alice@laptop".to_string(),
        }
    }

    #[test]
    fn blank_answers_use_defaults() {
        let req = KeygenRequest::resolve("/ssh/_work", "", "  ", "", &defaults());
        assert_eq!(req.cipher, "ed25519");
        assert_eq!(req.key_name, "id_ed25519");
        assert_eq!(req.comment, "alice@laptop");
        assert_eq!(req.output_path(), PathBuf::from("/ssh/_work/id_ed25519"));
    }

    #[test]
    fn key_name_follows_chosen_cipher() {
        let req = KeygenRequest::resolve("/ssh/_work", "rsa", "", "me@box", &defaults());
        assert_eq!(req.key_name, "id_rsa");
        assert_eq!(req.comment, "me@box");
    }

    #[test]
    fn comment_uses_home_basename() {
        assert_eq!(owner_name(Path::new("/home/alice")), "alice");
        assert_eq!(
            default_comment(Path::new("/Users/bob"), "mac"),
            "bob@mac"
        );
        assert_eq!(default_comment(Path::new("/"), "h"), "@h");
    }

    #[test]
    fn args_carry_empty_passphrase() {
        let req = KeygenRequest::resolve("/ssh/_w", "rsa", "id_x", "c d", &defaults());
        let args = keygen_args(&req);
        let expected: Vec<OsString> = ["-t", "rsa", "-C", "c d", "-f", "/ssh/_w/id_x", "-N", ""]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn generate_invokes_program() {
        let calls = Calls::default();
        let keygen = Keygen::new(
            "fake-keygen",
            Box::new(RecordingRunner {
                code: Some(0),
                calls: calls.clone(),
            }),
        );
        let req = KeygenRequest::resolve("/ssh/_w", "", "", "", &defaults());
        keygen.generate(&req).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "fake-keygen");
        assert_eq!(calls[0].1[1], OsString::from("ed25519"));
    }

    #[test]
    fn nonzero_exit_is_error() {
        let keygen = Keygen::new(
            "fake-keygen",
            Box::new(RecordingRunner {
                code: Some(1),
                calls: Calls::default(),
            }),
        );
        let req = KeygenRequest::resolve("/ssh/_w", "", "", "", &defaults());
        let err = keygen.generate(&req).unwrap_err();
        assert!(matches!(err, KeyswapError::Keygen(_)));
        assert!(err.to_string().contains("exit status 1"));
    }

    #[test]
    fn missing_program_is_error() {
        let keygen = Keygen::new("keyswap-no-such-program", Box::new(SystemRunner));
        let req = KeygenRequest::resolve("/tmp", "", "", "", &defaults());
        assert!(matches!(
            keygen.generate(&req).unwrap_err(),
            KeyswapError::Keygen(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn identity_dir_created_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());

        let (dir, created) = ensure_identity_dir(&store, "_work").unwrap();
        assert!(created);
        assert_eq!(dir, tmp.path().join("_work"));
        let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);

        let (_, created_again) = ensure_identity_dir(&store, "_work").unwrap();
        assert!(!created_again);
    }
}
