//! `pkg_scripts=` maintenance in rc.conf.local
//!
//! The startup configuration holds one line of interest:
//!
//! ```text
//! pkg_scripts=postgresql adguard
//! ```
//!
//! Every operation reopens and rescans the file. There is no file locking;
//! callers serialize edits themselves.
//!
//! Names are separated by any blanks, as the shell splits them. Only the first
//! `pkg_scripts=` assignment is edited; later ones, which override it at boot,
//! are reported with a warning and left alone. A matched line that is not
//! valid UTF-8 is refused rather than rewritten.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Default location of the local startup configuration
pub const RC_CONF_LOCAL: &str = "/etc/rc.conf.local";

/// Marker of the line listing auto-started package scripts
pub const PKG_SCRIPTS_PREFIX: &str = "pkg_scripts=";

#[derive(Debug, thiserror::Error)]
pub enum RcConfError {
    #[error("expected {} to be a file but it's a directory", .0.display())]
    IsDirectory(PathBuf),

    #[error("opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("pkg_scripts= line at byte {offset} of {} is not valid UTF-8", .path.display())]
    NotUtf8 { path: PathBuf, offset: u64 },
}

/// Result of scanning the file for the `pkg_scripts=` line
#[derive(Debug, PartialEq, Eq)]
enum Scan {
    /// Nothing but blank lines
    Empty { ends_with_newline: bool },
    /// Content, but no matching line
    Missing { ends_with_newline: bool },
    Found(Match),
}

#[derive(Debug, PartialEq, Eq)]
struct Match {
    /// Byte offset of the line start
    start: u64,
    /// Byte offset just past the line terminator
    end: u64,
    /// The line with surrounding whitespace trimmed
    line: String,
}

impl Match {
    fn names(&self) -> Vec<&str> {
        self.line[PKG_SCRIPTS_PREFIX.len()..].split_whitespace().collect()
    }

    fn list_is_empty(&self) -> bool {
        self.line[PKG_SCRIPTS_PREFIX.len()..].trim().is_empty()
    }
}

/// The ordered set of service names started at boot
#[derive(Debug, Clone)]
pub struct StartupList {
    path: PathBuf,
}

impl StartupList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register `name`, appending it to the end of the list
    ///
    /// Returns `false` without writing when the name is already listed.
    pub fn add(&self, name: &str) -> Result<bool, RcConfError> {
        let mut file = self.open_rw()?;
        let found = scan(&file, &self.path)?;

        match found {
            Scan::Found(m) => {
                if m.names().contains(&name) {
                    log::debug!("{} already lists {}", self.path.display(), name);
                    return Ok(false);
                }

                let mut line = m.line.clone();
                if !m.list_is_empty() {
                    line.push(' ');
                }
                line.push_str(name);
                line.push('\n');

                self.replace_line(&mut file, &m, &line)?;
            }
            Scan::Empty { ends_with_newline } | Scan::Missing { ends_with_newline } => {
                let mut line = String::new();
                if !ends_with_newline {
                    line.push('\n');
                }
                line.push_str(PKG_SCRIPTS_PREFIX);
                line.push_str(name);
                line.push('\n');

                self.append(&mut file, &line)?;
            }
        }

        log::debug!("added {} to {}", name, self.path.display());
        Ok(true)
    }

    /// Drop every occurrence of `name`, keeping the order of the others
    ///
    /// Returns `false` without writing when the name is not listed.
    pub fn remove(&self, name: &str) -> Result<bool, RcConfError> {
        let mut file = self.open_rw()?;
        let Scan::Found(m) = scan(&file, &self.path)? else {
            return Ok(false);
        };

        let names = m.names();
        if !names.contains(&name) {
            return Ok(false);
        }

        let kept: Vec<&str> = names.into_iter().filter(|n| *n != name).collect();
        let line = format!("{}{}\n", PKG_SCRIPTS_PREFIX, kept.join(" "));
        self.replace_line(&mut file, &m, &line)?;

        log::debug!("removed {} from {}", name, self.path.display());
        Ok(true)
    }

    /// Names currently listed, empty if the file or line does not exist
    pub fn names(&self) -> Result<Vec<String>, RcConfError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RcConfError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match scan(&file, &self.path)? {
            Scan::Found(m) => Ok(m.names().into_iter().map(String::from).collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn contains(&self, name: &str) -> Result<bool, RcConfError> {
        Ok(self.names()?.iter().any(|n| n == name))
    }

    fn open_rw(&self) -> Result<File, RcConfError> {
        if self.path.is_dir() {
            return Err(RcConfError::IsDirectory(self.path.clone()));
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .mode(0o644)
            .open(&self.path)
            .map_err(|source| RcConfError::Open {
                path: self.path.clone(),
                source,
            })
    }

    /// Overwrite the matched line, carrying the rest of the file after it
    fn replace_line(&self, file: &mut File, m: &Match, line: &str) -> Result<(), RcConfError> {
        let mut tail = Vec::new();
        file.seek(SeekFrom::Start(m.end))
            .and_then(|_| file.read_to_end(&mut tail))
            .map_err(|source| self.read_err(source))?;

        let len = m.start + line.len() as u64 + tail.len() as u64;
        file.seek(SeekFrom::Start(m.start))
            .and_then(|_| file.write_all(line.as_bytes()))
            .and_then(|_| file.write_all(&tail))
            .and_then(|_| file.set_len(len))
            .and_then(|_| file.sync_all())
            .map_err(|source| self.write_err(source))
    }

    fn append(&self, file: &mut File, text: &str) -> Result<(), RcConfError> {
        file.seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(text.as_bytes()))
            .and_then(|_| file.sync_all())
            .map_err(|source| self.write_err(source))
    }

    fn read_err(&self, source: io::Error) -> RcConfError {
        RcConfError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_err(&self, source: io::Error) -> RcConfError {
        RcConfError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for StartupList {
    fn default() -> Self {
        Self::new(RC_CONF_LOCAL)
    }
}

/// Single pass over the file, keeping the first `pkg_scripts=` line
fn scan(file: &File, path: &Path) -> Result<Scan, RcConfError> {
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut offset = 0u64;
    let mut has_content = false;
    let mut ends_with_newline = true;
    let mut found = None;

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| RcConfError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if n == 0 {
            break;
        }

        let start = offset;
        offset += n as u64;
        ends_with_newline = buf.ends_with(b"\n");

        let line = trim_blanks(&buf);
        if line.is_empty() {
            continue;
        }
        has_content = true;

        if !line.starts_with(PKG_SCRIPTS_PREFIX.as_bytes()) {
            continue;
        }
        if found.is_some() {
            log::warn!(
                "{} assigns {} again at byte {}; only the first assignment is edited",
                path.display(),
                PKG_SCRIPTS_PREFIX,
                start
            );
            continue;
        }

        let line = String::from_utf8(line.to_vec()).map_err(|_| RcConfError::NotUtf8 {
            path: path.to_path_buf(),
            offset: start,
        })?;
        found = Some(Match {
            start,
            end: offset,
            line,
        });
    }

    if let Some(m) = found {
        Ok(Scan::Found(m))
    } else if has_content {
        Ok(Scan::Missing { ends_with_newline })
    } else {
        Ok(Scan::Empty { ends_with_newline })
    }
}

fn trim_blanks(bytes: &[u8]) -> &[u8] {
    let Some(first) = bytes.iter().position(|b| !b.is_ascii_whitespace()) else {
        return &[];
    };
    let last = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .unwrap_or(first);
    &bytes[first..=last]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(content: &str) -> (tempfile::TempDir, StartupList) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rc.conf.local");
        std::fs::write(&path, content).unwrap();
        (dir, StartupList::new(path))
    }

    fn read(list: &StartupList) -> String {
        std::fs::read_to_string(list.path()).unwrap()
    }

    #[test]
    fn test_add_to_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = StartupList::new(dir.path().join("rc.conf.local"));

        assert!(list.add("adguard").unwrap());
        assert_eq!(read(&list), "pkg_scripts=adguard\n");

        let mode = std::fs::metadata(list.path()).unwrap().permissions();
        use std::os::unix::fs::PermissionsExt;
        assert_eq!(mode.mode() & 0o022, 0);
    }

    #[test]
    fn test_add_to_empty_file() {
        let (_dir, list) = list_with("");
        assert!(list.add("adguard").unwrap());
        assert_eq!(read(&list), "pkg_scripts=adguard\n");
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_dir, list) = list_with("");
        assert!(list.add("adguard").unwrap());
        assert!(!list.add("adguard").unwrap());
        assert_eq!(read(&list), "pkg_scripts=adguard\n");
    }

    #[test]
    fn test_add_preserves_order() {
        let (_dir, list) = list_with("pkg_scripts=a b\n");
        assert!(list.add("c").unwrap());
        assert_eq!(read(&list), "pkg_scripts=a b c\n");
        assert_eq!(list.names().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_to_empty_list() {
        let (_dir, list) = list_with("pkg_scripts=\n");
        assert!(list.add("adguard").unwrap());
        assert_eq!(read(&list), "pkg_scripts=adguard\n");
    }

    #[test]
    fn test_add_keeps_following_lines() {
        let (_dir, list) = list_with("ntpd_flags=\npkg_scripts=a\nhttpd_flags=\n");
        assert!(list.add("b").unwrap());
        assert_eq!(read(&list), "ntpd_flags=\npkg_scripts=a b\nhttpd_flags=\n");
    }

    #[test]
    fn test_add_matches_indented_line() {
        let (_dir, list) = list_with("\n   pkg_scripts=a   \n");
        assert!(!list.add("a").unwrap());
        assert!(list.add("b").unwrap());
        assert_eq!(read(&list), "\npkg_scripts=a b\n");
    }

    #[test]
    fn test_add_when_line_missing() {
        let (_dir, list) = list_with("ntpd_flags=\n");
        assert!(list.add("adguard").unwrap());
        assert_eq!(read(&list), "ntpd_flags=\npkg_scripts=adguard\n");
    }

    #[test]
    fn test_add_when_last_line_unterminated() {
        let (_dir, list) = list_with("ntpd_flags=");
        assert!(list.add("adguard").unwrap());
        assert_eq!(read(&list), "ntpd_flags=\npkg_scripts=adguard\n");

        let (_dir, list) = list_with("pkg_scripts=a");
        assert!(list.add("b").unwrap());
        assert_eq!(read(&list), "pkg_scripts=a b\n");
    }

    #[test]
    fn test_add_does_not_match_substring() {
        let (_dir, list) = list_with("pkg_scripts=adguardhome\n");
        assert!(list.add("adguard").unwrap());
        assert_eq!(list.names().unwrap(), vec!["adguardhome", "adguard"]);
    }

    #[test]
    fn test_add_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let list = StartupList::new(dir.path());
        assert!(matches!(list.add("a"), Err(RcConfError::IsDirectory(_))));
    }

    #[test]
    fn test_remove() {
        let (_dir, list) = list_with("# local\npkg_scripts=a b c\nntpd_flags=\n");
        assert!(list.remove("b").unwrap());
        assert_eq!(read(&list), "# local\npkg_scripts=a c\nntpd_flags=\n");

        assert!(!list.remove("b").unwrap());
        assert!(list.remove("a").unwrap());
        assert!(list.remove("c").unwrap());
        assert_eq!(read(&list), "# local\npkg_scripts=\nntpd_flags=\n");
        assert!(list.names().unwrap().is_empty());
    }

    #[test]
    fn test_add_tab_separated_list() {
        let (_dir, list) = list_with("pkg_scripts=a\tb\n");
        assert!(!list.add("b").unwrap());
        assert_eq!(read(&list), "pkg_scripts=a\tb\n");

        assert!(list.add("c").unwrap());
        assert_eq!(read(&list), "pkg_scripts=a\tb c\n");
        assert_eq!(list.names().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_tab_separated_list() {
        let (_dir, list) = list_with("pkg_scripts=a\t\tb  c\n");
        assert!(list.remove("b").unwrap());
        assert_eq!(read(&list), "pkg_scripts=a c\n");
    }

    #[test]
    fn test_add_refuses_non_utf8_line() {
        let (_dir, list) = list_with("");
        std::fs::write(list.path(), b"ntpd_flags=\npkg_scripts=caf\xe9\n").unwrap();

        let err = list.add("x").unwrap_err();
        assert!(matches!(err, RcConfError::NotUtf8 { offset: 12, .. }));
        assert!(matches!(list.remove("x"), Err(RcConfError::NotUtf8 { .. })));
        assert_eq!(
            std::fs::read(list.path()).unwrap(),
            b"ntpd_flags=\npkg_scripts=caf\xe9\n"
        );
    }

    #[test]
    fn test_add_keeps_non_utf8_bytes_elsewhere() {
        let (_dir, list) = list_with("");
        std::fs::write(list.path(), b"# caf\xe9\npkg_scripts=a\n# \xff\n").unwrap();

        assert!(list.add("b").unwrap());
        assert_eq!(
            std::fs::read(list.path()).unwrap(),
            b"# caf\xe9\npkg_scripts=a b\n# \xff\n"
        );
    }

    #[test]
    fn test_add_edits_first_of_repeated_lines() {
        let (_dir, list) = list_with("pkg_scripts=a\npkg_scripts=b\n");
        assert!(list.add("c").unwrap());
        assert_eq!(read(&list), "pkg_scripts=a c\npkg_scripts=b\n");
        assert_eq!(list.names().unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_without_line() {
        let (_dir, list) = list_with("ntpd_flags=\n");
        assert!(!list.remove("a").unwrap());
        assert_eq!(read(&list), "ntpd_flags=\n");
    }

    #[test]
    fn test_names_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = StartupList::new(dir.path().join("absent"));
        assert!(list.names().unwrap().is_empty());
        assert!(!list.contains("a").unwrap());
        assert!(!list.path().exists());
    }

    #[test]
    fn test_scan_outcomes() {
        let (_dir, list) = list_with("\n  \n");
        let file = File::open(list.path()).unwrap();
        assert_eq!(scan(&file, list.path()).unwrap(), Scan::Empty { ends_with_newline: true });

        let (_dir, list) = list_with("a=b");
        let file = File::open(list.path()).unwrap();
        assert_eq!(scan(&file, list.path()).unwrap(), Scan::Missing { ends_with_newline: false });

        let (_dir, list) = list_with("a=b\npkg_scripts=x\n");
        let file = File::open(list.path()).unwrap();
        assert_eq!(
            scan(&file, list.path()).unwrap(),
            Scan::Found(Match {
                start: 4,
                end: 18,
                line: "pkg_scripts=x".to_string(),
            })
        );
    }
}
