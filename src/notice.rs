//! Purpose: Describe non-fatal batch outcomes as structured stderr notices.
//! Exports: `NoticeKind`, `Notice`, `notice_json`.
//! Role: Maps a `batch::FileReport` to the notice the CLI prints for it, if any.
//! Invariants: Only skipped files and skipped JSON values produce notices.
//! Invariants: Wire shape is `{"notice":{kind,time,cmd,path,message,details}}`.
use std::path::PathBuf;

use serde_json::{Map, Value, json};

use crate::batch::{FileOutcome, FileReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// Target already existed and `--overwrite` was not given.
    SkippedExisting { target: PathBuf },
    /// `.lang` source of 8 bytes or fewer; nothing was written.
    SkippedPartial,
    /// File converted, but some non-string JSON values were left out.
    SkippedValues { count: usize },
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::SkippedExisting { .. } => "skipped_existing",
            NoticeKind::SkippedPartial => "skipped_partial",
            NoticeKind::SkippedValues { .. } => "skipped_values",
        }
    }

    pub fn message(&self) -> String {
        match self {
            NoticeKind::SkippedExisting { .. } => {
                "target exists; pass --overwrite to replace it".to_string()
            }
            NoticeKind::SkippedPartial => "file holds no records; no output written".to_string(),
            NoticeKind::SkippedValues { count } => {
                format!("{count} non-string JSON values were left out")
            }
        }
    }

    fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            NoticeKind::SkippedExisting { target } => {
                details.insert("target".to_string(), json!(target.display().to_string()));
            }
            NoticeKind::SkippedPartial => {}
            NoticeKind::SkippedValues { count } => {
                details.insert("skipped_values".to_string(), json!(count));
            }
        }
        details
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub time: String,
    pub cmd: String,
    pub source: PathBuf,
}

impl Notice {
    /// Returns the notice for one batch file, or `None` when its outcome needs none.
    ///
    /// Failures are not notices; the CLI reports them as errors.
    pub fn for_file(cmd: &str, file: &FileReport, time: String) -> Option<Self> {
        let kind = match &file.outcome {
            FileOutcome::SkippedExisting { target } => NoticeKind::SkippedExisting {
                target: target.clone(),
            },
            FileOutcome::SkippedPartial => NoticeKind::SkippedPartial,
            FileOutcome::Converted { skipped_values, .. } if *skipped_values > 0 => {
                NoticeKind::SkippedValues {
                    count: *skipped_values,
                }
            }
            FileOutcome::Converted { .. } | FileOutcome::Failed(_) => return None,
        };
        Some(Self {
            kind,
            time,
            cmd: cmd.to_string(),
            source: file.source.clone(),
        })
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    json!({
        "notice": {
            "kind": notice.kind.as_str(),
            "time": notice.time,
            "cmd": notice.cmd,
            "path": notice.source.display().to_string(),
            "message": notice.message(),
            "details": Value::Object(notice.kind.details()),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Notice, NoticeKind, notice_json};
    use crate::batch::{FileOutcome, FileReport};
    use crate::core::error::{Error, ErrorKind};

    const TIME: &str = "2026-02-01T00:00:00Z";

    fn report(outcome: FileOutcome) -> FileReport {
        FileReport {
            source: PathBuf::from("/data/en.lang"),
            outcome,
        }
    }

    fn notice_for(outcome: FileOutcome) -> Option<Notice> {
        Notice::for_file("to-json", &report(outcome), TIME.to_string())
    }

    #[test]
    fn existing_target_maps_to_skipped_existing() {
        let notice = notice_for(FileOutcome::SkippedExisting {
            target: PathBuf::from("/data/en.json"),
        })
        .expect("notice");
        assert_eq!(notice.kind.as_str(), "skipped_existing");

        let value = notice_json(&notice);
        let obj = value["notice"].as_object().expect("notice object");
        assert_eq!(obj["kind"], "skipped_existing");
        assert_eq!(obj["time"], TIME);
        assert_eq!(obj["cmd"], "to-json");
        assert_eq!(obj["path"], "/data/en.lang");
        assert_eq!(obj["details"]["target"], "/data/en.json");
        assert!(obj["message"].as_str().expect("message").contains("--overwrite"));
    }

    #[test]
    fn partial_file_maps_to_skipped_partial_without_details() {
        let notice = notice_for(FileOutcome::SkippedPartial).expect("notice");
        assert_eq!(notice.kind, NoticeKind::SkippedPartial);
        let value = notice_json(&notice);
        assert_eq!(value["notice"]["kind"], "skipped_partial");
        assert!(value["notice"]["details"].as_object().expect("details").is_empty());
    }

    #[test]
    fn skipped_values_are_counted() {
        let notice = notice_for(FileOutcome::Converted {
            target: PathBuf::from("/data/en.lang"),
            entries: 4,
            skipped_values: 3,
        })
        .expect("notice");
        assert_eq!(notice.kind, NoticeKind::SkippedValues { count: 3 });
        assert_eq!(notice.message(), "3 non-string JSON values were left out");
        assert_eq!(notice_json(&notice)["notice"]["details"]["skipped_values"], 3);
    }

    #[test]
    fn clean_conversions_and_failures_have_no_notice() {
        let clean = FileOutcome::Converted {
            target: PathBuf::from("/data/en.json"),
            entries: 2,
            skipped_values: 0,
        };
        assert!(notice_for(clean).is_none());
        assert!(notice_for(FileOutcome::Failed(Error::new(ErrorKind::Io))).is_none());
    }
}
