use anyhow::Context;
use async_trait::async_trait;
use sched_core::{Snapshot, SnapshotSource, UniversityId};
use std::path::PathBuf;
use tracing::warn;

/// Reads a university snapshot from a JSON file on every call.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> anyhow::Result<Snapshot> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", self.path.display()))
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn snapshot(&self, university: UniversityId) -> anyhow::Result<Snapshot> {
        let snapshot = self.load().await?;
        if let Some(id) = snapshot.university_id {
            if id != university {
                warn!(
                    requested = %university,
                    file = %id,
                    "snapshot belongs to another university"
                );
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use uuid::Uuid;

    #[tokio::test]
    async fn reads_camel_case_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let lecturer = Uuid::new_v4();
        write!(
            file,
            r#"{{
                "lecturers": [{{"id": "{lecturer}", "name": "Dr. Okafor"}}],
                "lecturerUnavailability": [
                    {{
                        "lecturerId": "{lecturer}",
                        "day": "Friday",
                        "startTime": "13:00",
                        "endTime": "17:00"
                    }}
                ]
            }}"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let snap = source.snapshot(UniversityId(Uuid::nil())).await.unwrap();
        assert_eq!(snap.lecturers.len(), 1);
        assert_eq!(snap.lecturer_unavailability[0].day, "Friday");
        assert!(snap.courses.is_empty());
        assert!(snap.university_id.is_none());
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let source = JsonFileSource::new("/nonexistent/uni.json");
        let err = source.load().await.unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/uni.json"));
    }
}
