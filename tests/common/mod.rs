#![allow(dead_code)]

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use skraper_encoder::adapters::FsLocalAdapter;
use skraper_encoder::domain::model::{EncodeJob, EncodeReport, OutputMode, Resolution, TEMP_MARKER};
use skraper_encoder::ports::{EncodePort, FsPort, LogPort};
use skraper_encoder::{ConversionRequest, DomainError};

/// Bytes appended to a copied input to mark it as encoded
pub const ENCODED_TAG: &[u8] = b"|encoded";

/// How the scripted encoder reacts to a job
#[derive(Debug, Clone)]
pub enum EncoderScript {
    /// Copy input to output and tag it
    Succeed,
    /// Leave a partial output behind and exit non-zero for these file names
    FailFor(HashSet<String>),
    /// Never found on this machine
    Missing,
    /// Found, but gone after this many successful encodes
    VanishAfter(usize),
}

/// In-process stand-in for the ffmpeg adapter
pub struct ScriptedEncoder {
    script: EncoderScript,
    gate: Option<Arc<Semaphore>>,
    encodes: AtomicUsize,
    jobs: Mutex<Vec<EncodeJob>>,
}

impl ScriptedEncoder {
    pub fn new(script: EncoderScript) -> Self {
        Self {
            script,
            gate: None,
            encodes: AtomicUsize::new(0),
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(EncoderScript::Succeed)
    }

    pub fn failing_for(names: &[&str]) -> Self {
        Self::new(EncoderScript::FailFor(
            names.iter().map(|name| name.to_string()).collect(),
        ))
    }

    pub fn failing_all() -> Self {
        Self::failing_for(&[
            "a.mp4", "b.avi", "c.mov", "d.mkv", "e.flv", "f.wmv", "clip.mp4",
        ])
    }

    /// Every encode waits for a permit on `gate` before running
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::succeeding()
        }
    }

    pub fn jobs(&self) -> Vec<EncodeJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncodePort for ScriptedEncoder {
    async fn locate_encoder(&self) -> Result<PathBuf, DomainError> {
        match self.script {
            EncoderScript::Missing => Err(DomainError::ToolNotFound("ffmpeg".to_string())),
            _ => Ok(PathBuf::from("/usr/bin/ffmpeg")),
        }
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeReport, DomainError> {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate closed")
                .forget();
        }
        self.jobs.lock().unwrap().push(job.clone());

        let input_name = job
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match &self.script {
            EncoderScript::Missing => {
                return Err(DomainError::ToolNotFound("ffmpeg".to_string()));
            }
            EncoderScript::VanishAfter(limit) if self.encodes.load(Ordering::SeqCst) >= *limit => {
                return Err(DomainError::ToolNotFound(
                    job.program.display().to_string(),
                ));
            }
            EncoderScript::FailFor(names) if names.contains(&input_name) => {
                fs::write(&job.output, b"partial").unwrap();
                return Ok(EncodeReport {
                    exit_code: Some(1),
                    stderr: format!("{}: Invalid data found when processing input\n", input_name),
                    elapsed: Duration::from_millis(5),
                });
            }
            _ => {}
        }

        let mut data = fs::read(&job.input).unwrap();
        data.extend_from_slice(ENCODED_TAG);
        fs::write(&job.output, data).unwrap();
        self.encodes.fetch_add(1, Ordering::SeqCst);

        Ok(EncodeReport {
            exit_code: Some(0),
            stderr: String::new(),
            elapsed: Duration::from_millis(5),
        })
    }
}

/// Local file system that refuses to delete original videos
pub struct UndeletableSourcesFs {
    inner: FsLocalAdapter,
}

impl UndeletableSourcesFs {
    pub fn new() -> Self {
        Self {
            inner: FsLocalAdapter::new(),
        }
    }
}

#[async_trait]
impl FsPort for UndeletableSourcesFs {
    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError> {
        self.inner.directory_exists(dir_path).await
    }

    async fn list_file_names(&self, dir_path: &Path) -> Result<Vec<OsString>, DomainError> {
        self.inner.list_file_names(dir_path).await
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        self.inner.create_directory(dir_path).await
    }

    async fn create_temp_file(
        &self,
        dir_path: &Path,
        prefix: &OsStr,
        suffix: &OsStr,
    ) -> Result<PathBuf, DomainError> {
        self.inner.create_temp_file(dir_path, prefix, suffix).await
    }

    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        self.inner.file_exists(file_path).await
    }

    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        let is_temp = file_path
            .file_name()
            .map(|name| name.to_string_lossy().contains(TEMP_MARKER))
            .unwrap_or(false);
        if is_temp {
            self.inner.delete_file(file_path).await
        } else {
            Err(DomainError::FsFail(format!(
                "Permission denied: {}",
                file_path.display()
            )))
        }
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        self.inner.move_file(from, to).await
    }
}

/// Log sink collecting lines in memory
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

#[async_trait]
impl LogPort for MemoryLog {
    async fn append(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Write `name` with recognizable contents and return its contents
pub fn write_video(dir: &Path, name: &str) -> Vec<u8> {
    let data = format!("original:{}", name).into_bytes();
    fs::write(dir.join(name), &data).unwrap();
    data
}

/// Names of all entries directly inside `dir`, sorted
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn has_temp_artifacts(dir: &Path) -> bool {
    entries(dir).iter().any(|name| name.contains(TEMP_MARKER))
}

pub fn encoded(original: &[u8]) -> Vec<u8> {
    let mut data = original.to_vec();
    data.extend_from_slice(ENCODED_TAG);
    data
}

pub fn request(dir: &Path, mode: OutputMode) -> ConversionRequest {
    ConversionRequest::new(dir, Resolution::new(320, 240).unwrap(), true, 15, mode)
}

/// Shell script that behaves like a tiny ffmpeg: copies `-i` input to the last argument
#[cfg(unix)]
pub fn write_stub_encoder(dir: &Path, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let body = if exit_code == 0 {
        "cp \"$input\" \"$output\" && printf '|encoded' >> \"$output\"\n".to_string()
    } else {
        format!(
            "printf 'partial' > \"$output\"\necho \"Conversion failed for $input\" >&2\nexit {}\n",
            exit_code
        )
    };
    let script = format!(
        "#!/bin/sh\ninput=\"\"\nprev=\"\"\nfor arg in \"$@\"; do\n  if [ \"$prev\" = \"-i\" ]; then input=\"$arg\"; fi\n  prev=\"$arg\"\n  output=\"$arg\"\ndone\n{}",
        body
    );

    let path = dir.join("ffmpeg");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
