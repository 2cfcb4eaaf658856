use crate::core::http::{validate_url, HttpClient};
use crate::core::resolver::ReleaseResolver;
use crate::error::Result;
use crate::utils::fs;
use log::{debug, info};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CHUNK_SIZE: usize = 8 * 1024;

/// Copy `reader` into `writer` one fixed-size chunk at a time.
///
/// Returns the number of bytes written.
pub fn copy_chunked<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
) -> std::io::Result<u64> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    Ok(total)
}

/// Stream `url` to `destination`, replacing any existing file.
///
/// The body goes to a temporary file next to `destination` and is renamed
/// into place once complete, so a failed transfer leaves no truncated jar.
pub fn stream_to_file(http: &dyn HttpClient, url: &str, destination: &Path) -> Result<u64> {
    let parent = fs::parent_dir(destination);
    fs::ensure_dir_exists(&parent)?;

    let mut body = http.get_stream(url)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".mcserver-")
        .suffix(".part")
        .tempfile_in(&parent)?;
    let written = copy_chunked(body.as_mut(), temp.as_file_mut(), CHUNK_SIZE)?;
    temp.as_file_mut().flush()?;
    temp.persist(destination).map_err(|e| e.error)?;

    debug!("Wrote {written} bytes to {}", destination.display());
    Ok(written)
}

/// Resolves a version through its family resolver and streams the jar.
pub struct ServerDownloader {
    resolver: Box<dyn ReleaseResolver>,
    http: Arc<dyn HttpClient>,
}

impl ServerDownloader {
    pub fn new(resolver: Box<dyn ReleaseResolver>, http: Arc<dyn HttpClient>) -> Self {
        Self { resolver, http }
    }

    pub fn get_url(&self, version: &str) -> Result<String> {
        let url = self.resolver.get_url(version)?;
        validate_url(&url)?;
        Ok(url)
    }

    pub fn get_versions(&self) -> Result<Vec<String>> {
        self.resolver.get_versions()
    }

    /// Download `version` to `destination` and hand the path back.
    pub fn download(&self, version: &str, destination: &Path) -> Result<PathBuf> {
        fs::ensure_dir_exists(&fs::parent_dir(destination))?;

        let url = self.get_url(version)?;
        info!(
            "Downloading {} {version} from {url}",
            self.resolver.family()
        );

        let written = stream_to_file(self.http.as_ref(), &url, destination)?;
        info!(
            "Saved {} {version} to {} ({written} bytes)",
            self.resolver.family(),
            destination.display()
        );

        Ok(destination.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::MockHttpClient;
    use crate::error::McServerError;
    use std::io::Cursor;

    const JAR_URL: &str = "https://piston-data.test/v1/objects/abc/server.jar";

    /// Writer recording the size of every write call.
    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<usize>,
        data: Vec<u8>,
    }

    impl Write for RecordingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes.push(buf.len());
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Reader that serves its payload and then fails.
    struct BrokenReader {
        served: bool,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            self.served = true;
            let n = buf.len().min(16);
            buf[..n].fill(b'x');
            Ok(n)
        }
    }

    struct FixedResolver {
        url: String,
    }

    impl ReleaseResolver for FixedResolver {
        fn family(&self) -> &str {
            "vanilla"
        }

        fn get_url(&self, version: &str) -> Result<String> {
            if version == "1.20.1" {
                Ok(self.url.clone())
            } else {
                Err(McServerError::UnknownVersion {
                    version: version.to_string(),
                })
            }
        }

        fn get_versions(&self) -> Result<Vec<String>> {
            Ok(vec!["1.20.1".to_string()])
        }
    }

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn serving(body: Vec<u8>) -> MockHttpClient {
        let mut http = MockHttpClient::new();
        http.expect_get_stream()
            .withf(|u| u == JAR_URL)
            .times(1)
            .returning(move |_| Ok(Box::new(Cursor::new(body.clone())) as Box<dyn Read>));
        http
    }

    fn downloader(url: &str, http: MockHttpClient) -> ServerDownloader {
        ServerDownloader::new(
            Box::new(FixedResolver {
                url: url.to_string(),
            }),
            Arc::new(http),
        )
    }

    #[test]
    fn test_copy_chunked_writes_in_chunks() {
        let data = payload(CHUNK_SIZE * 3 + 100);
        let mut writer = RecordingWriter::default();

        let total = copy_chunked(&mut Cursor::new(data.clone()), &mut writer, CHUNK_SIZE).unwrap();

        assert_eq!(total, data.len() as u64);
        assert_eq!(writer.writes, vec![CHUNK_SIZE, CHUNK_SIZE, CHUNK_SIZE, 100]);
        assert_eq!(writer.data, data);
    }

    #[test]
    fn test_stream_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("servers/vanilla/1.20.1/server.jar");
        let data = payload(20_000);

        let written = stream_to_file(&serving(data.clone()), JAR_URL, &destination).unwrap();

        assert_eq!(written, 20_000);
        assert_eq!(std::fs::read(&destination).unwrap(), data);
    }

    #[test]
    fn test_stream_to_file_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("server.jar");
        std::fs::write(&destination, b"an older and much longer jar file").unwrap();

        stream_to_file(&serving(b"new".to_vec()), JAR_URL, &destination).unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }

    #[test]
    fn test_failed_stream_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("server.jar");
        let mut http = MockHttpClient::new();
        http.expect_get_stream()
            .returning(|_| Ok(Box::new(BrokenReader { served: false }) as Box<dyn Read>));

        let err = stream_to_file(&http, JAR_URL, &destination).unwrap_err();

        assert!(matches!(err, McServerError::Io(_)));
        assert!(!destination.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_download_returns_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("vanilla/server.jar");

        let result = downloader(JAR_URL, serving(payload(1024)))
            .download("1.20.1", &destination)
            .unwrap();

        assert_eq!(result, destination);
        assert!(std::fs::metadata(&destination).unwrap().len() > 0);
    }

    #[test]
    fn test_download_rejects_invalid_url_before_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let mut http = MockHttpClient::new();
        http.expect_get_stream().never();

        let err = downloader("not a url/server.jar", http)
            .download("1.20.1", &dir.path().join("server.jar"))
            .unwrap_err();

        assert!(matches!(err, McServerError::InvalidUrl { .. }));
    }

    #[test]
    fn test_download_unknown_version_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("server.jar");
        let mut http = MockHttpClient::new();
        http.expect_get_stream().never();

        let err = downloader(JAR_URL, http)
            .download("1.99", &destination)
            .unwrap_err();

        assert!(matches!(err, McServerError::UnknownVersion { .. }));
        assert!(!destination.exists());
    }
}
