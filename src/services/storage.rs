//! Public file buckets on the local filesystem.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::common::StorageError;

/// 10 MiB per object.
pub const FILE_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Bucket {
    Sermons,
    Photos,
    Avatars,
    Documents,
    GalleryImages,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Self::Sermons,
        Self::Photos,
        Self::Avatars,
        Self::Documents,
        Self::GalleryImages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sermons => "sermons",
            Self::Photos => "photos",
            Self::Avatars => "avatars",
            Self::Documents => "documents",
            Self::GalleryImages => "gallery-images",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Bucket {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| StorageError::UnknownBucket(s.to_string()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StoredObject {
    pub bucket: Bucket,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    url_prefix: String,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket_path(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.as_str())
    }

    /// Creates any missing bucket directory. Returns the buckets it created.
    pub async fn ensure_buckets(&self) -> Result<Vec<Bucket>, StorageError> {
        let mut created = Vec::new();

        for bucket in Bucket::ALL {
            let path = self.bucket_path(bucket);
            if tokio::fs::try_exists(&path).await? {
                continue;
            }

            log::info!("Creating storage bucket: {}", bucket);
            tokio::fs::create_dir_all(&path).await?;
            created.push(bucket);
        }

        Ok(created)
    }

    pub fn public_url(&self, bucket: Bucket, name: &str) -> String {
        format!("{}/{}/{}", self.url_prefix, bucket, name)
    }

    /// Copies an uploaded temp file into `bucket` under a fresh object name.
    pub async fn put_file(
        &self,
        bucket: Bucket,
        original_name: Option<&str>,
        src: &Path,
    ) -> Result<StoredObject, StorageError> {
        let size = tokio::fs::metadata(src).await?.len();
        check_size(size)?;

        let name = object_name(original_name);
        tokio::fs::copy(src, self.bucket_path(bucket).join(&name)).await?;

        Ok(self.stored(bucket, name))
    }

    #[cfg(test)]
    async fn put_bytes(
        &self,
        bucket: Bucket,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredObject, StorageError> {
        check_size(bytes.len() as u64)?;

        let name = object_name(original_name);
        tokio::fs::write(self.bucket_path(bucket).join(&name), bytes).await?;

        Ok(self.stored(bucket, name))
    }

    /// Removes an object. A missing object is not an error.
    pub async fn remove(&self, bucket: Bucket, name: &str) -> Result<(), StorageError> {
        validate_object_name(name)?;

        match tokio::fs::remove_file(self.bucket_path(bucket).join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the object a public URL points at, if it points anywhere.
    pub async fn remove_by_url(&self, bucket: Bucket, url: &str) -> Result<(), StorageError> {
        match object_name_from_url(url) {
            Some(name) => self.remove(bucket, name).await,
            None => Ok(()),
        }
    }

    fn stored(&self, bucket: Bucket, name: String) -> StoredObject {
        StoredObject {
            bucket,
            url: self.public_url(bucket, &name),
            name,
        }
    }
}

fn check_size(size: u64) -> Result<(), StorageError> {
    if size > FILE_SIZE_LIMIT {
        return Err(StorageError::TooLarge {
            size,
            limit: FILE_SIZE_LIMIT,
        });
    }
    Ok(())
}

/// `<unix-millis>-<uuid>.<ext>`
pub fn object_name(original_name: Option<&str>) -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension_of(original_name)
    )
}

pub fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "bin".to_string())
}

pub fn object_name_from_url(url: &str) -> Option<&str> {
    url.rsplit('/')
        .next()
        .map(|s| s.split(['?', '#']).next().unwrap_or(s))
        .filter(|s| !s.is_empty())
}

pub fn validate_object_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(StorageError::InvalidObjectName(name.to_string()));
    }
    Ok(())
}

pub fn ensure_image(content_type: Option<&str>) -> Result<(), StorageError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => Ok(()),
        Some(ct) => Err(StorageError::UnsupportedContentType(ct.to_string())),
        None => Err(StorageError::UnsupportedContentType("unknown".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_sanitised() {
        assert_eq!(extension_of(Some("Sunday.JPG")), "jpg");
        assert_eq!(extension_of(Some("archive.tar.gz")), "gz");
        assert_eq!(extension_of(Some("noext")), "bin");
        assert_eq!(extension_of(Some("weird.p/ng")), "bin");
        assert_eq!(extension_of(Some("long.abcdefghij")), "bin");
        assert_eq!(extension_of(None), "bin");
    }

    #[test]
    fn object_names_are_unique_and_safe() {
        let a = object_name(Some("a.png"));
        let b = object_name(Some("a.png"));
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert!(validate_object_name(&a).is_ok());
    }

    #[test]
    fn url_round_trips_to_object_name() {
        let storage = Storage::new("/tmp/unused", "/storage/");
        let url = storage.public_url(Bucket::GalleryImages, "123-abc.png");
        assert_eq!(url, "/storage/gallery-images/123-abc.png");
        assert_eq!(object_name_from_url(&url), Some("123-abc.png"));
        assert_eq!(object_name_from_url("https://x/y/z.jpg?v=2"), Some("z.jpg"));
        assert_eq!(object_name_from_url("https://x/y/"), None);
    }

    #[test]
    fn rejects_traversal_names() {
        assert!(validate_object_name("../etc/passwd").is_err());
        assert!(validate_object_name("a/b.png").is_err());
        assert!(validate_object_name("a\\b.png").is_err());
        assert!(validate_object_name("").is_err());
    }

    #[test]
    fn bucket_names_parse() {
        assert_eq!("gallery-images".parse::<Bucket>().unwrap(), Bucket::GalleryImages);
        assert!("music".parse::<Bucket>().is_err());
    }

    #[test]
    fn only_images_are_accepted() {
        assert!(ensure_image(Some("image/png")).is_ok());
        assert!(ensure_image(Some("application/pdf")).is_err());
        assert!(ensure_image(None).is_err());
    }

    #[tokio::test]
    async fn ensure_buckets_creates_only_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), "/storage");

        std::fs::create_dir_all(dir.path().join("photos")).unwrap();

        let created = storage.ensure_buckets().await.unwrap();
        assert_eq!(created.len(), Bucket::ALL.len() - 1);
        assert!(!created.contains(&Bucket::Photos));

        for bucket in Bucket::ALL {
            assert!(storage.bucket_path(bucket).is_dir());
        }

        let again = storage.ensure_buckets().await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn put_and_remove_objects() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), "/storage");
        storage.ensure_buckets().await.unwrap();

        let obj = storage
            .put_bytes(Bucket::Sermons, Some("cover.webp"), b"RIFF....")
            .await
            .unwrap();
        let path = storage.bucket_path(Bucket::Sermons).join(&obj.name);
        assert!(path.is_file());
        assert!(obj.url.starts_with("/storage/sermons/"));

        storage.remove_by_url(Bucket::Sermons, &obj.url).await.unwrap();
        assert!(!path.exists());

        // second removal is a no-op
        storage.remove(Bucket::Sermons, &obj.name).await.unwrap();
    }

    #[tokio::test]
    async fn put_file_copies_temp_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("buckets"), "/storage");
        storage.ensure_buckets().await.unwrap();

        let src = dir.path().join("upload.tmp");
        std::fs::write(&src, b"\x89PNG").unwrap();

        let obj = storage
            .put_file(Bucket::GalleryImages, Some("group.png"), &src)
            .await
            .unwrap();
        let stored = std::fs::read(storage.bucket_path(Bucket::GalleryImages).join(&obj.name)).unwrap();
        assert_eq!(stored, b"\x89PNG");
    }

    #[tokio::test]
    async fn oversized_objects_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), "/storage");
        storage.ensure_buckets().await.unwrap();

        let big = vec![0u8; (FILE_SIZE_LIMIT + 1) as usize];
        let err = storage
            .put_bytes(Bucket::Documents, Some("big.bin"), &big)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { .. }));
    }
}
